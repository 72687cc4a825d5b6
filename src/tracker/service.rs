// src/tracker/service.rs
//! Single-owner task that drives a [`RouteTracker`]
//!
//! Location fixes, timer ticks and control requests all arrive on one
//! channel and are applied in order, so the tracker needs no locking.
//! Every location and tick event carries the id of the session it was
//! produced for; events from an earlier session are dropped.

use super::{
    route_tracker::{RouteTracker, TrackerSettings},
    session::TrackingSnapshot,
};
use crate::{
    error::{Result, TrackerError},
    geo::Coordinate,
    location::{LocationCallback, LocationEvent, LocationGrant, LocationOptions, LocationProvider, Subscription},
};
use chrono::{DateTime, Utc};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub type SessionId = u64;

#[derive(Debug)]
pub enum TrackerEvent {
    Start {
        reply: oneshot::Sender<SessionId>,
    },
    Stop {
        reply: oneshot::Sender<Result<TrackingSnapshot>>,
    },
    Snapshot {
        reply: oneshot::Sender<TrackingSnapshot>,
    },
    Sample {
        session: SessionId,
        coordinate: Coordinate,
    },
    Tick {
        session: SessionId,
        at: DateTime<Utc>,
    },
    LocationError {
        session: SessionId,
        message: String,
    },
    Shutdown,
}

/// Handle to the tracker task
pub struct TrackerService {
    tx: mpsc::UnboundedSender<TrackerEvent>,
    task: JoinHandle<()>,
}

impl TrackerService {
    /// Spawn the tracker task on the current tokio runtime
    pub fn spawn(
        provider: Arc<dyn LocationProvider>,
        options: LocationOptions,
        settings: TrackerSettings,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            tracker: RouteTracker::new(settings),
            provider,
            options,
            tx: tx.clone(),
            session: 0,
            subscription: None,
            ticker: None,
        };
        let task = tokio::spawn(worker.run(rx));

        Self { tx, task }
    }

    /// Start a new session. Any previous session's data is discarded.
    pub async fn start(&self, _grant: &LocationGrant) -> Result<SessionId> {
        let (reply, response) = oneshot::channel();
        self.send(TrackerEvent::Start { reply })?;
        response.await.map_err(|_| TrackerError::ServiceClosed)
    }

    /// Stop the active session and return its final snapshot.
    ///
    /// The location subscription and tick timer are released before this
    /// returns.
    pub async fn stop(&self) -> Result<TrackingSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(TrackerEvent::Stop { reply })?;
        response.await.map_err(|_| TrackerError::ServiceClosed)?
    }

    pub async fn snapshot(&self) -> Result<TrackingSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(TrackerEvent::Snapshot { reply })?;
        response.await.map_err(|_| TrackerError::ServiceClosed)
    }

    /// Stop the task, releasing any active subscription
    pub async fn shutdown(mut self) {
        let _ = self.tx.send(TrackerEvent::Shutdown);
        let _ = (&mut self.task).await;
    }

    fn send(&self, event: TrackerEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| TrackerError::ServiceClosed)
    }
}

impl Drop for TrackerService {
    fn drop(&mut self) {
        let _ = self.tx.send(TrackerEvent::Shutdown);
    }
}

struct Worker {
    tracker: RouteTracker,
    provider: Arc<dyn LocationProvider>,
    options: LocationOptions,
    tx: mpsc::UnboundedSender<TrackerEvent>,
    session: SessionId,
    subscription: Option<Subscription>,
    ticker: Option<JoinHandle<()>>,
}

impl Worker {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<TrackerEvent>) {
        while let Some(event) = rx.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        self.release();
    }

    /// Apply one event. Returns false on shutdown.
    fn handle(&mut self, event: TrackerEvent) -> bool {
        match event {
            TrackerEvent::Start { reply } => {
                let session = self.begin();
                let _ = reply.send(session);
            }
            TrackerEvent::Stop { reply } => {
                let result = if self.tracker.is_tracking() {
                    self.release();
                    self.tracker.on_tick(Utc::now());
                    self.tracker.stop();
                    let snapshot = self.tracker.snapshot();
                    info!(
                        session = self.session,
                        points = snapshot.route.len(),
                        distance_m = snapshot.distance_m,
                        "tracking stopped"
                    );
                    Ok(snapshot)
                } else {
                    Err(TrackerError::NotTracking)
                };
                let _ = reply.send(result);
            }
            TrackerEvent::Snapshot { reply } => {
                let _ = reply.send(self.tracker.snapshot());
            }
            TrackerEvent::Sample { session, coordinate } if session == self.session => {
                self.tracker.on_sample(coordinate);
            }
            TrackerEvent::Tick { session, at } if session == self.session => {
                self.tracker.on_tick(at);
            }
            TrackerEvent::LocationError { session, message } if session == self.session => {
                warn!(session, "location provider error: {}", message);
            }
            TrackerEvent::Sample { session, .. }
            | TrackerEvent::Tick { session, .. }
            | TrackerEvent::LocationError { session, .. } => {
                debug!(stale = session, current = self.session, "dropping event from ended session");
            }
            TrackerEvent::Shutdown => return false,
        }
        true
    }

    fn begin(&mut self) -> SessionId {
        self.release();
        self.session += 1;
        let session = self.session;

        self.tracker.start(Utc::now());
        self.subscription = Some(self.provider.subscribe(&self.options, self.location_callback(session)));
        self.ticker = Some(self.spawn_ticker(session));

        info!(session, source = self.provider.name(), "tracking started");
        session
    }

    fn location_callback(&self, session: SessionId) -> LocationCallback {
        let tx = self.tx.clone();
        Arc::new(move |event| {
            let event = match event {
                LocationEvent::Fix(coordinate) => TrackerEvent::Sample { session, coordinate },
                LocationEvent::Error(message) => TrackerEvent::LocationError { session, message },
            };
            let _ = tx.send(event);
        })
    }

    fn spawn_ticker(&self, session: SessionId) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut ticker = interval(TICK_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(TrackerEvent::Tick { session, at: Utc::now() }).is_err() {
                    break;
                }
            }
        })
    }

    /// Cancel the location subscription and the tick timer
    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}
