// src/tracker/route_tracker.rs
//! The tracking state machine: Idle -> Tracking -> Idle
//!
//! The tracker is driven with explicit timestamps so it stays a pure value
//! type; the service layer feeds it wall-clock time.

use super::session::{TrackingSession, TrackingSnapshot};
use crate::geo::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which cumulative distance the split boundary check looks at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitCheck {
    /// Distance including the segment just added
    #[default]
    AfterSample,
    /// Distance as it was before the segment was added; splits lag one sample
    BeforeSample,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerSettings {
    pub split_distance_m: f64,
    pub split_check: SplitCheck,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            split_distance_m: 100.0,
            split_check: SplitCheck::AfterSample,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Tracking,
}

pub struct RouteTracker {
    settings: TrackerSettings,
    state: TrackerState,
    session: TrackingSession,
}

impl RouteTracker {
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            settings,
            state: TrackerState::Idle,
            session: TrackingSession::default(),
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        self.state == TrackerState::Tracking
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Begin a new session, discarding whatever the previous one recorded
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.session = TrackingSession::begin(now);
        self.state = TrackerState::Tracking;
    }

    /// Apply a position sample. Returns false when not tracking.
    pub fn on_sample(&mut self, coordinate: Coordinate) -> bool {
        if !self.is_tracking() {
            return false;
        }

        let distance_before = self.session.distance_m;
        if let Some(last) = self.session.route.last() {
            self.session.distance_m += last.distance_to(&coordinate);
        }
        self.session.route.push(coordinate);
        self.session.refresh_pace();

        let checked_distance = match self.settings.split_check {
            SplitCheck::AfterSample => self.session.distance_m,
            SplitCheck::BeforeSample => distance_before,
        };
        self.check_split(checked_distance);

        debug!(
            points = self.session.route.len(),
            distance_m = self.session.distance_m,
            "sample applied"
        );
        true
    }

    /// Advance elapsed time to `now`. Returns false when not tracking.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_tracking() {
            return false;
        }

        if let Some(started) = self.session.started_at {
            self.session.elapsed_ms = now.signed_duration_since(started).num_milliseconds().max(0);
        }
        self.session.refresh_pace();
        true
    }

    /// End the session. The recorded data stays readable until the next start.
    pub fn stop(&mut self) -> bool {
        if !self.is_tracking() {
            return false;
        }

        self.state = TrackerState::Idle;
        self.session.active = false;
        true
    }

    pub fn snapshot(&self) -> TrackingSnapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    /// Record at most one split when a new boundary has been reached
    fn check_split(&mut self, distance_m: f64) {
        let boundaries = (distance_m / self.settings.split_distance_m).floor();
        let next_boundary = (self.session.splits.len() + 1) as f64;
        if boundaries < next_boundary {
            return;
        }

        let split = self.session.elapsed_seconds() - self.session.split_elapsed_s;
        if split > 0.0 {
            self.session.splits.push(split);
            self.session.split_elapsed_s += split;
            debug!(index = self.session.splits.len(), seconds = split, "split recorded");
        }
    }
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new(TrackerSettings::default())
    }
}
