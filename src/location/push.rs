// src/location/push.rs
//! Provider fed by the embedding application

use super::{LocationCallback, LocationEvent, LocationOptions, LocationProvider, Subscription};
use crate::geo::Coordinate;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

type Slot = Arc<Mutex<Option<(Arc<AtomicBool>, LocationCallback)>>>;

/// A provider whose fixes come from a [`PushHandle`], for hosts that own the
/// platform location API themselves
pub struct PushProvider {
    slot: Slot,
}

/// Pushes fixes into whichever subscription is currently active
#[derive(Clone)]
pub struct PushHandle {
    slot: Slot,
}

impl PushProvider {
    pub fn new() -> (Self, PushHandle) {
        let slot: Slot = Arc::new(Mutex::new(None));
        (
            Self {
                slot: Arc::clone(&slot),
            },
            PushHandle { slot },
        )
    }
}

impl LocationProvider for PushProvider {
    fn subscribe(&self, _options: &LocationOptions, on_event: LocationCallback) -> Subscription {
        let running = Arc::new(AtomicBool::new(true));
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some((Arc::clone(&running), on_event));
        Subscription::from_flag(running)
    }

    fn name(&self) -> &str {
        "push"
    }
}

impl PushHandle {
    /// Deliver a fix. Returns false when nobody is subscribed.
    pub fn push(&self, coord: Coordinate) -> bool {
        self.deliver(LocationEvent::Fix(coord))
    }

    /// Report a provider-side error
    pub fn push_error(&self, message: impl Into<String>) -> bool {
        self.deliver(LocationEvent::Error(message.into()))
    }

    fn deliver(&self, event: LocationEvent) -> bool {
        let callback = {
            let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some((running, callback)) if running.load(Ordering::Relaxed) => Arc::clone(callback),
                _ => return false,
            }
        };
        callback(event);
        true
    }
}
