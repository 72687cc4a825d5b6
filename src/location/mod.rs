// src/location/mod.rs
//! Location providers and location access authorization
//!
//! A provider pushes fixes (or errors) into a callback between `subscribe`
//! and `unsubscribe`. Options are passed through to the provider; the
//! tracker never interprets them.

pub mod gpsd;
pub mod nmea;
pub mod permission;
pub mod push;
pub mod replay;
pub mod serial;

pub use gpsd::GpsdProvider;
pub use permission::{authorize, Authorization, ConsentAuthorization, LocationGrant, Permission, StaticAuthorization};
pub use push::{PushHandle, PushProvider};
pub use replay::ReplayProvider;
pub use serial::{list_serial_ports, SerialProvider};

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tokio::task::JoinHandle;

/// Requested fix quality
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accuracy {
    #[default]
    High,
    Balanced,
    Low,
}

impl Accuracy {
    /// Minimum gpsd TPV mode (2 = 2D fix, 3 = 3D fix)
    pub fn min_gpsd_mode(&self) -> u8 {
        match self {
            Accuracy::High => 3,
            Accuracy::Balanced | Accuracy::Low => 2,
        }
    }

    /// Largest horizontal dilution of precision accepted from NMEA GGA
    pub fn max_hdop(&self) -> Option<f64> {
        match self {
            Accuracy::High => Some(2.0),
            Accuracy::Balanced => Some(5.0),
            Accuracy::Low => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationOptions {
    pub accuracy: Accuracy,
    /// Minimum movement in meters between delivered fixes
    pub distance_filter_m: f64,
    /// Polling / minimum delivery interval in milliseconds
    pub interval_ms: u64,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            accuracy: Accuracy::High,
            distance_filter_m: 5.0,
            interval_ms: 1000,
        }
    }
}

impl LocationOptions {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// What a provider delivers to its subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Fix(Coordinate),
    Error(String),
}

pub type LocationCallback = Arc<dyn Fn(LocationEvent) + Send + Sync>;

/// A source of position fixes
pub trait LocationProvider: Send + Sync {
    /// Start delivering events to `on_event` until the subscription is released
    fn subscribe(&self, options: &LocationOptions, on_event: LocationCallback) -> Subscription;

    /// Human readable source name for logs and displays
    fn name(&self) -> &str;
}

/// Handle for an active provider subscription.
///
/// Releasing it (explicitly or by drop) clears the running flag and aborts
/// the provider task, so no further events are delivered.
pub struct Subscription {
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Run a provider loop on the tokio runtime. The loop should exit once
    /// the flag it receives goes false.
    pub fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(run(Arc::clone(&running)));
        Self {
            running,
            task: Some(task),
        }
    }

    /// A subscription with no task of its own, controlled only by its flag
    pub fn from_flag(running: Arc<AtomicBool>) -> Self {
        Self { running, task: None }
    }

    pub fn is_active(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Fraction of `interval_ms` that must elapse between accepted fixes
const INTERVAL_TOLERANCE: f64 = 0.9;

/// Drops fixes that are out of range, arrive too soon, or sit too close to
/// the last delivered one
#[derive(Debug, Clone)]
pub struct SampleFilter {
    min_distance_m: f64,
    min_interval: Duration,
    last: Option<(Coordinate, Instant)>,
}

impl SampleFilter {
    pub fn new(options: &LocationOptions) -> Self {
        Self {
            min_distance_m: options.distance_filter_m.max(0.0),
            min_interval: options.interval().mul_f64(INTERVAL_TOLERANCE),
            last: None,
        }
    }

    pub fn accept(&mut self, coord: Coordinate) -> bool {
        self.accept_at(coord, Instant::now())
    }

    pub fn accept_at(&mut self, coord: Coordinate, at: Instant) -> bool {
        if !coord.is_valid() {
            return false;
        }
        if let Some((last_coord, last_time)) = self.last {
            if at.saturating_duration_since(last_time) < self.min_interval {
                return false;
            }
            if last_coord.distance_to(&coord) < self.min_distance_m {
                return false;
            }
        }
        self.last = Some((coord, at));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_filter_first_fix_always_accepted() {
        let mut filter = SampleFilter::new(&LocationOptions::default());
        assert!(filter.accept(Coordinate::new(10.0, 10.0)));
    }

    #[test]
    fn test_filter_interval_and_distance() {
        let options = LocationOptions {
            distance_filter_m: 5.0,
            interval_ms: 1000,
            ..LocationOptions::default()
        };
        let mut filter = SampleFilter::new(&options);
        let start = Instant::now();
        let origin = Coordinate::new(0.0, 0.0);
        // ~11 m east
        let moved = Coordinate::new(0.0, 0.0001);

        assert!(filter.accept_at(origin, start));
        assert!(!filter.accept_at(moved, start + Duration::from_millis(500)));
        assert!(!filter.accept_at(origin, start + Duration::from_secs(2)));
        assert!(filter.accept_at(moved, start + Duration::from_secs(2)));
    }

    #[test]
    fn test_filter_keeps_one_hertz_feed_with_jitter() {
        let mut filter = SampleFilter::new(&LocationOptions::default());
        let start = Instant::now();
        let mut accepted = 0;
        for i in 0..10u64 {
            // every other fix lands 2 ms early; ~10 m between fixes
            let early = if i % 2 == 1 { 2 } else { 0 };
            let at = start + Duration::from_millis(i * 1000 - early);
            if filter.accept_at(Coordinate::new(0.0, i as f64 * 0.00009), at) {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 10);
    }

    #[test]
    fn test_filter_rejects_out_of_range_fix() {
        let mut filter = SampleFilter::new(&LocationOptions::default());
        assert!(!filter.accept(Coordinate::new(f64::NAN, 0.0)));
        assert!(!filter.accept(Coordinate::new(95.0, 10.0)));
        assert!(filter.accept(Coordinate::new(45.0, 10.0)));
    }

    #[test]
    fn test_accuracy_thresholds() {
        assert_eq!(Accuracy::High.min_gpsd_mode(), 3);
        assert_eq!(Accuracy::Low.min_gpsd_mode(), 2);
        assert_eq!(Accuracy::Low.max_hdop(), None);
    }

    #[tokio::test]
    async fn test_subscription_release_stops_flag() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let subscription = Subscription::spawn(|running| async move {
            while running.load(Ordering::Relaxed) {
                seen_clone.lock().unwrap().push(());
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });

        assert!(subscription.is_active());
        let flag = Arc::clone(&subscription.running);
        subscription.unsubscribe();
        assert!(!flag.load(Ordering::Relaxed));
    }
}
