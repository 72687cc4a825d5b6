// src/lib.rs
//! Workout Tracker Library
//!
//! Turns a stream of GPS fixes into workout metrics: cumulative distance,
//! pace, elapsed time, per-split times and a calorie estimate, plus a map
//! viewport framing the recorded route.

pub mod config;
pub mod display;
pub mod error;
pub mod geo;
pub mod location;
pub mod metrics;
pub mod summary;
pub mod tracker;

// Re-export main types for convenience
pub use error::{Result, TrackerError};
pub use geo::{Coordinate, MapRegion};
pub use summary::{SummaryNavigator, WorkoutSummary};
pub use tracker::{RouteTracker, TrackerService, TrackingSnapshot};
