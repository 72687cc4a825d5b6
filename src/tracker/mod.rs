// src/tracker/mod.rs
//! Route tracking: session state, the tracking state machine and the
//! service task that drives it from location and timer events

pub mod route_tracker;
pub mod service;
pub mod session;

pub use route_tracker::{RouteTracker, SplitCheck, TrackerSettings, TrackerState};
pub use service::{TrackerEvent, TrackerService};
pub use session::{TrackingSession, TrackingSnapshot};
