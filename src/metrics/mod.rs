// src/metrics/mod.rs
//! Workout metric helpers: unit conversion, display formatting, calorie estimates

pub mod calories;
pub mod format;
pub mod units;

pub use calories::{estimate_calories, CalorieProfile};
pub use format::{format_pace, format_pace_opt, format_time, PACE_PLACEHOLDER};
pub use units::{meters_to_km, meters_to_miles, pace_seconds_per_mile, METERS_PER_MILE};
