// src/tracker/session.rs
//! Tracking session aggregate and its read-only snapshot

use crate::{
    geo::Coordinate,
    metrics::{format_pace_opt, format_time, meters_to_miles, pace_seconds_per_mile},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything accumulated between a start and a stop
#[derive(Debug, Clone, Default)]
pub struct TrackingSession {
    pub(crate) route: Vec<Coordinate>,
    pub(crate) distance_m: f64,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) elapsed_ms: i64,
    pub(crate) active: bool,
    pub(crate) pace_s_per_mile: Option<f64>,
    pub(crate) splits: Vec<f64>,
    /// Sum of all recorded splits, in seconds
    pub(crate) split_elapsed_s: f64,
}

impl TrackingSession {
    /// Fresh session started at `now`
    pub fn begin(now: DateTime<Utc>) -> Self {
        Self {
            started_at: Some(now),
            active: true,
            ..Self::default()
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    pub(crate) fn refresh_pace(&mut self) {
        self.pace_s_per_mile = pace_seconds_per_mile(self.elapsed_seconds(), self.distance_m);
    }

    pub fn snapshot(&self) -> TrackingSnapshot {
        TrackingSnapshot {
            route: self.route.clone(),
            distance_m: self.distance_m,
            started_at: self.started_at,
            elapsed_ms: self.elapsed_ms,
            active: self.active,
            pace_s_per_mile: self.pace_s_per_mile,
            splits: self.splits.clone(),
        }
    }
}

/// Point-in-time copy of a session, handed to displays and summaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    pub route: Vec<Coordinate>,
    pub distance_m: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_ms: i64,
    pub active: bool,
    pub pace_s_per_mile: Option<f64>,
    /// Seconds taken for each completed split, in order
    pub splits: Vec<f64>,
}

impl TrackingSnapshot {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    pub fn distance_miles(&self) -> f64 {
        meters_to_miles(self.distance_m)
    }

    pub fn pace_display(&self) -> String {
        format_pace_opt(self.pace_s_per_mile)
    }

    pub fn elapsed_display(&self) -> String {
        format_time(self.elapsed_seconds())
    }

    pub fn last_point(&self) -> Option<&Coordinate> {
        self.route.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_begin_resets_everything() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap();
        let session = TrackingSession::begin(now);

        assert!(session.active);
        assert_eq!(session.started_at, Some(now));
        assert!(session.route.is_empty());
        assert!(session.splits.is_empty());
        assert_eq!(session.distance_m, 0.0);
        assert_eq!(session.elapsed_ms, 0);
        assert_eq!(session.pace_s_per_mile, None);
    }

    #[test]
    fn test_snapshot_display_helpers() {
        let snapshot = TrackingSnapshot {
            distance_m: 1609.344,
            elapsed_ms: 3_661_000,
            pace_s_per_mile: Some(3661.0),
            ..TrackingSnapshot::default()
        };

        assert!((snapshot.distance_miles() - 1.0).abs() < 1e-12);
        assert_eq!(snapshot.elapsed_display(), "1:01:01");
        assert_eq!(snapshot.pace_display(), "61:01");
    }

    #[test]
    fn test_empty_snapshot_uses_placeholder() {
        let snapshot = TrackingSnapshot::default();
        assert_eq!(snapshot.pace_display(), "--:--");
        assert_eq!(snapshot.elapsed_display(), "00:00");
        assert!(snapshot.last_point().is_none());
    }
}
