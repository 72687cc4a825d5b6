// src/summary.rs
//! End-of-workout summary and its hand-off to a viewer

use crate::{
    error::Result,
    geo::{frame_route_with_padding, Coordinate, MapRegion},
    metrics::{estimate_calories, format_time, meters_to_km, CalorieProfile},
    tracker::TrackingSnapshot,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Read-only projection of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub started_at: Option<DateTime<Utc>>,
    pub distance_m: f64,
    pub distance_miles: f64,
    pub pace: String,
    pub elapsed_ms: i64,
    pub elapsed_time: String,
    pub calories: f64,
    pub route: Vec<Coordinate>,
    pub splits: Vec<f64>,
    /// Viewport around the route; absent when nothing was recorded
    pub region: Option<MapRegion>,
}

impl WorkoutSummary {
    pub fn from_snapshot(snapshot: &TrackingSnapshot, profile: &CalorieProfile, region_padding: f64) -> Result<Self> {
        let region = if snapshot.route.is_empty() {
            None
        } else {
            Some(frame_route_with_padding(&snapshot.route, region_padding)?)
        };

        Ok(Self {
            started_at: snapshot.started_at,
            distance_m: snapshot.distance_m,
            distance_miles: snapshot.distance_miles(),
            pace: snapshot.pace_display(),
            elapsed_ms: snapshot.elapsed_ms,
            elapsed_time: format_time(snapshot.elapsed_seconds()),
            calories: estimate_calories(snapshot.distance_m, profile),
            route: snapshot.route.clone(),
            splits: snapshot.splits.clone(),
            region,
        })
    }

    pub fn distance_display(&self) -> String {
        format!("{:.2} mi", self.distance_miles)
    }

    pub fn distance_km_display(&self) -> String {
        format!("{:.2} km", meters_to_km(self.distance_m))
    }

    pub fn pace_display(&self) -> String {
        format!("{} /mi", self.pace)
    }

    pub fn calories_display(&self) -> String {
        format!("{} kCal", self.calories)
    }

    pub fn start(&self) -> Option<&Coordinate> {
        self.route.first()
    }

    pub fn finish(&self) -> Option<&Coordinate> {
        self.route.last()
    }
}

/// Receives the summary once a session ends
pub trait SummaryNavigator {
    fn show(&mut self, summary: &WorkoutSummary) -> Result<()>;
}

/// Writes the summary as pretty JSON
pub struct JsonSummary<W> {
    out: W,
}

impl<W: Write> JsonSummary<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SummaryNavigator for JsonSummary<W> {
    fn show(&mut self, summary: &WorkoutSummary) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, summary)?;
        writeln!(self.out)?;
        Ok(())
    }
}
