// src/geo/region.rs
//! Map viewport framing around a recorded route

use super::Coordinate;
use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};

/// Padding added to both spans so a route never touches the viewport edge
pub const REGION_PADDING_DEG: f64 = 0.01;

/// A map viewport: center coordinate plus latitude/longitude span in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn min_latitude(&self) -> f64 {
        self.latitude - self.latitude_delta / 2.0
    }

    pub fn max_latitude(&self) -> f64 {
        self.latitude + self.latitude_delta / 2.0
    }

    pub fn min_longitude(&self) -> f64 {
        self.longitude - self.longitude_delta / 2.0
    }

    pub fn max_longitude(&self) -> f64 {
        self.longitude + self.longitude_delta / 2.0
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.min_latitude()..=self.max_latitude()).contains(&coord.latitude)
            && (self.min_longitude()..=self.max_longitude()).contains(&coord.longitude)
    }
}

/// Frame a route with the default padding
pub fn frame_route(route: &[Coordinate]) -> Result<MapRegion> {
    frame_route_with_padding(route, REGION_PADDING_DEG)
}

/// Bounding viewport of a route: midpoint center, span plus `padding` degrees.
///
/// The route must contain at least one point.
pub fn frame_route_with_padding(route: &[Coordinate], padding: f64) -> Result<MapRegion> {
    let first = route.first().ok_or(TrackerError::EmptyRoute)?;

    let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
    let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);
    for coord in &route[1..] {
        min_lat = min_lat.min(coord.latitude);
        max_lat = max_lat.max(coord.latitude);
        min_lon = min_lon.min(coord.longitude);
        max_lon = max_lon.max(coord.longitude);
    }

    Ok(MapRegion {
        latitude: (min_lat + max_lat) / 2.0,
        longitude: (min_lon + max_lon) / 2.0,
        latitude_delta: max_lat - min_lat + padding,
        longitude_delta: max_lon - min_lon + padding,
    })
}
