// src/geo/mod.rs
//! Coordinates, great-circle distance and map viewport framing

pub mod coordinate;
pub mod region;

pub use coordinate::{haversine_distance, Coordinate, EARTH_RADIUS_M};
pub use region::{frame_route, frame_route_with_padding, MapRegion, REGION_PADDING_DEG};
