//! Coordinate types.
//!
//! The simulator reports vehicle positions in a projected Cartesian plane
//! (metres).  Geographic coordinates come from the engine's own projection,
//! so no projection math lives here.

use std::fmt;

/// A point in the simulation plane, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct SimPosition {
    pub x: f64,
    pub y: f64,
}

impl SimPosition {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for SimPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// A WGS-84 coordinate.  Longitude first, matching the engine's ordering.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lon, self.lat)
    }
}
