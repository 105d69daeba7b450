//! Fixed-point coordinates and the turn-angle test used by contraction.

use zerocopy::{AsBytes, FromBytes, FromZeroes};

/// Fixed-point factor: coordinates are stored as 1e-5 degrees.
pub const COORDINATE_PRECISION: f64 = 100_000.0;

/// Node position, indexed by `NodeId`. Consulted only for the geometric
/// angle test during contraction, never for topology.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes)]
pub struct Coordinate {
    pub lat: i32,
    pub lon: i32,
}

impl Coordinate {
    pub fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    /// Build from floating-point degrees.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat: (lat * COORDINATE_PRECISION).round() as i32,
            lon: (lon * COORDINATE_PRECISION).round() as i32,
        }
    }
}

/// Angle in degrees `[0, 360)` between the edges (first -> via) and
/// (via -> third), measured at `via`. A straight continuation yields 180.
pub fn turn_angle(first: Coordinate, via: Coordinate, third: Coordinate) -> f64 {
    let v1x = (first.lon - via.lon) as f64;
    let v1y = (first.lat - via.lat) as f64;
    let v2x = (third.lon - via.lon) as f64;
    let v2y = (third.lat - via.lat) as f64;

    let mut angle = (v2y.atan2(v2x) - v1y.atan2(v1x)).to_degrees();
    while angle < 0.0 {
        angle += 360.0;
    }
    angle
}
