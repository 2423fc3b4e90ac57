//! MC2 angles, geographic coordinates and screen points.
//!
//! An MC2 angle is an `i32` where the full circle spans the whole integer
//! range: `degrees = value * 360 / 2^32`. Longitude differences are always
//! taken with wrapping subtraction so a delta across the ±180° seam comes out
//! as the short way around.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Number of MC2 units in a full circle.
pub const MC2_FULL_CIRCLE: f64 = 4_294_967_296.0;

/// MC2 units per degree.
pub const MC2_PER_DEGREE: f64 = MC2_FULL_CIRCLE / 360.0;

/// Radians per MC2 unit.
pub const MC2_TO_RADIANS: f64 = 2.0 * PI / MC2_FULL_CIRCLE;

/// MC2 units per radian.
pub const RADIANS_TO_MC2: f64 = MC2_FULL_CIRCLE / (2.0 * PI);

/// Equatorial radius used by every metric conversion (WGS84 semi-major axis).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// MC2 units per meter along a meridian.
pub const METER_TO_MC2: f64 = MC2_FULL_CIRCLE / (2.0 * PI * EARTH_RADIUS_M);

/// Meters per MC2 unit along a meridian.
pub const MC2_TO_METER: f64 = 2.0 * PI * EARTH_RADIUS_M / MC2_FULL_CIRCLE;

pub const SQUARE_MC2_TO_SQUARE_METER: f64 = MC2_TO_METER * MC2_TO_METER;

/// Convert degrees to an MC2 angle, wrapping outside ±180°.
pub fn degrees_to_mc2(degrees: f64) -> i32 {
    (degrees * MC2_PER_DEGREE).round() as i64 as i32
}

pub fn mc2_to_degrees(value: i32) -> f64 {
    value as f64 / MC2_PER_DEGREE
}

pub fn radians_to_mc2(radians: f64) -> i32 {
    (radians * RADIANS_TO_MC2).round() as i64 as i32
}

/// Signed shortest difference `a - b` between two MC2 angles.
#[inline]
pub fn angle_delta(a: i32, b: i32) -> i32 {
    a.wrapping_sub(b)
}

/// A geographic position in MC2 units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: i32,
    pub lon: i32,
}

impl Coordinate {
    /// Latitude marking a coordinate that does not refer to any position.
    pub const INVALID_LAT: i32 = i32::MAX;

    pub const INVALID: Coordinate = Coordinate {
        lat: Self::INVALID_LAT,
        lon: Self::INVALID_LAT,
    };

    pub const fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat: degrees_to_mc2(lat),
            lon: degrees_to_mc2(lon),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat != Self::INVALID_LAT
    }

    pub fn lat_degrees(&self) -> f64 {
        mc2_to_degrees(self.lat)
    }

    pub fn lon_degrees(&self) -> f64 {
        mc2_to_degrees(self.lon)
    }

    pub fn lat_radians(&self) -> f64 {
        self.lat as f64 * MC2_TO_RADIANS
    }

    pub fn lon_radians(&self) -> f64 {
        self.lon as f64 * MC2_TO_RADIANS
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A screen position in pixels, `y` growing downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
