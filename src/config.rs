//! Limits and defaults for an interactive [`MapProjection`](crate::map_projection::MapProjection).

use serde::{Deserialize, Serialize};

use crate::error::ProjError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapProjectionConfig {
    /// Smallest scale in meters per pixel (most zoomed in).
    pub min_scale: f64,
    /// Largest scale in meters per pixel (most zoomed out).
    pub max_scale: f64,
    /// The view center never goes further north or south than this, in
    /// degrees.
    pub max_center_lat_deg: f64,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Starting scale in meters per pixel.
    pub scale: f64,
}

impl Default for MapProjectionConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 24_000.0,
            max_center_lat_deg: 89.5,
            screen_width: 256,
            screen_height: 256,
            scale: 10.0,
        }
    }
}

impl MapProjectionConfig {
    pub fn validate(&self) -> Result<(), ProjError> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale && self.max_scale.is_finite()) {
            return Err(ProjError::InvalidParameter(format!(
                "scale range [{}, {}] must be positive and ordered",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.max_center_lat_deg > 0.0 && self.max_center_lat_deg < 90.0) {
            return Err(ProjError::InvalidParameter(format!(
                "max center latitude {} must lie in (0, 90)",
                self.max_center_lat_deg
            )));
        }
        if !self.scale.is_finite() {
            return Err(ProjError::InvalidParameter(format!(
                "starting scale {} is not finite",
                self.scale
            )));
        }
        Ok(())
    }
}
