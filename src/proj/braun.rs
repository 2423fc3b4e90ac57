//! Braun's stereographic cylindrical projection.
//!
//!   forward: x = R·λ, y = 2R·tan(φ/2)
//!   inverse: λ = x/R, φ = 2·atan(y / 2R)
//!
//! Compresses high latitudes less than Mercator and stays finite at the poles.

use crate::proj::cylindrical::{CylinderFormula, CylindricalProjection, NBR_ZOOM_LEVELS};
use crate::proj::ProjectionKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Braun;

pub type BraunProjection = CylindricalProjection<Braun>;

impl CylinderFormula for Braun {
    const KIND: ProjectionKind = ProjectionKind::Braun;

    const SCALE_LEVELS: [u8; NBR_ZOOM_LEVELS as usize] =
        [0, 1, 1, 2, 2, 2, 2, 3, 3, 4, 5, 6, 7, 8, 9];

    fn forward_y(lat: f64, radius: f64) -> f64 {
        2.0 * radius * (lat / 2.0).tan()
    }

    fn inverse_y(y: f64, radius: f64) -> f64 {
        2.0 * (y / 2.0 / radius).atan()
    }
}
