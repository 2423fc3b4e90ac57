//! Spherical Mercator projection.
//!
//!   forward: x = R·λ, y = R·ln(tan φ + sec φ)
//!   inverse: λ = x/R, φ = atan(sinh(y/R))

use crate::proj::cylindrical::{CylinderFormula, CylindricalProjection, NBR_ZOOM_LEVELS};
use crate::proj::ProjectionKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mercator;

pub type MercatorProjection = CylindricalProjection<Mercator>;

impl CylinderFormula for Mercator {
    const KIND: ProjectionKind = ProjectionKind::Mercator;

    const SCALE_LEVELS: [u8; NBR_ZOOM_LEVELS as usize] =
        [0, 0, 1, 2, 2, 3, 3, 4, 5, 5, 6, 7, 8, 9, 10];

    /// `ln(tan φ + sec φ)` written as `asinh(tan φ)`, which stays finite at
    /// ±90° where the two terms cancel.
    fn forward_y(lat: f64, radius: f64) -> f64 {
        radius * lat.tan().asinh()
    }

    fn inverse_y(y: f64, radius: f64) -> f64 {
        (y / radius).sinh().atan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{Coordinate, Point};
    use crate::proj::braun::BraunProjection;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_mercator_roundtrip() {
        let r = 6378.0;
        for &deg in &[0.0_f64, 10.0, -45.0, 80.0, -85.0] {
            let lat = deg.to_radians();
            assert_relative_eq!(
                Mercator::inverse_y(Mercator::forward_y(lat, r), r),
                lat,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_mercator_matches_web_mercator_form() {
        // ln(tan φ + sec φ) == ln(tan(π/4 + φ/2))
        for &deg in &[5.0_f64, 33.0, 60.0] {
            let lat = deg.to_radians();
            assert_relative_eq!(
                Mercator::forward_y(lat, 1.0),
                (FRAC_PI_4 + lat / 2.0).tan().ln(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_tile_corners_roundtrip_near_equator() {
        let proj = MercatorProjection::new(0, 0, 5, 256).unwrap();
        for &(x, y) in &[(0, 0), (256, 0), (0, 256), (256, 256)] {
            let p = Point::new(x, y);
            let back = proj.point(proj.coordinate(p));
            assert!((back.x - p.x).abs() <= 1 && (back.y - p.y).abs() <= 1, "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn test_differs_from_braun_at_high_latitude() {
        let braun = BraunProjection::new(0, 0, 1, 256).unwrap();
        let mercator = MercatorProjection::new(0, 0, 1, 256).unwrap();
        let coord = Coordinate::from_degrees(80.0, 20.0);
        let b = braun.global_point(coord);
        let m = mercator.global_point(coord);
        assert_eq!(b.x, m.x);
        assert!(m.y - b.y > 100, "braun {b:?} mercator {m:?}");
    }
}
