//! Equirectangular image projection with longitude foreshortened by the
//! cosine of the box's mean latitude.
//!
//! Fits a geographic box into a `width` x `height` image. When the box's
//! aspect ratio differs from the image's, the scale on one axis is reduced so
//! the box keeps its proportions and the image shows extra area on that axis,
//! anchored at the bottom-left corner. A non-zero rotation turns the drawn
//! content counter-clockwise around the image center.

use crate::bbox::BoundingBox;
use crate::coord::{Coordinate, Point};
use crate::error::ProjError;
use crate::proj::scale_level::ScaleLevel;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CosLatProjection {
    bbox: BoundingBox,
    height: i32,
    width: i32,
    /// Rotation in degrees.
    rotation: i16,
    x_scale: f64,
    y_scale: f64,
}

impl CosLatProjection {
    pub fn new(bbox: BoundingBox, height: i32, width: i32, rotation: i16) -> Result<Self, ProjError> {
        if !bbox.is_valid() || bbox.lon_diff() <= 0 || bbox.height() <= 0 {
            return Err(ProjError::InvalidParameter(format!(
                "cannot fit an empty bounding box {bbox:?}"
            )));
        }
        if width <= 0 || height <= 0 {
            return Err(ProjError::InvalidParameter(format!(
                "image size {width}x{height} must be positive"
            )));
        }
        let mut bbox = bbox;
        bbox.update_cos_lat();
        let mut proj = Self {
            bbox,
            height,
            width,
            rotation,
            x_scale: 0.0,
            y_scale: 0.0,
        };
        proj.init();
        Ok(proj)
    }

    fn init(&mut self) {
        let lon_diff = self.bbox.lon_diff() as f64;
        let lat_diff = self.bbox.height() as f64;
        // Box edges land on pixel `width` and `height` themselves, one pixel
        // wider than a `(size - 1) / diff` mapping.
        self.x_scale = self.width as f64 / lon_diff;
        self.y_scale = self.height as f64 / lat_diff;
        let factor = lat_diff / (self.bbox.cos_lat() * lon_diff) * self.width as f64
            / self.height as f64;
        if factor < 1.0 {
            // Image is wider than the box: shrink the vertical scale.
            self.y_scale *= factor;
        } else {
            self.x_scale /= factor;
        }
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn rotation(&self) -> i16 {
        self.rotation
    }

    /// Pixels per MC2 unit along each axis.
    pub fn scales(&self) -> (f64, f64) {
        (self.x_scale, self.y_scale)
    }

    pub fn scale_level(&self) -> ScaleLevel {
        ScaleLevel::for_area(self.bbox.area(), self.width, self.height, 1)
    }

    fn half_size(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Image pixel of `coord`. Points far off the image are clamped to twice
    /// the image size before rotation.
    pub fn point(&self, coord: Coordinate) -> Point {
        let x_limit = 2.0 * self.width as f64;
        let y_limit = 2.0 * self.height as f64;
        let ux = (coord.lon.wrapping_sub(self.bbox.min_lon) as f64 * self.x_scale)
            .clamp(-x_limit, x_limit)
            .round() as i32;
        let uy = (self.height as f64
            - (coord.lat as f64 - self.bbox.min_lat as f64) * self.y_scale)
            .clamp(-y_limit, y_limit)
            .round() as i32;
        if self.rotation == 0 {
            return Point::new(ux, uy);
        }
        let (hw, hh) = self.half_size();
        let (sin, cos) = (self.rotation as f64).to_radians().sin_cos();
        let tx = ux as f64 - hw;
        let ty = uy as f64 - hh;
        let rx = cos * tx + sin * ty;
        let ry = -sin * tx + cos * ty;
        Point::new((rx + hw + 0.5).floor() as i32, (ry + hh + 0.5).floor() as i32)
    }

    /// Geographic position of an image pixel, undoing rotation and scale.
    pub fn coordinate(&self, point: Point) -> Coordinate {
        let (mut ux, mut uy) = (point.x as f64, point.y as f64);
        if self.rotation != 0 {
            let (hw, hh) = self.half_size();
            let (sin, cos) = (self.rotation as f64).to_radians().sin_cos();
            let tx = ux - hw;
            let ty = uy - hh;
            ux = cos * tx - sin * ty + hw;
            uy = sin * tx + cos * ty + hh;
        }
        let lat = ((self.height as f64 - uy) / self.y_scale).round() as i64;
        let lon = (ux / self.x_scale).round() as i64;
        Coordinate::new(
            (self.bbox.min_lat as i64 + lat) as i32,
            self.bbox.min_lon.wrapping_add(lon as i32),
        )
    }

    /// Pixel of `coord` on an unbounded image whose origin is (0°, 0°).
    /// Ignores the box offset and the rotation.
    pub fn global_point(&self, coord: Coordinate) -> Point {
        Point::new(
            (coord.lon as f64 * self.x_scale).round() as i32,
            (self.height as f64 - coord.lat as f64 * self.y_scale).round() as i32,
        )
    }

    pub fn global_coordinate(&self, point: Point) -> Coordinate {
        Coordinate::new(
            ((self.height as f64 - point.y as f64) / self.y_scale).round() as i32,
            (point.x as f64 / self.x_scale).round() as i64 as i32,
        )
    }

    /// Latitude span of `y` pixels.
    pub fn lat_diff(&self, y: i32) -> i32 {
        (y as f64 / self.y_scale).round() as i32
    }

    /// Longitude span of `x` pixels.
    pub fn lon_diff(&self, x: i32) -> i32 {
        (x as f64 / self.x_scale).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::Corner;

    fn fit_box() -> BoundingBox {
        BoundingBox::from_bounds(100_000, 0, 0, 200_000)
    }

    #[test]
    fn test_fit_places_corners_on_image_corners() {
        let proj = CosLatProjection::new(fit_box(), 100, 200, 0).unwrap();
        let bbox = *proj.bounding_box();
        assert_eq!(proj.point(bbox.corner(Corner::BottomLeft)), Point::new(0, 100));
        assert_eq!(proj.point(bbox.corner(Corner::TopRight)), Point::new(200, 0));
    }

    #[test]
    fn test_aspect_correction_keeps_proportions() {
        // A square box (at the equator) in a 2:1 image leaves the right half
        // of the image for area east of the box.
        let bbox = BoundingBox::from_bounds(100_000, 0, 0, 100_000);
        let proj = CosLatProjection::new(bbox, 100, 200, 0).unwrap();
        let (xs, ys) = proj.scales();
        approx::assert_relative_eq!(xs, ys, max_relative = 1e-6);
        assert_eq!(proj.point(bbox.corner(Corner::TopRight)), Point::new(100, 0));

        // A tall box in a square image widens instead.
        let bbox = BoundingBox::from_bounds(200_000, 0, 0, 100_000);
        let proj = CosLatProjection::new(bbox, 100, 100, 0).unwrap();
        assert_eq!(proj.point(bbox.corner(Corner::TopRight)), Point::new(50, 0));
    }

    #[test]
    fn test_far_points_are_clamped() {
        let proj = CosLatProjection::new(fit_box(), 100, 200, 0).unwrap();
        let p = proj.point(Coordinate::new(50_000_000, -90_000_000));
        assert_eq!(p, Point::new(-400, -200));
    }

    #[test]
    fn test_far_points_around_small_box_are_clamped() {
        let tiny = BoundingBox::from_bounds(10, 0, 0, 20);
        let proj = CosLatProjection::new(tiny, 1000, 2000, 0).unwrap();
        assert_eq!(proj.point(Coordinate::new(-500_000_000, 5)), Point::new(500, 2000));
        assert_eq!(
            proj.point(Coordinate::new(500_000_000, -400_000_000)),
            Point::new(-4000, -2000)
        );
        assert_eq!(
            proj.point(Coordinate::new(i32::MIN, i32::MAX)),
            Point::new(4000, 2000)
        );
    }

    #[test]
    fn test_roundtrip_with_rotation() {
        for rotation in [0i16, 30, 90, 215] {
            let proj = CosLatProjection::new(fit_box(), 100, 200, rotation).unwrap();
            for &(x, y) in &[(0, 0), (200, 100), (57, 13), (100, 50)] {
                let p = Point::new(x, y);
                let back = proj.point(proj.coordinate(p));
                assert!(
                    (back.x - p.x).abs() <= 1 && (back.y - p.y).abs() <= 1,
                    "rotation {rotation}: {p:?} -> {back:?}"
                );
            }
        }
    }

    #[test]
    fn test_rotation_turns_content_counter_clockwise() {
        let top_middle = Coordinate::new(100_000, 100_000);
        let unrotated = CosLatProjection::new(fit_box(), 100, 200, 0).unwrap();
        assert_eq!(unrotated.point(top_middle), Point::new(100, 0));
        // A quarter turn moves the top edge to the left of the center.
        let rotated = CosLatProjection::new(fit_box(), 100, 200, 90).unwrap();
        assert_eq!(rotated.point(top_middle), Point::new(50, 50));
    }

    #[test]
    fn test_global_point_and_diffs() {
        let proj = CosLatProjection::new(fit_box(), 100, 200, 0).unwrap();
        let c = Coordinate::new(40_000, 60_000);
        let back = proj.global_coordinate(proj.global_point(c));
        assert!((back.lat - c.lat).abs() <= proj.lat_diff(1));
        assert!((back.lon - c.lon).abs() <= proj.lon_diff(1));
        assert_eq!(proj.lat_diff(100), 100_000);
        assert!((proj.lon_diff(200) - 200_000).abs() <= 1);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(CosLatProjection::new(BoundingBox::new(), 100, 100, 0).is_err());
        assert!(CosLatProjection::new(fit_box(), 0, 100, 0).is_err());
        let flat = BoundingBox::from_bounds(0, 0, 0, 1000);
        assert!(CosLatProjection::new(flat, 100, 100, 0).is_err());
    }

    #[test]
    fn test_scale_level() {
        let proj = CosLatProjection::new(fit_box(), 100, 200, 0).unwrap();
        assert_eq!(proj.scale_level(), ScaleLevel::SmallCity);
    }
}
