//! Interactive map view.
//!
//! A [`MapProjection`] owns the view state a caller pans, zooms and rotates
//! (center, scale in meters per pixel, angle, screen size) and keeps a
//! [`TransformMatrix`] in step with it. Every mutation recomputes the matrix
//! wholesale.

use log::debug;

use crate::bbox::BoundingBox;
use crate::config::MapProjectionConfig;
use crate::coord::{degrees_to_mc2, Coordinate, Point, MC2_TO_METER};
use crate::error::ProjError;
use crate::pixel_box::PixelBox;
use crate::transform::TransformMatrix;

#[derive(Clone, Debug, PartialEq)]
pub struct MapProjection {
    config: MapProjectionConfig,
    center: Coordinate,
    width: u32,
    height: u32,
    /// Meters per pixel.
    scale: f64,
    /// Degrees clockwise, in `[0, 360)`.
    angle: f64,
    matrix: TransformMatrix,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self::from_valid_config(MapProjectionConfig::default())
    }
}

impl MapProjection {
    /// A view centered on (0°, 0°) with the configured screen size and
    /// starting scale.
    pub fn new(config: MapProjectionConfig) -> Result<Self, ProjError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: MapProjectionConfig) -> Self {
        let mut view = Self {
            center: Coordinate::new(0, 0),
            width: config.screen_width,
            height: config.screen_height,
            scale: config.scale.clamp(config.min_scale, config.max_scale),
            angle: 0.0,
            matrix: TransformMatrix::default(),
            config,
        };
        view.refresh();
        view
    }

    fn refresh(&mut self) {
        self.matrix
            .update(self.angle, self.scale, self.center, self.width, self.height);
    }

    pub fn config(&self) -> &MapProjectionConfig {
        &self.config
    }

    pub fn matrix(&self) -> &TransformMatrix {
        &self.matrix
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Meters per pixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn screen_center(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Multiply the scale by `factor`: above 1 zooms out, below 1 zooms in.
    pub fn zoom(&mut self, factor: f64) {
        if !(factor > 0.0 && factor.is_finite()) {
            debug!("ignoring zoom by {factor}");
            return;
        }
        self.set_scale(self.scale * factor);
    }

    /// Set meters per pixel, clamped to the configured range.
    pub fn set_scale(&mut self, scale: f64) {
        if !scale.is_finite() {
            debug!("ignoring non-finite scale {scale}");
            return;
        }
        self.scale = scale.clamp(self.config.min_scale, self.config.max_scale);
        self.refresh();
    }

    /// Center the view on `center`. The latitude is kept away from the
    /// poles.
    pub fn set_center(&mut self, center: Coordinate) {
        let limit = degrees_to_mc2(self.config.max_center_lat_deg);
        self.center = Coordinate::new(center.lat.clamp(-limit, limit), center.lon);
        self.refresh();
    }

    pub fn set_angle(&mut self, degrees: f64) {
        if !degrees.is_finite() {
            debug!("ignoring non-finite angle {degrees}");
            return;
        }
        self.angle = degrees.rem_euclid(360.0);
        self.refresh();
    }

    /// Rotate to `degrees` while the map under `pivot` stays put.
    pub fn set_angle_around(&mut self, degrees: f64, pivot: Point) {
        let anchor = self.coordinate_of(pivot);
        self.set_angle(degrees);
        self.set_point(anchor, pivot);
    }

    /// Pan so the map now under screen center + `(dx, dy)` moves to the
    /// screen center.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let anchor = self.screen_center();
        let target = self.coordinate_of(anchor.offset(dx, dy));
        self.set_point(target, anchor);
    }

    /// Re-center so `coord` is drawn at `point`, keeping scale and angle.
    pub fn set_point(&mut self, coord: Coordinate, point: Point) {
        let px_per_mc2 = self.matrix.scale();
        if px_per_mc2 == 0.0 {
            self.set_center(coord);
            return;
        }
        let (u, v) = self.matrix.unrotated_offset(point);
        let lat = (coord.lat as f64 - v / px_per_mc2).clamp(i32::MIN as f64, i32::MAX as f64);
        let lon_scale = px_per_mc2 * TransformMatrix::cos_lat(coord.lat);
        let dlon = if lon_scale != 0.0 { u / lon_scale } else { 0.0 };
        self.set_center(Coordinate::new(
            lat.round() as i32,
            coord.lon.wrapping_sub(dlon.round() as i64 as i32),
        ));
    }

    /// Zoom to show the screen rectangle spanned by `c1` and `c2`. The
    /// current rotation is kept but not taken into account when fitting.
    pub fn set_pixel_box(&mut self, c1: Point, c2: Point) {
        let pixels = PixelBox::new(c1, c2);
        let center = self.coordinate_of(pixels.center());
        let factor = (pixels.width() as f64 / self.width as f64)
            .max(pixels.height() as f64 / self.height as f64);
        debug!("fitting pixel box {pixels:?}, scale factor {factor}");
        self.zoom(factor);
        self.set_center(center);
    }

    /// Meters per pixel that fit `bbox` into a `width` x `height` screen,
    /// leaving slack on the axis where the aspect ratios differ. Rotation is
    /// not considered.
    pub fn scale_from_bbox_and_size(bbox: &BoundingBox, width: u32, height: u32) -> Option<f64> {
        if !bbox.is_valid() || width == 0 || height == 0 {
            return None;
        }
        let cos_lat = TransformMatrix::cos_lat_between(bbox.max_lat, bbox.min_lat);
        let lat_m = (bbox.max_lat as f64 - bbox.min_lat as f64) * MC2_TO_METER;
        let lon_m = bbox.lon_diff() as u32 as f64 * MC2_TO_METER * cos_lat;
        Some((lat_m / height as f64).max(lon_m / width as f64))
    }

    /// Center on `bbox` and zoom so all of it is visible.
    pub fn set_bounding_box(&mut self, bbox: &BoundingBox) {
        let Some(center) = bbox.center() else {
            debug!("ignoring empty bounding box");
            return;
        };
        if let Some(scale) = Self::scale_from_bbox_and_size(bbox, self.width, self.height) {
            self.set_scale(scale);
        }
        self.set_center(center);
    }

    /// Geographic box covering the whole screen, rotation included.
    pub fn bounding_box(&self) -> BoundingBox {
        let (w, h) = (self.width as i32, self.height as i32);
        let mut bbox = BoundingBox::new();
        for corner in [
            Point::new(0, 0),
            Point::new(w, 0),
            Point::new(0, h),
            Point::new(w, h),
        ] {
            bbox.update_deferred(self.coordinate_of(corner));
        }
        bbox.update_cos_lat();
        bbox
    }

    /// Resize the screen, keeping center, scale and angle.
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.refresh();
    }

    pub fn point_of(&self, coord: Coordinate) -> Point {
        self.matrix.transform_point(coord)
    }

    /// Integer-only projection with the cos-lat of the view center. Within a
    /// couple of pixels of [`point_of`](Self::point_of) near the center.
    pub fn fast_point_of(&self, coord: Coordinate) -> Point {
        self.matrix.transform_point_internal_cos_lat(coord)
    }

    pub fn coordinate_of(&self, point: Point) -> Coordinate {
        self.matrix.inverse_transform(point)
    }
}
