//! Geographic to screen affine transform.
//!
//! The mapping is `pixel = t_screen · R · S · T_origin(coord)`:
//!   1. `T_origin` moves the view center to the origin (wrapping deltas),
//!   2. `S` scales longitude by `scale·cos_lat` and latitude by `scale`,
//!   3. `R` rotates clockwise by the view angle and mirrors `y` so north is up,
//!   4. `t_screen` moves the origin to the middle of the screen.
//!
//! Three forward paths trade accuracy for speed: a double-precision path that
//! takes the cos-lat from each coordinate, a single-precision path with a
//! caller-supplied cos-lat, and an integer-only path with a pinned cos-lat.

use log::trace;

use crate::coord::{Coordinate, Point, METER_TO_MC2, MC2_TO_RADIANS};

/// Largest magnitude of a fast-path coefficient mantissa.
const MANTISSA_LIMIT: f64 = 0x7fff as f64;

/// Deltas are shifted down until they fit in this many bits.
const DIFF_BITS: u32 = 14;

/// A real coefficient approximated as `mantissa / 2^shift`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct ScaledInt {
    mantissa: i32,
    shift: i32,
}

impl ScaledInt {
    fn new(value: f64) -> Self {
        if value == 0.0 || !value.is_finite() {
            return Self::default();
        }
        let shift = (MANTISSA_LIMIT / value.abs()).log2().floor() as i32;
        let mantissa = (value * 2f64.powi(shift)).round() as i32;
        Self { mantissa, shift }
    }

    /// Approximately `diff * value`, using only integer arithmetic on values
    /// that fit in 32 bits.
    #[inline]
    fn apply(self, diff: i32) -> i32 {
        if self.mantissa == 0 {
            return 0;
        }
        let diff_shift = diff_shift(diff);
        let product = ((diff >> diff_shift) * self.mantissa) as i64;
        let amount = self.shift - diff_shift;
        let result = if amount > 0 {
            let amount = amount.min(31);
            (product + (1i64 << (amount - 1))) >> amount
        } else {
            product << (-amount).min(31)
        };
        result.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

/// Smallest right shift bringing `|diff|` within `DIFF_BITS` bits.
#[inline]
fn diff_shift(diff: i32) -> i32 {
    let bits = 32 - diff.unsigned_abs().leading_zeros();
    bits.saturating_sub(DIFF_BITS) as i32
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct FastTerms {
    x_lon: ScaledInt,
    x_lat: ScaledInt,
    y_lon: ScaledInt,
    y_lat: ScaledInt,
    tx: i32,
    ty: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformMatrix {
    center: Coordinate,
    /// Pixels per MC2 unit of latitude.
    scale: f64,
    angle_deg: f64,
    cos_a: f64,
    sin_a: f64,
    /// Screen position of the center.
    tx: f64,
    ty: f64,
    internal_cos_lat: f64,
    fast: FastTerms,
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self {
            center: Coordinate::new(0, 0),
            scale: 0.0,
            angle_deg: 0.0,
            cos_a: 1.0,
            sin_a: 0.0,
            tx: 0.0,
            ty: 0.0,
            internal_cos_lat: 1.0,
            fast: FastTerms::default(),
        }
    }
}

impl TransformMatrix {
    pub fn new(
        angle_deg: f64,
        meters_per_pixel: f64,
        center: Coordinate,
        screen_width: u32,
        screen_height: u32,
    ) -> Self {
        let mut matrix = Self::default();
        matrix.update(angle_deg, meters_per_pixel, center, screen_width, screen_height);
        matrix
    }

    /// Recompute every coefficient. The internal cos-lat is reset to the
    /// cosine of the center latitude.
    pub fn update(
        &mut self,
        angle_deg: f64,
        meters_per_pixel: f64,
        center: Coordinate,
        screen_width: u32,
        screen_height: u32,
    ) {
        let mc2_per_pixel = meters_per_pixel * METER_TO_MC2;
        self.scale = if mc2_per_pixel > 0.0 {
            1.0 / mc2_per_pixel
        } else {
            0.0
        };
        self.center = center;
        self.angle_deg = angle_deg;
        let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
        self.sin_a = sin_a;
        self.cos_a = cos_a;
        self.tx = screen_width as f64 / 2.0;
        self.ty = screen_height as f64 / 2.0;
        trace!(
            "transform update: angle={angle_deg} m/px={meters_per_pixel} center={:?} screen={}x{}",
            center,
            screen_width,
            screen_height
        );
        self.set_internal_cos_lat(Self::cos_lat(center.lat));
    }

    /// Pin the cos-lat used by
    /// [`transform_point_internal_cos_lat`](Self::transform_point_internal_cos_lat)
    /// and rebuild its integer coefficients.
    pub fn set_internal_cos_lat(&mut self, cos_lat: f64) {
        self.internal_cos_lat = cos_lat;
        let lon_scale = self.scale * cos_lat;
        self.fast = FastTerms {
            x_lon: ScaledInt::new(self.cos_a * lon_scale),
            x_lat: ScaledInt::new(self.sin_a * self.scale),
            y_lon: ScaledInt::new(self.sin_a * lon_scale),
            y_lat: ScaledInt::new(-self.cos_a * self.scale),
            tx: self.tx.round() as i32,
            ty: self.ty.round() as i32,
        };
    }

    pub fn internal_cos_lat(&self) -> f64 {
        self.internal_cos_lat
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Pixels per MC2 unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn angle(&self) -> f64 {
        self.angle_deg
    }

    fn deltas(&self, coord: Coordinate) -> (i32, i32) {
        (
            coord.lon.wrapping_sub(self.center.lon),
            coord.lat.wrapping_sub(self.center.lat),
        )
    }

    fn forward_f64(&self, coord: Coordinate, cos_lat: f64) -> (f64, f64) {
        let (dlon, dlat) = self.deltas(coord);
        let u = self.scale * cos_lat * dlon as f64;
        let v = self.scale * dlat as f64;
        (
            self.cos_a * u + self.sin_a * v + self.tx,
            self.sin_a * u - self.cos_a * v + self.ty,
        )
    }

    /// Rotate a screen position back into scaled `(lon, lat)` space.
    fn unrotate(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x - self.tx;
        let y = y - self.ty;
        (self.cos_a * x + self.sin_a * y, self.sin_a * x - self.cos_a * y)
    }

    /// Double-precision transform with the cos-lat of `coord` itself.
    pub fn transform_point(&self, coord: Coordinate) -> Point {
        let (x, y) = self.forward_f64(coord, Self::cos_lat(coord.lat));
        Point::new(x.round() as i32, y.round() as i32)
    }

    /// Single-precision transform with a caller-supplied cos-lat, typically
    /// one value shared by a whole feature.
    pub fn transform_point_cos_lat_supplied(&self, coord: Coordinate, cos_lat: f32) -> Point {
        let (dlon, dlat) = self.deltas(coord);
        let scale = self.scale as f32;
        let u = scale * cos_lat * dlon as f32;
        let v = scale * dlat as f32;
        let (cos_a, sin_a) = (self.cos_a as f32, self.sin_a as f32);
        let x = cos_a * u + sin_a * v + self.tx as f32;
        let y = sin_a * u - cos_a * v + self.ty as f32;
        Point::new(x.round() as i32, y.round() as i32)
    }

    /// Integer-only transform using the pinned internal cos-lat.
    #[inline]
    pub fn transform_point_internal_cos_lat(&self, coord: Coordinate) -> Point {
        let (dlon, dlat) = self.deltas(coord);
        let f = &self.fast;
        Point::new(
            f.x_lon.apply(dlon) + f.x_lat.apply(dlat) + f.tx,
            f.y_lon.apply(dlon) + f.y_lat.apply(dlat) + f.ty,
        )
    }

    /// Screen to geographic. Latitude is solved first so the longitude can
    /// be scaled by the cos-lat of the result.
    pub fn inverse_transform(&self, point: Point) -> Coordinate {
        let (u, v) = self.unrotate(point.x as f64, point.y as f64);
        let dlat = if self.scale != 0.0 { v / self.scale } else { 0.0 };
        let lat = self.center.lat.wrapping_add(dlat.round() as i32);
        let lon_scale = self.scale * Self::cos_lat(lat);
        let dlon = if lon_scale != 0.0 { u / lon_scale } else { 0.0 };
        Coordinate::new(lat, self.center.lon.wrapping_add(dlon.round() as i64 as i32))
    }

    pub fn inverse_transform_cos_lat_supplied(&self, point: Point, cos_lat: f32) -> Coordinate {
        let (u, v) = self.unrotate(point.x as f64, point.y as f64);
        let lat_scale = self.scale as f32;
        let lon_scale = lat_scale * cos_lat;
        let dlat = if lat_scale != 0.0 { v as f32 / lat_scale } else { 0.0 };
        let dlon = if lon_scale != 0.0 { u as f32 / lon_scale } else { 0.0 };
        Coordinate::new(
            self.center.lat.wrapping_add(dlat.round() as i32),
            self.center.lon.wrapping_add(dlon.round() as i64 as i32),
        )
    }

    /// Continuous inverse in scaled space, used to re-center exactly.
    pub(crate) fn unrotated_offset(&self, point: Point) -> (f64, f64) {
        self.unrotate(point.x as f64, point.y as f64)
    }

    pub fn cos_lat(lat: i32) -> f64 {
        (MC2_TO_RADIANS * lat as f64).cos()
    }

    /// Cosine of the mean of two latitudes, halved first to avoid overflow.
    pub fn cos_lat_between(lat1: i32, lat2: i32) -> f64 {
        Self::cos_lat((lat1 >> 1) + (lat2 >> 1))
    }
}
