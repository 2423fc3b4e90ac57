//! Tiled cylindrical projections.
//!
//! The world is a square grid of `10 · 2^(zoom-1)` tiles per axis, each
//! `tile_size` pixels wide, centered on (0°, 0°). Global pixel `x` grows east
//! and global pixel `y` grows north; a tile is addressed by the global pixel
//! of its south-west corner. Within a tile, local `y` grows downward.
//!
//! Braun and Mercator differ only in how latitude maps to `y`; that part is
//! supplied by a [`CylinderFormula`].

use std::fmt;
use std::marker::PhantomData;

use log::warn;

use crate::bbox::BoundingBox;
use crate::coord::{radians_to_mc2, Coordinate, Point, MC2_TO_RADIANS};
use crate::error::ProjError;
use crate::proj::scale_level::ScaleLevel;
use crate::proj::ProjectionKind;

pub const NBR_ZOOM_LEVELS: i32 = 15;

/// Smallest tile edge accepted by [`is_valid_tile_size`].
pub const MIN_TILE_SIZE: i32 = 32;

/// Latitude-to-`y` mapping of one cylindrical projection.
pub trait CylinderFormula: Copy + Default + fmt::Debug + Send + Sync + 'static {
    const KIND: ProjectionKind;

    /// Scale level index for zoom levels `1..=NBR_ZOOM_LEVELS`.
    const SCALE_LEVELS: [u8; NBR_ZOOM_LEVELS as usize];

    /// Northing on a cylinder of `radius` for latitude `lat` in radians.
    fn forward_y(lat: f64, radius: f64) -> f64;

    /// Latitude in radians for northing `y`.
    fn inverse_y(y: f64, radius: f64) -> f64;
}

/// Tiles per axis at `zoom`, which must be in `1..=NBR_ZOOM_LEVELS`.
pub fn squares_at_zoom(zoom: i32) -> i32 {
    10 << (zoom - 1)
}

/// Tile sizes must be even and at least [`MIN_TILE_SIZE`] pixels.
pub fn is_valid_tile_size(tile_size: i32) -> bool {
    tile_size % 2 == 0 && tile_size >= MIN_TILE_SIZE
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylindricalProjection<F: CylinderFormula> {
    x_pixel: i32,
    y_pixel: i32,
    zoom: i32,
    tile_size: i32,
    lat_squares: i32,
    lon_squares: i32,
    radius: f64,
    bbox: BoundingBox,
    larger_bbox: BoundingBox,
    formula: PhantomData<F>,
}

impl<F: CylinderFormula> CylindricalProjection<F> {
    /// Projection for the tile whose south-west corner is global pixel
    /// (`x_pixel`, `y_pixel`).
    pub fn new(x_pixel: i32, y_pixel: i32, zoom: i32, tile_size: i32) -> Result<Self, ProjError> {
        validate_tile(x_pixel, y_pixel, zoom, tile_size).inspect_err(|e| {
            warn!("rejected {:?} tile: {e}", F::KIND);
        })?;
        let squares = squares_at_zoom(zoom);
        let mut proj = Self {
            x_pixel,
            y_pixel,
            zoom,
            tile_size,
            lat_squares: squares,
            lon_squares: squares,
            radius: squares as f64 * tile_size as f64 / 2.0 / std::f64::consts::PI,
            bbox: BoundingBox::new(),
            larger_bbox: BoundingBox::new(),
            formula: PhantomData,
        };
        proj.create_bounding_boxes();
        Ok(proj)
    }

    fn create_bounding_boxes(&mut self) {
        let lower = self.global_coordinate(Point::new(self.x_pixel, self.y_pixel));
        let upper = self.global_coordinate(Point::new(
            self.x_pixel + self.tile_size,
            self.y_pixel + self.tile_size,
        ));
        self.bbox = BoundingBox::from_bounds(upper.lat, lower.lon, lower.lat, upper.lon);

        let half = self.tile_size / 2;
        let lat_pad = self.lat_diff(half);
        let lon_pad = self.lon_diff(half);
        self.larger_bbox = BoundingBox::from_bounds(
            upper.lat.saturating_add(lat_pad),
            lower.lon.wrapping_sub(lon_pad),
            lower.lat.saturating_sub(lat_pad),
            upper.lon.wrapping_add(lon_pad),
        );
    }

    pub fn kind(&self) -> ProjectionKind {
        F::KIND
    }

    pub fn x_pixel(&self) -> i32 {
        self.x_pixel
    }

    pub fn y_pixel(&self) -> i32 {
        self.y_pixel
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn lat_squares(&self) -> i32 {
        self.lat_squares
    }

    pub fn lon_squares(&self) -> i32 {
        self.lon_squares
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// The tile's box padded by half a tile on every side, for fetching
    /// features whose symbols bleed into the tile.
    pub fn larger_bounding_box(&self) -> &BoundingBox {
        &self.larger_bbox
    }

    pub fn scale_level(&self) -> ScaleLevel {
        let index = usize::try_from(self.zoom - 1)
            .ok()
            .and_then(|i| F::SCALE_LEVELS.get(i).copied())
            .unwrap_or(ScaleLevel::DetailedStreet as u8);
        ScaleLevel::from_index(index as usize)
    }

    fn global_xy(&self, coord: Coordinate) -> (f64, f64) {
        let lat = coord.lat as f64 * MC2_TO_RADIANS;
        let lon = coord.lon as f64 * MC2_TO_RADIANS;
        (lon * self.radius, F::forward_y(lat, self.radius))
    }

    /// Position in global pixels, `y` growing north.
    pub fn global_point(&self, coord: Coordinate) -> Point {
        let (x, y) = self.global_xy(coord);
        Point::new(x.round() as i32, y.round() as i32)
    }

    pub fn global_coordinate(&self, point: Point) -> Coordinate {
        let lat = F::inverse_y(point.y as f64, self.radius);
        let lon = point.x as f64 / self.radius;
        Coordinate::new(radians_to_mc2(lat), radians_to_mc2(lon))
    }

    /// Position within the tile, origin top-left. Longitude is measured from
    /// the tile's west edge so tiles on the antimeridian stay continuous.
    pub fn point(&self, coord: Coordinate) -> Point {
        let west = self.bbox.min_lon as f64 * MC2_TO_RADIANS * self.radius;
        let east_of_west =
            coord.lon.wrapping_sub(self.bbox.min_lon) as f64 * MC2_TO_RADIANS * self.radius;
        let x = (east_of_west + west - self.x_pixel as f64).round() as i32;
        let (_, gy) = self.global_xy(coord);
        // Stay in f64 until the end: near the poles `gy` is huge.
        let y = (self.tile_size as f64 - (gy - self.y_pixel as f64)).round() as i32;
        Point::new(x, y)
    }

    pub fn coordinate(&self, point: Point) -> Coordinate {
        self.global_coordinate(Point::new(
            point.x.saturating_add(self.x_pixel),
            (self.y_pixel + self.tile_size).saturating_sub(point.y),
        ))
    }

    /// Latitude span of `y` pixels at the tile's edges, taking the larger of
    /// the south and north side.
    pub fn lat_diff(&self, y: i32) -> i32 {
        let (south, north) = self.edge_coordinates(y);
        let below = self.bbox.min_lat.saturating_sub(south.lat);
        let above = north.lat.saturating_sub(self.bbox.max_lat);
        below.max(above).max(0)
    }

    pub fn lon_diff(&self, x: i32) -> i32 {
        let (south, north) = self.edge_coordinates(x);
        let west = self.bbox.min_lon.wrapping_sub(south.lon);
        let east = north.lon.wrapping_sub(self.bbox.max_lon);
        west.max(east).max(0)
    }

    /// Coordinates `d` pixels diagonally outside the south-west and
    /// north-east corners.
    fn edge_coordinates(&self, d: i32) -> (Coordinate, Coordinate) {
        let sw = self.global_point(Coordinate::new(self.bbox.min_lat, self.bbox.min_lon));
        let ne = self.global_point(Coordinate::new(self.bbox.max_lat, self.bbox.max_lon));
        (
            self.global_coordinate(sw.offset(-d, -d)),
            self.global_coordinate(ne.offset(d, d)),
        )
    }
}

fn validate_tile(x_pixel: i32, y_pixel: i32, zoom: i32, tile_size: i32) -> Result<(), ProjError> {
    if !(1..=NBR_ZOOM_LEVELS).contains(&zoom) {
        return Err(ProjError::InvalidZoom(zoom));
    }
    if !is_valid_tile_size(tile_size) {
        return Err(ProjError::InvalidTileSize(tile_size));
    }
    if x_pixel % tile_size != 0 || y_pixel % tile_size != 0 {
        return Err(ProjError::MisalignedTile {
            x: x_pixel,
            y: y_pixel,
            tile_size,
        });
    }
    let half = squares_at_zoom(zoom) as i64 * tile_size as i64 / 2;
    let range = -half..=half - tile_size as i64;
    if !range.contains(&(x_pixel as i64)) || !range.contains(&(y_pixel as i64)) {
        return Err(ProjError::TileOutOfRange {
            x: x_pixel,
            y: y_pixel,
            zoom,
        });
    }
    Ok(())
}
