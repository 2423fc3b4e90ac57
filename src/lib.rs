//! Map geometry on 32-bit "MC2" angles.
//!
//! Latitude and longitude are `i32` values where the full integer range spans
//! 360°, so longitude differences across the antimeridian come out of plain
//! wrapping subtraction. On top of that the crate provides bounding boxes,
//! a rotating screen transform with an integer fast path, tile and image
//! projections, and viewport clipping.

pub mod batch;
pub mod bbox;
pub mod clip;
pub mod config;
pub mod coord;
pub mod error;
pub mod map_projection;
pub mod pixel_box;
pub mod proj;
pub mod transform;

pub use bbox::{BoundingBox, Corner, Outcode};
pub use clip::{clip_polygon, clip_polyline, ClipEngine, ClipVertex};
pub use config::MapProjectionConfig;
pub use coord::{Coordinate, Point};
pub use error::{CodecError, ProjError};
pub use map_projection::MapProjection;
pub use pixel_box::PixelBox;
pub use proj::{
    BraunProjection, CosLatProjection, MercatorProjection, Projection, ProjectionKind, ScaleLevel,
};
pub use transform::TransformMatrix;
