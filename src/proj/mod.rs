pub mod braun;
pub mod codec;
pub mod cos_lat;
pub mod cylindrical;
pub mod mercator;
pub mod scale_level;

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::coord::{Coordinate, Point};
use crate::error::{CodecError, ProjError};

pub use braun::BraunProjection;
pub use cos_lat::CosLatProjection;
pub use mercator::MercatorProjection;
pub use scale_level::ScaleLevel;

/// Projection variant, numbered by its wire tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ProjectionKind {
    CosLat = 0,
    Braun = 1,
    Mercator = 2,
}

impl ProjectionKind {
    pub fn tag(self) -> u32 {
        self as u32
    }

    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(ProjectionKind::CosLat),
            1 => Some(ProjectionKind::Braun),
            2 => Some(ProjectionKind::Mercator),
            _ => None,
        }
    }
}

/// A drawing projection: maps coordinates to pixels of one image or tile.
///
/// The set of variants is closed; every operation dispatches with a `match`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    CosLat(CosLatProjection),
    Braun(BraunProjection),
    Mercator(MercatorProjection),
}

impl Projection {
    pub fn kind(&self) -> ProjectionKind {
        match self {
            Projection::CosLat(_) => ProjectionKind::CosLat,
            Projection::Braun(_) => ProjectionKind::Braun,
            Projection::Mercator(_) => ProjectionKind::Mercator,
        }
    }

    /// Pixel within the image or tile.
    pub fn point(&self, coord: Coordinate) -> Point {
        match self {
            Projection::CosLat(p) => p.point(coord),
            Projection::Braun(p) => p.point(coord),
            Projection::Mercator(p) => p.point(coord),
        }
    }

    /// Pixel in the projection's unbounded global plane.
    pub fn global_point(&self, coord: Coordinate) -> Point {
        match self {
            Projection::CosLat(p) => p.global_point(coord),
            Projection::Braun(p) => p.global_point(coord),
            Projection::Mercator(p) => p.global_point(coord),
        }
    }

    pub fn coordinate(&self, point: Point) -> Coordinate {
        match self {
            Projection::CosLat(p) => p.coordinate(point),
            Projection::Braun(p) => p.coordinate(point),
            Projection::Mercator(p) => p.coordinate(point),
        }
    }

    pub fn global_coordinate(&self, point: Point) -> Coordinate {
        match self {
            Projection::CosLat(p) => p.global_coordinate(point),
            Projection::Braun(p) => p.global_coordinate(point),
            Projection::Mercator(p) => p.global_coordinate(point),
        }
    }

    /// Latitude span, in MC2 units, of `y` pixels.
    pub fn lat_diff(&self, y: i32) -> i32 {
        match self {
            Projection::CosLat(p) => p.lat_diff(y),
            Projection::Braun(p) => p.lat_diff(y),
            Projection::Mercator(p) => p.lat_diff(y),
        }
    }

    /// Longitude span, in MC2 units, of `x` pixels.
    pub fn lon_diff(&self, x: i32) -> i32 {
        match self {
            Projection::CosLat(p) => p.lon_diff(x),
            Projection::Braun(p) => p.lon_diff(x),
            Projection::Mercator(p) => p.lon_diff(x),
        }
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        match self {
            Projection::CosLat(p) => p.bounding_box(),
            Projection::Braun(p) => p.bounding_box(),
            Projection::Mercator(p) => p.bounding_box(),
        }
    }

    /// Area to fetch features from. Tiles pad their box by half a tile; a
    /// free-form image uses its box as is.
    pub fn larger_bounding_box(&self) -> &BoundingBox {
        match self {
            Projection::CosLat(p) => p.bounding_box(),
            Projection::Braun(p) => p.larger_bounding_box(),
            Projection::Mercator(p) => p.larger_bounding_box(),
        }
    }

    pub fn scale_level(&self) -> ScaleLevel {
        match self {
            Projection::CosLat(p) => p.scale_level(),
            Projection::Braun(p) => p.scale_level(),
            Projection::Mercator(p) => p.scale_level(),
        }
    }

    /// Size of the [`encode`](Self::encode)d form in bytes.
    pub fn encoded_size(&self) -> usize {
        codec::encoded_size(self.kind())
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Projection, ProjError> {
        codec::decode(bytes)
    }
}

impl From<CosLatProjection> for Projection {
    fn from(p: CosLatProjection) -> Self {
        Projection::CosLat(p)
    }
}

impl From<BraunProjection> for Projection {
    fn from(p: BraunProjection) -> Self {
        Projection::Braun(p)
    }
}

impl From<MercatorProjection> for Projection {
    fn from(p: MercatorProjection) -> Self {
        Projection::Mercator(p)
    }
}
