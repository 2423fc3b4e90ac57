//! Flat binary form of a projection's construction parameters.
//!
//! Fixed-width little-endian fields, led by a `u32` variant tag:
//!
//! | variant  | layout                                                     | bytes |
//! |----------|------------------------------------------------------------|-------|
//! | CosLat   | tag, bbox, height i32, width i32, rotation i16             | 30    |
//! | Braun    | tag, bbox, x_pixel i32, y_pixel i32, zoom i32, tile i32    | 36    |
//! | Mercator | same as Braun                                              | 36    |
//!
//! A bbox is `max_lat, min_lon, min_lat, max_lon` as four `i32`. For the tile
//! projections it is informational; decoding rebuilds it from the tile
//! address.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::{CodecError, ProjError};
use crate::proj::braun::BraunProjection;
use crate::proj::cos_lat::CosLatProjection;
use crate::proj::cylindrical::{CylinderFormula, CylindricalProjection};
use crate::proj::mercator::MercatorProjection;
use crate::proj::{Projection, ProjectionKind};

const TAG_SIZE: usize = 4;
const BBOX_SIZE: usize = 16;

pub const COS_LAT_SIZE: usize = TAG_SIZE + BBOX_SIZE + 4 + 4 + 2;
pub const CYLINDRICAL_SIZE: usize = TAG_SIZE + BBOX_SIZE + 4 * 4;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct WireBBox {
    max_lat: i32,
    min_lon: i32,
    min_lat: i32,
    max_lon: i32,
}

impl From<&BoundingBox> for WireBBox {
    fn from(b: &BoundingBox) -> Self {
        Self {
            max_lat: b.max_lat,
            min_lon: b.min_lon,
            min_lat: b.min_lat,
            max_lon: b.max_lon,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct WireTile {
    bbox: WireBBox,
    x_pixel: i32,
    y_pixel: i32,
    zoom: i32,
    tile_size: i32,
}

impl<F: CylinderFormula> From<&CylindricalProjection<F>> for WireTile {
    fn from(p: &CylindricalProjection<F>) -> Self {
        Self {
            bbox: p.bounding_box().into(),
            x_pixel: p.x_pixel(),
            y_pixel: p.y_pixel(),
            zoom: p.zoom(),
            tile_size: p.tile_size(),
        }
    }
}

/// Variant order fixes the tags and must match [`ProjectionKind`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
enum WireProjection {
    CosLat {
        bbox: WireBBox,
        height: i32,
        width: i32,
        rotation: i16,
    },
    Braun(WireTile),
    Mercator(WireTile),
}

pub fn encoded_size(kind: ProjectionKind) -> usize {
    match kind {
        ProjectionKind::CosLat => COS_LAT_SIZE,
        ProjectionKind::Braun | ProjectionKind::Mercator => CYLINDRICAL_SIZE,
    }
}

pub fn encode(projection: &Projection) -> Result<Vec<u8>, CodecError> {
    let wire = match projection {
        Projection::CosLat(p) => WireProjection::CosLat {
            bbox: p.bounding_box().into(),
            height: p.height(),
            width: p.width(),
            rotation: p.rotation(),
        },
        Projection::Braun(p) => WireProjection::Braun(p.into()),
        Projection::Mercator(p) => WireProjection::Mercator(p.into()),
    };
    Ok(bincode::serialize(&wire)?)
}

/// Rebuild a projection from the front of `bytes`. Trailing bytes are
/// ignored; [`encoded_size`] tells how many were consumed.
pub fn decode(bytes: &[u8]) -> Result<Projection, ProjError> {
    let tag_bytes: [u8; TAG_SIZE] = bytes
        .get(..TAG_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or(CodecError::Truncated { len: bytes.len() })?;
    let tag = u32::from_le_bytes(tag_bytes);
    let kind = ProjectionKind::from_tag(tag).ok_or_else(|| {
        warn!("cannot decode projection with unknown tag {tag}");
        CodecError::UnknownProjection(tag)
    })?;
    if bytes.len() < encoded_size(kind) {
        return Err(CodecError::Truncated { len: bytes.len() }.into());
    }

    let wire: WireProjection = bincode::deserialize(bytes).map_err(CodecError::from)?;
    let projection = match wire {
        WireProjection::CosLat {
            bbox,
            height,
            width,
            rotation,
        } => {
            let bbox = BoundingBox::from_bounds(bbox.max_lat, bbox.min_lon, bbox.min_lat, bbox.max_lon);
            Projection::CosLat(CosLatProjection::new(bbox, height, width, rotation)?)
        }
        WireProjection::Braun(t) => Projection::Braun(BraunProjection::new(
            t.x_pixel,
            t.y_pixel,
            t.zoom,
            t.tile_size,
        )?),
        WireProjection::Mercator(t) => Projection::Mercator(MercatorProjection::new(
            t.x_pixel,
            t.y_pixel,
            t.zoom,
            t.tile_size,
        )?),
    };
    Ok(projection)
}
