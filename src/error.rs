use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjError {
    #[error("Zoom level {0} outside 1..={max}", max = crate::proj::cylindrical::NBR_ZOOM_LEVELS)]
    InvalidZoom(i32),

    #[error("Invalid tile size {0}: must be even and at least 32 pixels")]
    InvalidTileSize(i32),

    #[error("Tile address ({x}, {y}) is not a multiple of the tile size {tile_size}")]
    MisalignedTile { x: i32, y: i32, tile_size: i32 },

    #[error("Tile address ({x}, {y}) outside the zoom {zoom} grid")]
    TileOutOfRange { x: i32, y: i32, zoom: i32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unknown projection tag {0}")]
    UnknownProjection(u32),

    #[error("Buffer too short: {len} bytes")]
    Truncated { len: usize },

    #[error("Binary encoding failed: {0}")]
    Bincode(#[from] bincode::Error),
}
