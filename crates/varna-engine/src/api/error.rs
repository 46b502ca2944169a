use thiserror::Error;

/// Everything that can go wrong inside the field. None of these are fatal:
/// the driver recovers from each and keeps the last renderable pool.
#[derive(Debug, Error)]
pub enum VarnaError {
    #[error("invalid field config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("label {label:?} rasterized to zero lit pixels")]
    EmptySample { label: String },

    #[error("fonts are not ready for glyph sampling")]
    FontsNotReady,

    #[error("glyph rasterization failed: {0}")]
    Raster(String),

    #[error("canvas call failed: {0}")]
    Canvas(String),

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[cfg(feature = "png")]
    #[error("frame export failed: {0}")]
    Export(#[from] image::ImageError),
}
