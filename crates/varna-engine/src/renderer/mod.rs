pub mod color;
#[cfg(feature = "png")]
pub mod export;
pub mod pixel;
pub mod traits;
