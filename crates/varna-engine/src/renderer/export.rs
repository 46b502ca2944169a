//! PNG encoding of a captured frame.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::api::error::VarnaError;
use crate::renderer::traits::PixelBuffer;

/// Encode an RGBA8 frame as PNG bytes.
pub fn export_png(frame: &PixelBuffer) -> Result<Vec<u8>, VarnaError> {
    let expected = PixelBuffer::byte_len(frame.width, frame.height);
    let image = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone()).ok_or(
        VarnaError::BufferSize {
            expected,
            actual: frame.data.len(),
        },
    )?;
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    log::debug!("exported {}x{} frame as png ({} bytes)", frame.width, frame.height, out.get_ref().len());
    Ok(out.into_inner())
}
