//! PNG export of raster buffers.

use crate::raster::RasterBuffer;
use std::io::Write;
use thiserror::Error;

/// Rendering/export errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot export an empty buffer")]
    EmptyBuffer,
}

/// Encode `buffer` as an RGBA8 PNG into `writer`.
pub fn write_png<W: Write>(buffer: &RasterBuffer, writer: W) -> Result<(), RenderError> {
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(RenderError::EmptyBuffer);
    }
    let mut encoder = png::Encoder::new(writer, buffer.width(), buffer.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(buffer.data())?;
    Ok(())
}
