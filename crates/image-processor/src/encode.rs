//! Lossless PNG output.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageResult, RgbaImage};
use tracing::debug;

/// Encode an RGBA canvas as PNG.
pub fn encode_png(
    canvas: &RgbaImage,
    compression: CompressionType,
    filter: FilterType,
) -> ImageResult<Vec<u8>> {
    let (width, height) = canvas.dimensions();
    let mut buf = Vec::new();

    PngEncoder::new_with_quality(&mut buf, compression, filter).write_image(
        canvas.as_raw(),
        width,
        height,
        ExtendedColorType::Rgba8,
    )?;

    debug!(width, height, bytes = buf.len(), ?compression, "Encoded PNG");
    Ok(buf)
}
