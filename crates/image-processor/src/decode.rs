//! Decoding with orientation normalization.
//!
//! Embedded orientation metadata is applied before anything reads the
//! image's dimensions, so portrait photos stored sideways lay out correctly.

use std::io::Cursor;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, ImageResult};
use tracing::debug;

/// Decode `bytes` (format sniffed from content) and apply its orientation.
///
/// With `unlimited` set the decoder's allocation and dimension limits are
/// removed.
pub fn decode_oriented(bytes: &[u8], unlimited: bool) -> ImageResult<DynamicImage> {
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if unlimited {
        reader.no_limits();
    }

    let mut decoder = reader.into_decoder()?;
    let orientation = decoder.orientation()?;
    let img = DynamicImage::from_decoder(decoder)?;

    Ok(normalize_orientation(img, orientation))
}

/// Apply `orientation` so the pixels are stored upright.
pub fn normalize_orientation(mut img: DynamicImage, orientation: Orientation) -> DynamicImage {
    if orientation == Orientation::NoTransforms {
        return img;
    }

    let (w, h) = (img.width(), img.height());
    debug!(w, h, ?orientation, "Applying embedded orientation");
    img.apply_orientation(orientation);
    img
}

/// Copy of `png` with an `eXIf` chunk carrying `orientation` inserted after IHDR.
#[cfg(test)]
pub(crate) fn with_exif_orientation(png: &[u8], orientation: u16) -> Vec<u8> {
    // Big-endian TIFF header, one IFD with a single SHORT orientation entry.
    let mut exif = b"MM\x00\x2a\x00\x00\x00\x08\x00\x01\x01\x12\x00\x03\x00\x00\x00\x01".to_vec();
    exif.extend_from_slice(&orientation.to_be_bytes());
    exif.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

    let mut chunk = Vec::new();
    chunk.extend_from_slice(&(exif.len() as u32).to_be_bytes());
    chunk.extend_from_slice(b"eXIf");
    chunk.extend_from_slice(&exif);
    chunk.extend_from_slice(&crc32(&chunk[4..]).to_be_bytes());

    // Signature (8) + IHDR (4 length + 4 type + 13 data + 4 crc).
    let ihdr_end = 8 + 25;
    let mut out = png[..ihdr_end].to_vec();
    out.extend_from_slice(&chunk);
    out.extend_from_slice(&png[ihdr_end..]);
    out
}

#[cfg(test)]
fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in bytes {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}
