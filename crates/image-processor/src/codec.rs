//! Delegated codec interface and its two implementations.
//!
//! The orchestrator only ever talks to [`Codec`]. Swapping the codec swaps
//! the execution context; the geometry stays the same.

use image::codecs::png::{CompressionType, FilterType as PngFilter};
use image::error::{DecodingError, ImageFormatHint};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageResult, RgbaImage};
use merge_layout::Size;
use tracing::debug;

use crate::context::{CanvasLimits, ExecutionContext};
use crate::{MergeError, compose, decode, encode, resize};

/// Decode, resize, composite, and encode primitives for one execution context.
pub trait Codec: Send + Sync {
    fn context(&self) -> ExecutionContext;

    /// Decode one source, orientation already applied.
    fn decode(&self, bytes: &[u8]) -> ImageResult<DynamicImage>;

    /// Decode every source. Results come back in input order.
    fn decode_batch(&self, sources: &[&[u8]]) -> Vec<ImageResult<DynamicImage>> {
        sources.iter().map(|bytes| self.decode(bytes)).collect()
    }

    /// Resample to exactly `target`.
    fn resize(&self, image: &DynamicImage, target: Size) -> DynamicImage;

    /// Reject canvases this context cannot hold.
    fn check_canvas(&self, canvas: Size) -> Result<(), MergeError>;

    /// Allocate a transparent canvas after [`Codec::check_canvas`] passes.
    fn create_canvas(&self, canvas: Size) -> Result<RgbaImage, MergeError> {
        self.check_canvas(canvas)?;
        Ok(compose::new_canvas(canvas))
    }

    fn composite(&self, canvas: &mut RgbaImage, image: &DynamicImage, x: u32, y: u32) {
        compose::composite(canvas, image, x, y);
    }

    fn encode_png(&self, canvas: &RgbaImage) -> ImageResult<Vec<u8>>;
}

/// Fast in-process canvas context.
///
/// Loads every source concurrently, resamples bilinearly, and refuses
/// canvases beyond its [`CanvasLimits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasCodec {
    limits: CanvasLimits,
}

impl CanvasCodec {
    pub fn new(limits: CanvasLimits) -> Self {
        Self { limits }
    }
}

impl Codec for CanvasCodec {
    fn context(&self) -> ExecutionContext {
        ExecutionContext::Canvas
    }

    fn decode(&self, bytes: &[u8]) -> ImageResult<DynamicImage> {
        decode::decode_oriented(bytes, false)
    }

    fn decode_batch(&self, sources: &[&[u8]]) -> Vec<ImageResult<DynamicImage>> {
        debug!(count = sources.len(), "Loading sources concurrently");
        std::thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|bytes| scope.spawn(move || self.decode(bytes)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|_| Err(loader_panicked())))
                .collect()
        })
    }

    fn resize(&self, image: &DynamicImage, target: Size) -> DynamicImage {
        resize::resize_to(image, target, FilterType::Triangle)
    }

    fn check_canvas(&self, canvas: Size) -> Result<(), MergeError> {
        if self.limits.admits(canvas) {
            return Ok(());
        }
        Err(MergeError::CanvasTooLarge {
            canvas,
            context: self.context(),
            limit: self.limits.to_string(),
        })
    }

    fn encode_png(&self, canvas: &RgbaImage) -> ImageResult<Vec<u8>> {
        encode::encode_png(canvas, CompressionType::Default, PngFilter::Adaptive)
    }
}

/// Native codec context.
///
/// Decoder limits removed, Lanczos3 resampling, uncompressed PNG output.
/// Canvases are bounded only by addressable memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

impl NativeCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for NativeCodec {
    fn context(&self) -> ExecutionContext {
        ExecutionContext::Native
    }

    fn decode(&self, bytes: &[u8]) -> ImageResult<DynamicImage> {
        decode::decode_oriented(bytes, true)
    }

    fn resize(&self, image: &DynamicImage, target: Size) -> DynamicImage {
        resize::resize_to(image, target, FilterType::Lanczos3)
    }

    fn check_canvas(&self, canvas: Size) -> Result<(), MergeError> {
        // RGBA buffer length must be addressable.
        let addressable = canvas
            .area()
            .checked_mul(4)
            .is_some_and(|bytes| usize::try_from(bytes).is_ok_and(|b| b <= isize::MAX as usize));
        if addressable {
            return Ok(());
        }
        Err(MergeError::CanvasTooLarge {
            canvas,
            context: self.context(),
            limit: "addressable memory".to_string(),
        })
    }

    fn encode_png(&self, canvas: &RgbaImage) -> ImageResult<Vec<u8>> {
        encode::encode_png(canvas, CompressionType::Uncompressed, PngFilter::NoFilter)
    }
}

fn loader_panicked() -> ImageError {
    ImageError::Decoding(DecodingError::new(
        ImageFormatHint::Unknown,
        "image loader thread panicked",
    ))
}
