//! Pixel side of image merging: decode, resize, composite, encode.
//!
//! Geometry comes from [`merge_layout`]; this crate drives the codec calls
//! in plan order. Two execution contexts share that geometry and differ
//! only in their [`Codec`]: a fast in-process canvas with size ceilings and
//! a native codec without them. [`Dispatcher`] picks one and falls back
//! from canvas to native when the canvas is too large.

pub mod codec;
pub mod compose;
pub mod context;
pub mod decode;
pub mod encode;
pub mod merge;
pub mod resize;

use merge_layout::{LayoutError, Size};

// Re-exports for convenience
pub use codec::{CanvasCodec, Codec, NativeCodec};
pub use context::{CanvasLimits, ContextPolicy, Dispatcher, ExecutionContext};
pub use merge::{MergeOutput, merge};

/// Broad classification of a merge failure, for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeErrorKind {
    InvalidInput,
    DecodeFailure,
    CanvasTooLarge,
    EncodeFailure,
}

impl MergeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::DecodeFailure => "DecodeFailure",
            Self::CanvasTooLarge => "CanvasTooLarge",
            Self::EncodeFailure => "EncodeFailure",
        }
    }
}

impl std::fmt::Display for MergeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while merging images.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Invalid input: {0}")]
    InvalidInput(LayoutError),

    #[error("Image {index} could not be decoded: {source}")]
    DecodeFailure {
        index: usize,
        #[source]
        source: image::ImageError,
    },

    #[error("Canvas {canvas} exceeds the {context} limit ({limit})")]
    CanvasTooLarge {
        canvas: Size,
        context: ExecutionContext,
        limit: String,
    },

    #[error("Canvas dimensions overflow")]
    CanvasOverflow,

    #[error("PNG encoding failed: {0}")]
    EncodeFailure(#[source] image::ImageError),
}

impl MergeError {
    pub fn kind(&self) -> MergeErrorKind {
        match self {
            Self::InvalidInput(_) => MergeErrorKind::InvalidInput,
            Self::DecodeFailure { .. } => MergeErrorKind::DecodeFailure,
            Self::CanvasTooLarge { .. } | Self::CanvasOverflow => MergeErrorKind::CanvasTooLarge,
            Self::EncodeFailure(_) => MergeErrorKind::EncodeFailure,
        }
    }
}

impl From<LayoutError> for MergeError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::CanvasOverflow => Self::CanvasOverflow,
            other => Self::InvalidInput(other),
        }
    }
}

/// Result type alias for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;
