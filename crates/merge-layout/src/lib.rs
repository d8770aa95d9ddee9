//! Canvas geometry for merging a batch of images into one canvas.
//!
//! Pure functions over plain sizes: no pixels, no I/O. Both execution
//! contexts (in-process canvas and native codec) call [`plan_merge`], so the
//! geometry they produce is identical.
//!
//! - [`align`]: alignment directive and per-image axis overrides
//! - [`resize`]: explicit resize box and the fit-inside planner
//! - [`layout`]: horizontal / vertical / grid placement
//! - [`options`]: request options, builder, and whole-batch planning

pub mod align;
pub mod layout;
pub mod options;
pub mod resize;

use serde::{Deserialize, Serialize};

pub use align::{AlignmentDirective, AxisOverride, normalize};
pub use layout::{CanvasLayout, GridOverflow, LayoutMode, Placement, compute_layout};
pub use options::{MergeOptions, MergeOptionsBuilder, MergePlan, PlannedImage, plan_merge};
pub use resize::{ResizeSpec, fit_inside, plan_size};

/// Pixel dimensions of an image or canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total pixel count, widened so large canvases cannot overflow.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Errors raised while validating options or computing geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("No images provided")]
    Empty,

    #[error("Image {index} has a zero width or height")]
    ZeroDimension { index: usize },

    #[error("Grid must have at least one row and one column (got {rows}x{cols})")]
    InvalidGrid { rows: u32, cols: u32 },

    #[error("Resize width and height must be positive")]
    InvalidResize,

    #[error("{count} images do not fit a {rows}x{cols} grid")]
    GridOverflow { count: usize, rows: u32, cols: u32 },

    #[error("Unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },

    #[error("Canvas dimensions overflow")]
    CanvasOverflow,
}

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
