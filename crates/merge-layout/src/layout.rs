//! Layout engine: canvas size and per-image offsets for each layout mode.
//!
//! All images are anchored top-left in their strip position or grid cell.
//! There is no centering, padding, or gutter.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{LayoutError, Result, Size};

/// How images are arranged on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LayoutMode {
    /// Left to right, top-aligned.
    #[default]
    Horizontal,
    /// Top to bottom, left-aligned.
    Vertical,
    /// Row-major uniform grid; every cell is sized to the largest image.
    Grid { rows: u32, cols: u32 },
}

impl LayoutMode {
    /// Build a mode from its text name plus optional grid parameters.
    pub fn from_parts(name: &str, rows: Option<u32>, cols: Option<u32>) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            "grid" => match (rows, cols) {
                (Some(rows), Some(cols)) if rows > 0 && cols > 0 => Ok(Self::Grid { rows, cols }),
                (rows, cols) => Err(LayoutError::InvalidGrid {
                    rows: rows.unwrap_or(0),
                    cols: cols.unwrap_or(0),
                }),
            },
            other => Err(LayoutError::UnknownValue {
                field: "layout",
                value: other.to_string(),
            }),
        }
    }
}

/// What happens when a grid receives more images than it has cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridOverflow {
    /// Excess images are an input error.
    #[default]
    Reject,
    /// Excess images continue row-major and the canvas gains rows.
    Grow,
}

impl FromStr for GridOverflow {
    type Err = LayoutError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "reject" => Ok(Self::Reject),
            "grow" => Ok(Self::Grow),
            other => Err(LayoutError::UnknownValue {
                field: "overflow",
                value: other.to_string(),
            }),
        }
    }
}

/// Offset and size of one image on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// True when the placed rectangle lies entirely inside `canvas`.
    pub fn fits_within(&self, canvas: Size) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(canvas.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(canvas.height)
    }
}

/// Canvas size plus one placement per input image, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasLayout {
    pub canvas: Size,
    pub placements: Vec<Placement>,
}

/// Lay out `sizes` (already resized, in input order) according to `mode`.
pub fn compute_layout(sizes: &[Size], mode: LayoutMode) -> Result<CanvasLayout> {
    if sizes.is_empty() {
        return Err(LayoutError::Empty);
    }
    if let Some(index) = sizes.iter().position(Size::is_empty) {
        return Err(LayoutError::ZeroDimension { index });
    }

    let layout = match mode {
        LayoutMode::Horizontal => strip(sizes, Axis::X)?,
        LayoutMode::Vertical => strip(sizes, Axis::Y)?,
        LayoutMode::Grid { rows, cols } => grid(sizes, rows, cols)?,
    };

    debug!(
        ?mode,
        count = sizes.len(),
        canvas = %layout.canvas,
        "Computed canvas layout"
    );
    Ok(layout)
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn strip(sizes: &[Size], axis: Axis) -> Result<CanvasLayout> {
    let mut cursor = 0u32;
    let mut cross = 0u32;
    let mut placements = Vec::with_capacity(sizes.len());

    for size in sizes {
        let (along, across) = match axis {
            Axis::X => (size.width, size.height),
            Axis::Y => (size.height, size.width),
        };
        let (x, y) = match axis {
            Axis::X => (cursor, 0),
            Axis::Y => (0, cursor),
        };
        placements.push(Placement {
            x,
            y,
            width: size.width,
            height: size.height,
        });
        cursor = cursor
            .checked_add(along)
            .ok_or(LayoutError::CanvasOverflow)?;
        cross = cross.max(across);
    }

    let canvas = match axis {
        Axis::X => Size::new(cursor, cross),
        Axis::Y => Size::new(cross, cursor),
    };
    Ok(CanvasLayout { canvas, placements })
}

fn grid(sizes: &[Size], rows: u32, cols: u32) -> Result<CanvasLayout> {
    if rows == 0 || cols == 0 {
        return Err(LayoutError::InvalidGrid { rows, cols });
    }

    let cell_width = sizes.iter().map(|s| s.width).max().unwrap_or(0);
    let cell_height = sizes.iter().map(|s| s.height).max().unwrap_or(0);

    // Rows needed to hold every image; equals `rows` unless the grid overflows.
    let count = u32::try_from(sizes.len()).map_err(|_| LayoutError::CanvasOverflow)?;
    let used_rows = rows.max(count.div_ceil(cols));

    let canvas = Size::new(
        cell_width
            .checked_mul(cols)
            .ok_or(LayoutError::CanvasOverflow)?,
        cell_height
            .checked_mul(used_rows)
            .ok_or(LayoutError::CanvasOverflow)?,
    );

    let placements = sizes
        .iter()
        .zip(0u32..)
        .map(|(size, i)| Placement {
            x: (i % cols) * cell_width,
            y: (i / cols) * cell_height,
            width: size.width,
            height: size.height,
        })
        .collect();

    Ok(CanvasLayout { canvas, placements })
}
