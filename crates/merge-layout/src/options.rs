//! Merge request options and whole-batch planning.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::{AlignmentDirective, normalize};
use crate::layout::{GridOverflow, LayoutMode, compute_layout};
use crate::resize::{ResizeSpec, plan_size};
use crate::{LayoutError, Result, Size};

/// Everything about a merge except the pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub layout: LayoutMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizeSpec>,
    pub alignment: AlignmentDirective,
    pub grid_overflow: GridOverflow,
}

impl MergeOptions {
    pub fn builder() -> MergeOptionsBuilder {
        MergeOptionsBuilder::default()
    }

    /// Explicit resize, if one with at least one side set was requested.
    pub fn explicit_resize(&self) -> Option<&ResizeSpec> {
        self.resize.as_ref().filter(|r| !r.is_empty())
    }

    /// True when any image may be resampled before layout.
    pub fn requests_resize(&self) -> bool {
        self.explicit_resize().is_some() || self.alignment != AlignmentDirective::None
    }

    /// Check the options on their own, independent of the batch.
    pub fn validate_parameters(&self) -> Result<()> {
        if let LayoutMode::Grid { rows, cols } = self.layout {
            if rows == 0 || cols == 0 {
                return Err(LayoutError::InvalidGrid { rows, cols });
            }
        }
        if self.resize.is_some_and(|r| r.has_zero()) {
            return Err(LayoutError::InvalidResize);
        }
        Ok(())
    }

    /// Check the options against a batch of `image_count` images.
    pub fn validate(&self, image_count: usize) -> Result<()> {
        if image_count == 0 {
            return Err(LayoutError::Empty);
        }
        self.validate_parameters()?;

        if let LayoutMode::Grid { rows, cols } = self.layout {
            let cells = u64::from(rows) * u64::from(cols);
            if self.grid_overflow == GridOverflow::Reject && image_count as u64 > cells {
                return Err(LayoutError::GridOverflow {
                    count: image_count,
                    rows,
                    cols,
                });
            }
        }
        Ok(())
    }
}

/// Assembles [`MergeOptions`] once per merge action.
#[derive(Debug, Clone, Default)]
pub struct MergeOptionsBuilder {
    options: MergeOptions,
}

impl MergeOptionsBuilder {
    pub fn horizontal(mut self) -> Self {
        self.options.layout = LayoutMode::Horizontal;
        self
    }

    pub fn vertical(mut self) -> Self {
        self.options.layout = LayoutMode::Vertical;
        self
    }

    pub fn grid(mut self, rows: u32, cols: u32) -> Self {
        self.options.layout = LayoutMode::Grid { rows, cols };
        self
    }

    pub fn layout(mut self, layout: LayoutMode) -> Self {
        self.options.layout = layout;
        self
    }

    /// Request an explicit fit-inside resize. Passing `None` for both clears it.
    pub fn resize(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        let spec = ResizeSpec::new(width, height);
        self.options.resize = (!spec.is_empty()).then_some(spec);
        self
    }

    pub fn align(mut self, alignment: AlignmentDirective) -> Self {
        self.options.alignment = alignment;
        self
    }

    pub fn grid_overflow(mut self, policy: GridOverflow) -> Self {
        self.options.grid_overflow = policy;
        self
    }

    pub fn build(self) -> Result<MergeOptions> {
        self.options.validate_parameters()?;
        Ok(self.options)
    }
}

/// One image's journey: natural size, planned size, and canvas offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedImage {
    pub natural: Size,
    pub target: Size,
    pub x: u32,
    pub y: u32,
}

impl PlannedImage {
    pub fn needs_resize(&self) -> bool {
        self.natural != self.target
    }
}

/// Canvas size plus the plan for every image, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePlan {
    pub canvas: Size,
    pub items: Vec<PlannedImage>,
}

impl MergePlan {
    pub fn needs_resize(&self) -> bool {
        self.items.iter().any(PlannedImage::needs_resize)
    }
}

/// Plan a merge: validate, normalize, size each image, then lay out.
///
/// `natural_sizes` must already reflect orientation normalization.
pub fn plan_merge(natural_sizes: &[Size], options: &MergeOptions) -> Result<MergePlan> {
    options.validate(natural_sizes.len())?;
    if let Some(index) = natural_sizes.iter().position(Size::is_empty) {
        return Err(LayoutError::ZeroDimension { index });
    }

    let overrides = normalize(natural_sizes, options.alignment);
    let explicit = options.explicit_resize();

    let targets = natural_sizes
        .iter()
        .zip(overrides)
        .map(|(&natural, alignment)| plan_size(natural, explicit, alignment))
        .collect::<Result<Vec<Size>>>()?;

    let layout = compute_layout(&targets, options.layout)?;

    let items = natural_sizes
        .iter()
        .zip(layout.placements)
        .map(|(&natural, placed)| PlannedImage {
            natural,
            target: Size::new(placed.width, placed.height),
            x: placed.x,
            y: placed.y,
        })
        .collect::<Vec<_>>();

    debug!(
        canvas = %layout.canvas,
        count = items.len(),
        resized = items.iter().filter(|i| i.needs_resize()).count(),
        "Planned merge"
    );

    Ok(MergePlan {
        canvas: layout.canvas,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(list: &[(u32, u32)]) -> Vec<Size> {
        list.iter().copied().map(Size::from).collect()
    }

    #[test]
    fn builder_defaults_to_plain_horizontal() {
        let options = MergeOptions::builder().build().unwrap();
        assert_eq!(options.layout, LayoutMode::Horizontal);
        assert_eq!(options.resize, None);
        assert_eq!(options.alignment, AlignmentDirective::None);
        assert!(!options.requests_resize());
    }

    #[test]
    fn builder_rejects_zero_grid() {
        assert_eq!(
            MergeOptions::builder().grid(0, 2).build(),
            Err(LayoutError::InvalidGrid { rows: 0, cols: 2 })
        );
    }

    #[test]
    fn builder_rejects_zero_resize() {
        assert_eq!(
            MergeOptions::builder().resize(Some(0), None).build(),
            Err(LayoutError::InvalidResize)
        );
    }

    #[test]
    fn builder_drops_empty_resize() {
        let options = MergeOptions::builder().resize(None, None).build().unwrap();
        assert_eq!(options.resize, None);
    }

    #[test]
    fn empty_batch_is_rejected() {
        let options = MergeOptions::default();
        assert_eq!(plan_merge(&[], &options), Err(LayoutError::Empty));
    }

    #[test]
    fn grid_overflow_rejected_by_default() {
        let options = MergeOptions::builder().grid(1, 2).build().unwrap();
        assert_eq!(
            plan_merge(&sizes(&[(10, 10); 3]), &options),
            Err(LayoutError::GridOverflow { count: 3, rows: 1, cols: 2 })
        );
    }

    #[test]
    fn grid_overflow_grows_when_allowed() {
        let options = MergeOptions::builder()
            .grid(1, 2)
            .grid_overflow(GridOverflow::Grow)
            .build()
            .unwrap();
        let plan = plan_merge(&sizes(&[(10, 10); 3]), &options).unwrap();
        assert_eq!(plan.canvas, Size::new(20, 20));
        assert_eq!((plan.items[2].x, plan.items[2].y), (0, 10));
    }

    #[test]
    fn horizontal_without_resize_keeps_natural_sizes() {
        let plan = plan_merge(&sizes(&[(100, 50), (80, 60)]), &MergeOptions::default()).unwrap();
        assert_eq!(plan.canvas, Size::new(180, 60));
        assert!(!plan.needs_resize());
        assert_eq!((plan.items[1].x, plan.items[1].y), (100, 0));
    }

    #[test]
    fn align_width_then_vertical() {
        let options = MergeOptions::builder()
            .vertical()
            .align(AlignmentDirective::Width)
            .build()
            .unwrap();
        let plan = plan_merge(&sizes(&[(100, 50), (200, 80)]), &options).unwrap();

        assert_eq!(plan.items[0].target, Size::new(200, 100));
        assert_eq!(plan.items[1].target, Size::new(200, 80));
        assert_eq!(plan.canvas, Size::new(200, 180));
        assert_eq!((plan.items[1].x, plan.items[1].y), (0, 100));
    }

    #[test]
    fn explicit_resize_applies_to_every_image() {
        let options = MergeOptions::builder()
            .horizontal()
            .resize(None, Some(50))
            .build()
            .unwrap();
        let plan = plan_merge(&sizes(&[(200, 100), (40, 40)]), &options).unwrap();

        // Second image is smaller than the box, so it keeps its natural size.
        assert_eq!(plan.items[0].target, Size::new(100, 50));
        assert_eq!(plan.items[1].target, Size::new(40, 40));
        assert_eq!(plan.canvas, Size::new(140, 50));
    }

    #[test]
    fn oversized_alignment_is_a_canvas_overflow() {
        let options = MergeOptions::builder()
            .vertical()
            .align(AlignmentDirective::Height)
            .build()
            .unwrap();
        assert_eq!(
            plan_merge(&sizes(&[(100_000, 1), (1, 100_000)]), &options),
            Err(LayoutError::CanvasOverflow)
        );
    }

    #[test]
    fn options_parse_from_json() {
        let json = r#"{
            "layout": { "mode": "grid", "rows": 2, "cols": 2 },
            "resize": { "width": 300 },
            "alignment": "height"
        }"#;
        let options: MergeOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.layout, LayoutMode::Grid { rows: 2, cols: 2 });
        assert_eq!(options.resize, Some(ResizeSpec::new(Some(300), None)));
        assert_eq!(options.alignment, AlignmentDirective::Height);
        assert_eq!(options.grid_overflow, GridOverflow::Reject);
    }
}
