//! Resize planner: final per-image size under the fit-inside policy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::AxisOverride;
use crate::{LayoutError, Result, Size};

/// Explicit target box requested by the caller. Either side may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ResizeSpec {
    pub const fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self { width, height }
    }

    /// True when neither side is set, i.e. no explicit resize applies.
    pub const fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// True when a set side is zero.
    pub fn has_zero(&self) -> bool {
        self.width == Some(0) || self.height == Some(0)
    }
}

/// Scale `natural` to fit inside the requested box, preserving aspect ratio.
///
/// With one side given the scale is constrained on that axis only; with both
/// the image fits the box and may fall short of it on one axis. When
/// `allow_enlarge` is false a scale above 1 leaves the natural size untouched.
///
/// Fails with [`LayoutError::CanvasOverflow`] when the derived side does not
/// fit in a `u32`.
pub fn fit_inside(
    natural: Size,
    width: Option<u32>,
    height: Option<u32>,
    allow_enlarge: bool,
) -> Result<Size> {
    let nw = f64::from(natural.width.max(1));
    let nh = f64::from(natural.height.max(1));

    let (scale, pinned) = match (width, height) {
        (None, None) => return Ok(natural),
        (Some(w), None) => (f64::from(w) / nw, Pinned::Width(w)),
        (None, Some(h)) => (f64::from(h) / nh, Pinned::Height(h)),
        (Some(w), Some(h)) => {
            let xs = f64::from(w) / nw;
            let ys = f64::from(h) / nh;
            if xs <= ys {
                (xs, Pinned::Width(w))
            } else {
                (ys, Pinned::Height(h))
            }
        }
    };

    if !allow_enlarge && scale >= 1.0 {
        debug!(%natural, scale, "Target box is not smaller, keeping natural size");
        return Ok(natural);
    }

    let size = match pinned {
        Pinned::Width(w) => Size::new(w.max(1), scaled(nh, scale)?),
        Pinned::Height(h) => Size::new(scaled(nw, scale)?, h.max(1)),
    };
    debug!(%natural, %size, scale, allow_enlarge, "Planned fit-inside resize");
    Ok(size)
}

/// Final size for one image.
///
/// An explicit resize wins over an alignment override and never enlarges.
/// Alignment pins one axis and may enlarge. With neither, the natural size
/// is returned unchanged.
pub fn plan_size(
    natural: Size,
    explicit: Option<&ResizeSpec>,
    alignment: Option<AxisOverride>,
) -> Result<Size> {
    if let Some(spec) = explicit.filter(|s| !s.is_empty()) {
        return fit_inside(natural, spec.width, spec.height, false);
    }

    match alignment {
        Some(AxisOverride::Width(w)) => fit_inside(natural, Some(w), None, true),
        Some(AxisOverride::Height(h)) => fit_inside(natural, None, Some(h), true),
        None => Ok(natural),
    }
}

enum Pinned {
    Width(u32),
    Height(u32),
}

fn scaled(side: f64, scale: f64) -> Result<u32> {
    let value = (side * scale).round();
    if value > f64::from(u32::MAX) {
        return Err(LayoutError::CanvasOverflow);
    }
    Ok((value as u32).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_resize_keeps_natural_size() {
        let natural = Size::new(640, 480);
        assert_eq!(plan_size(natural, None, None), Ok(natural));
        assert_eq!(plan_size(natural, Some(&ResizeSpec::default()), None), Ok(natural));
    }

    #[test]
    fn explicit_width_scales_height_proportionally() {
        let spec = ResizeSpec::new(Some(400), None);
        assert_eq!(
            plan_size(Size::new(800, 600), Some(&spec), None),
            Ok(Size::new(400, 300))
        );
    }

    #[test]
    fn explicit_height_scales_width_proportionally() {
        let spec = ResizeSpec::new(None, Some(300));
        assert_eq!(
            plan_size(Size::new(800, 600), Some(&spec), None),
            Ok(Size::new(400, 300))
        );
    }

    #[test]
    fn explicit_box_fits_inside_on_tighter_axis() {
        // 800x600 into 400x400: width is the tighter constraint.
        let spec = ResizeSpec::new(Some(400), Some(400));
        assert_eq!(
            plan_size(Size::new(800, 600), Some(&spec), None),
            Ok(Size::new(400, 300))
        );

        // 600x800 into 400x400: height is the tighter constraint.
        assert_eq!(
            plan_size(Size::new(600, 800), Some(&spec), None),
            Ok(Size::new(300, 400))
        );
    }

    #[test]
    fn explicit_resize_never_enlarges() {
        let spec = ResizeSpec::new(Some(1000), Some(1000));
        let natural = Size::new(200, 100);
        assert_eq!(plan_size(natural, Some(&spec), None), Ok(natural));

        let wide = ResizeSpec::new(Some(400), None);
        assert_eq!(plan_size(natural, Some(&wide), None), Ok(natural));
    }

    #[test]
    fn explicit_resize_wins_over_alignment() {
        let spec = ResizeSpec::new(Some(50), None);
        let result = plan_size(
            Size::new(100, 100),
            Some(&spec),
            Some(AxisOverride::Width(400)),
        )
        .unwrap();
        assert_eq!(result, Size::new(50, 50));
    }

    #[test]
    fn alignment_override_enlarges() {
        let result = plan_size(Size::new(100, 50), None, Some(AxisOverride::Width(200))).unwrap();
        assert_eq!(result, Size::new(200, 100));

        let result = plan_size(Size::new(30, 60), None, Some(AxisOverride::Height(90))).unwrap();
        assert_eq!(result, Size::new(45, 90));
    }

    #[test]
    fn alignment_at_target_is_a_no_op() {
        let natural = Size::new(200, 77);
        assert_eq!(
            plan_size(natural, None, Some(AxisOverride::Width(200))),
            Ok(natural)
        );
    }

    #[test]
    fn extreme_aspect_ratio_keeps_one_pixel() {
        let result = fit_inside(Size::new(1000, 1), Some(10), None, false).unwrap();
        assert_eq!(result, Size::new(10, 1));

        let result = fit_inside(Size::new(1, 1000), None, Some(10), false).unwrap();
        assert_eq!(result, Size::new(1, 10));
    }

    #[test]
    fn enlargement_past_u32_is_an_overflow() {
        // 100000x1 aligned to height 100000 would need a width of 10^10.
        let result = plan_size(
            Size::new(100_000, 1),
            None,
            Some(AxisOverride::Height(100_000)),
        );
        assert_eq!(result, Err(LayoutError::CanvasOverflow));

        let result = fit_inside(Size::new(2, 1), None, Some(u32::MAX), true);
        assert_eq!(result, Err(LayoutError::CanvasOverflow));
    }

    #[test]
    fn enlargement_up_to_u32_max_is_allowed() {
        let result = fit_inside(Size::new(1, 1), Some(u32::MAX), None, true);
        assert_eq!(result, Ok(Size::new(u32::MAX, u32::MAX)));
    }
}
