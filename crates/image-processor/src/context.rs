//! Execution contexts and the canvas-to-native fallback policy.

use std::fmt;
use std::str::FromStr;

use merge_layout::{MergeOptions, Size};
use tracing::{info, warn};

use crate::codec::{CanvasCodec, NativeCodec};
use crate::merge::{MergeOutput, merge};
use crate::{MergeError, MergeErrorKind};

/// Which pipeline produced (or should produce) a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionContext {
    /// Fast in-process canvas with size ceilings.
    Canvas,
    /// Native codec without canvas ceilings.
    Native,
}

impl ExecutionContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canvas => "canvas",
            Self::Native => "native",
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ceilings of the canvas context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLimits {
    /// Longest allowed side in pixels.
    pub max_side: u32,
    /// Largest allowed total pixel count.
    pub max_pixels: u64,
}

impl CanvasLimits {
    pub const DEFAULT_MAX_SIDE: u32 = 32_767;
    pub const DEFAULT_MAX_PIXELS: u64 = 268_435_456;

    pub const fn new(max_side: u32, max_pixels: u64) -> Self {
        Self {
            max_side,
            max_pixels,
        }
    }

    pub fn admits(&self, canvas: Size) -> bool {
        canvas.width <= self.max_side
            && canvas.height <= self.max_side
            && canvas.area() <= self.max_pixels
    }
}

impl Default for CanvasLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SIDE, Self::DEFAULT_MAX_PIXELS)
    }
}

impl fmt::Display for CanvasLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max side {}px, max {} pixels",
            self.max_side, self.max_pixels
        )
    }
}

/// How the dispatcher chooses an execution context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextPolicy {
    /// Native when resizing or alignment is requested, otherwise canvas
    /// first with native fallback on an oversized canvas.
    #[default]
    Auto,
    CanvasOnly,
    NativeOnly,
}

impl FromStr for ContextPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "canvas" => Ok(Self::CanvasOnly),
            "native" => Ok(Self::NativeOnly),
            other => Err(format!("unknown context '{other}' (expected auto, canvas or native)")),
        }
    }
}

/// Runs a merge in the chosen context and applies the fallback policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    limits: CanvasLimits,
    policy: ContextPolicy,
}

impl Dispatcher {
    pub fn new(limits: CanvasLimits, policy: ContextPolicy) -> Self {
        Self { limits, policy }
    }

    pub fn policy(&self) -> ContextPolicy {
        self.policy
    }

    /// Same dispatcher with a different policy.
    pub fn with_policy(self, policy: ContextPolicy) -> Self {
        Self { policy, ..self }
    }

    /// Context the first attempt runs in.
    pub fn choose(&self, options: &MergeOptions) -> ExecutionContext {
        match self.policy {
            ContextPolicy::CanvasOnly => ExecutionContext::Canvas,
            ContextPolicy::NativeOnly => ExecutionContext::Native,
            ContextPolicy::Auto if options.requests_resize() => ExecutionContext::Native,
            ContextPolicy::Auto => ExecutionContext::Canvas,
        }
    }

    /// Merge `sources` into one PNG.
    ///
    /// Under [`ContextPolicy::Auto`] a canvas attempt that fails with
    /// `CanvasTooLarge` is retried natively. Every other failure is final.
    pub fn merge(
        &self,
        sources: &[&[u8]],
        options: &MergeOptions,
    ) -> Result<MergeOutput, MergeError> {
        match self.choose(options) {
            ExecutionContext::Native => merge(&NativeCodec::new(), sources, options),
            ExecutionContext::Canvas => {
                let attempt = merge(&CanvasCodec::new(self.limits), sources, options);
                match attempt {
                    Err(err)
                        if self.policy == ContextPolicy::Auto
                            && err.kind() == MergeErrorKind::CanvasTooLarge =>
                    {
                        warn!("Canvas context refused merge, falling back to native: {err}");
                        let output = merge(&NativeCodec::new(), sources, options)?;
                        info!(canvas = %output.canvas, "Native fallback succeeded");
                        Ok(output)
                    }
                    other => other,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use merge_layout::AlignmentDirective;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([7, 7, 7, 255])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn limits_check_side_and_area() {
        let limits = CanvasLimits::new(100, 2_000);
        assert!(limits.admits(Size::new(100, 20)));
        assert!(!limits.admits(Size::new(101, 1)));
        assert!(!limits.admits(Size::new(50, 50)));
    }

    #[test]
    fn auto_prefers_canvas_for_plain_merges() {
        let dispatcher = Dispatcher::default();
        assert_eq!(dispatcher.choose(&MergeOptions::default()), ExecutionContext::Canvas);
    }

    #[test]
    fn auto_prefers_native_when_resizing() {
        let dispatcher = Dispatcher::default();
        let aligned = MergeOptions::builder()
            .align(AlignmentDirective::Height)
            .build()
            .unwrap();
        let resized = MergeOptions::builder().resize(Some(10), None).build().unwrap();

        assert_eq!(dispatcher.choose(&aligned), ExecutionContext::Native);
        assert_eq!(dispatcher.choose(&resized), ExecutionContext::Native);
    }

    #[test]
    fn explicit_policies_override_heuristic() {
        let aligned = MergeOptions::builder()
            .align(AlignmentDirective::Width)
            .build()
            .unwrap();
        let canvas = Dispatcher::default().with_policy(ContextPolicy::CanvasOnly);
        let native = Dispatcher::default().with_policy(ContextPolicy::NativeOnly);

        assert_eq!(canvas.choose(&aligned), ExecutionContext::Canvas);
        assert_eq!(native.choose(&MergeOptions::default()), ExecutionContext::Native);
    }

    #[test]
    fn oversized_canvas_falls_back_to_native() {
        let sources = [png(30, 10), png(30, 10)];
        let refs: Vec<&[u8]> = sources.iter().map(Vec::as_slice).collect();
        let dispatcher = Dispatcher::new(CanvasLimits::new(40, 10_000), ContextPolicy::Auto);

        let output = dispatcher.merge(&refs, &MergeOptions::default()).unwrap();
        assert_eq!(output.context, ExecutionContext::Native);
        assert_eq!(output.canvas, Size::new(60, 10));
    }

    #[test]
    fn canvas_only_surfaces_canvas_too_large() {
        let sources = [png(30, 10), png(30, 10)];
        let refs: Vec<&[u8]> = sources.iter().map(Vec::as_slice).collect();
        let dispatcher = Dispatcher::new(CanvasLimits::new(40, 10_000), ContextPolicy::CanvasOnly);

        let err = dispatcher.merge(&refs, &MergeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), MergeErrorKind::CanvasTooLarge);
    }

    #[test]
    fn decode_failure_does_not_fall_back() {
        let good = png(4, 4);
        let refs = vec![good.as_slice(), b"garbage".as_slice()];
        let dispatcher = Dispatcher::default();

        let err = dispatcher.merge(&refs, &MergeOptions::default()).unwrap_err();
        assert!(matches!(err, MergeError::DecodeFailure { index: 1, .. }));
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("auto".parse(), Ok(ContextPolicy::Auto));
        assert_eq!("Canvas".parse(), Ok(ContextPolicy::CanvasOnly));
        assert_eq!("native".parse(), Ok(ContextPolicy::NativeOnly));
        assert!("gpu".parse::<ContextPolicy>().is_err());
    }
}
