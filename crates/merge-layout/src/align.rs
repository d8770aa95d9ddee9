//! Dimension normalizer: scale every image to a shared width or height.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{LayoutError, Size};

/// Which axis, if any, all images are aligned on before layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentDirective {
    #[default]
    None,
    /// Scale every image to the widest image's width.
    #[serde(alias = "max-width")]
    Width,
    /// Scale every image to the tallest image's height.
    #[serde(alias = "max-height")]
    Height,
}

impl FromStr for AlignmentDirective {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "width" | "max-width" => Ok(Self::Width),
            "height" | "max-height" => Ok(Self::Height),
            other => Err(LayoutError::UnknownValue {
                field: "align",
                value: other.to_string(),
            }),
        }
    }
}

/// A forced size on exactly one axis. The other axis follows the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "axis", content = "value")]
pub enum AxisOverride {
    Width(u32),
    Height(u32),
}

/// Compute the per-image alignment override for a batch.
///
/// `None` yields no override for any image. Otherwise every image gets an
/// override on the aligned axis, set to the batch maximum on that axis.
pub fn normalize(sizes: &[Size], directive: AlignmentDirective) -> Vec<Option<AxisOverride>> {
    let target = match directive {
        AlignmentDirective::None => None,
        AlignmentDirective::Width => sizes
            .iter()
            .map(|s| s.width)
            .max()
            .map(AxisOverride::Width),
        AlignmentDirective::Height => sizes
            .iter()
            .map(|s| s.height)
            .max()
            .map(AxisOverride::Height),
    };

    if let Some(target) = target {
        debug!(?target, count = sizes.len(), "Aligning batch");
    }

    vec![target; sizes.len()]
}
