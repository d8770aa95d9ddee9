//! Merge orchestrator: decode, plan, resize, composite, encode.

use std::borrow::Cow;
use std::time::Instant;

use merge_layout::{MergeOptions, Size, plan_merge};
use tracing::{debug, info};

use crate::codec::Codec;
use crate::context::ExecutionContext;
use crate::{MergeError, Result};

/// One encoded merge result.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    pub png: Vec<u8>,
    pub canvas: Size,
    pub context: ExecutionContext,
}

/// Merge `sources` into a single PNG with `codec`.
///
/// All-or-nothing: any source that fails to decode fails the whole merge.
/// Images are composited in input order onto a transparent canvas.
pub fn merge<C: Codec + ?Sized>(
    codec: &C,
    sources: &[&[u8]],
    options: &MergeOptions,
) -> Result<MergeOutput> {
    let started = Instant::now();
    options.validate(sources.len())?;

    let images = codec
        .decode_batch(sources)
        .into_iter()
        .enumerate()
        .map(|(index, decoded)| decoded.map_err(|source| MergeError::DecodeFailure { index, source }))
        .collect::<Result<Vec<_>>>()?;

    let natural: Vec<Size> = images
        .iter()
        .map(|img| Size::new(img.width(), img.height()))
        .collect();
    let plan = plan_merge(&natural, options)?;

    let mut canvas = codec.create_canvas(plan.canvas)?;
    for (index, (img, item)) in images.iter().zip(&plan.items).enumerate() {
        let placed = if item.needs_resize() {
            Cow::Owned(codec.resize(img, item.target))
        } else {
            Cow::Borrowed(img)
        };
        debug!(index, x = item.x, y = item.y, size = %item.target, "Compositing image");
        codec.composite(&mut canvas, &placed, item.x, item.y);
    }

    let png = codec.encode_png(&canvas).map_err(MergeError::EncodeFailure)?;

    info!(
        context = %codec.context(),
        images = images.len(),
        canvas = %plan.canvas,
        bytes = png.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Merged images"
    );

    Ok(MergeOutput {
        png,
        canvas: plan.canvas,
        context: codec.context(),
    })
}
