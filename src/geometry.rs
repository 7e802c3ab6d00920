//! Output dimension calculation.
//!
//! Pure functions only; nothing here touches pixels or the filesystem.

use crate::config::{Dimensions, ResizeMode, UpscalePolicy};

/// Compute the dimensions an image of size `original` is resized to.
///
/// * `Exact` always yields `target`.
/// * `Contain` scales by `min(tw/ow, th/oh)` so the result fits inside
///   `target` with the original aspect ratio. With upscaling denied the
///   scale is capped at 1, so images that already fit keep their size.
///
/// Both output edges are at least 1 pixel.
///
/// ```
/// use image_resizer_rs::{Dimensions, ResizeMode, UpscalePolicy, target_dimensions};
///
/// let out = target_dimensions(
///     Dimensions::new(800, 600),
///     Dimensions::new(400, 400),
///     ResizeMode::Contain,
///     UpscalePolicy::Deny,
/// );
/// assert_eq!(out, Dimensions::new(400, 300));
/// ```
pub fn target_dimensions(
    original: Dimensions,
    target: Dimensions,
    mode: ResizeMode,
    upscale: UpscalePolicy,
) -> Dimensions {
    match mode {
        ResizeMode::Exact => Dimensions::new(target.width.max(1), target.height.max(1)),
        ResizeMode::Contain => {
            if original.width == 0 || original.height == 0 {
                return Dimensions::new(target.width.max(1), target.height.max(1));
            }

            let scale_w = target.width as f64 / original.width as f64;
            let scale_h = target.height as f64 / original.height as f64;
            let mut scale = scale_w.min(scale_h);
            if scale > 1.0 && upscale == UpscalePolicy::Deny {
                scale = 1.0;
            }

            Dimensions::new(
                scale_edge(original.width, scale),
                scale_edge(original.height, scale),
            )
        }
    }
}

fn scale_edge(edge: u32, scale: f64) -> u32 {
    ((edge as f64 * scale).round() as u32).max(1)
}
