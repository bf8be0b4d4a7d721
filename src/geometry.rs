//! Output canvas sizing.
//!
//! Sizes are resolved once per run from the first image, then held fixed for every frame.

use crate::config::{AspectMode, Resolution};
use crate::foundation::core::TargetGeometry;
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::foundation::math::floor_even;

/// Widest frame the H.264 level targeted by the encoder accepts.
pub const MAX_WIDTH: u32 = 4096;
/// Tallest frame the H.264 level targeted by the encoder accepts.
pub const MAX_HEIGHT: u32 = 2160;

/// Smallest dimension ever emitted.
const MIN_DIM: u32 = 2;

/// Compute the output canvas for a source of `natural` size.
///
/// 1. `Source` keeps the natural size; a preset uses its declared size, except under
///    [`AspectMode::Match`] where the preset is a bounding box the source aspect is fit into.
/// 2. Anything over [`MAX_WIDTH`]x[`MAX_HEIGHT`] is scaled down uniformly.
/// 3. Both dimensions are floored to even numbers.
pub fn resolve_dimensions(
    natural: (u32, u32),
    resolution: Resolution,
    aspect: AspectMode,
) -> SlidecastResult<TargetGeometry> {
    let (src_w, src_h) = natural;
    if src_w == 0 || src_h == 0 {
        return Err(SlidecastError::invalid_input(format!(
            "first image has zero size ({src_w}x{src_h})"
        )));
    }

    let (w, h) = match resolution {
        Resolution::Source => (src_w, src_h),
        Resolution::Preset(preset) => {
            let (box_w, box_h) = preset.size();
            if aspect == AspectMode::Match {
                fit_aspect_in_box(src_w, src_h, box_w, box_h)
            } else {
                (box_w, box_h)
            }
        }
    };

    let geometry = clamp_to_codec_limits(w, h);
    if geometry.was_clamped {
        tracing::info!(
            from = %format!("{w}x{h}"),
            to = %format!("{}x{}", geometry.width, geometry.height),
            "scaled output to fit H.264 limit"
        );
    }
    Ok(geometry)
}

/// Largest `(w, h)` inside `box_w x box_h` with the aspect ratio of `src_w x src_h`.
fn fit_aspect_in_box(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let src_aspect = f64::from(src_w) / f64::from(src_h);
    let box_aspect = f64::from(box_w) / f64::from(box_h);
    if src_aspect >= box_aspect {
        (box_w, (f64::from(box_w) / src_aspect).round() as u32)
    } else {
        ((f64::from(box_h) * src_aspect).round() as u32, box_h)
    }
}

fn clamp_to_codec_limits(w: u32, h: u32) -> TargetGeometry {
    if w <= MAX_WIDTH && h <= MAX_HEIGHT {
        return TargetGeometry {
            width: floor_even(w).max(MIN_DIM),
            height: floor_even(h).max(MIN_DIM),
            was_clamped: false,
        };
    }

    let scale = (f64::from(MAX_WIDTH) / f64::from(w)).min(f64::from(MAX_HEIGHT) / f64::from(h));
    let scaled = |v: u32| (f64::from(v) * scale).floor() as u32;
    TargetGeometry {
        width: floor_even(scaled(w)).clamp(MIN_DIM, MAX_WIDTH),
        height: floor_even(scaled(h)).clamp(MIN_DIM, MAX_HEIGHT),
        was_clamped: true,
    }
}

#[cfg(test)]
#[path = "../tests/unit/geometry.rs"]
mod tests;
