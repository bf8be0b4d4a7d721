use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::config::AspectMode;
use crate::foundation::error::SlidecastResult;
use crate::render::frame::FrameRGBA;

/// Resampling filter used for every scaled draw.
const FILTER: FilterType = FilterType::Triangle;

const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 255];

/// Destination rectangle of a scaled source on the canvas, in canvas pixels.
///
/// May extend past the canvas (`cover`), in which case the overflow is clipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where a `src_w x src_h` bitmap lands on a `dst_w x dst_h` canvas under `mode`.
pub fn placement(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32, mode: AspectMode) -> Placement {
    let (bw, bh) = (f64::from(src_w), f64::from(src_h));
    let (w, h) = (f64::from(dst_w), f64::from(dst_h));

    let scale = match mode {
        AspectMode::Stretch => {
            return Placement {
                x: 0.0,
                y: 0.0,
                width: w,
                height: h,
            };
        }
        // `match` already chose a canvas with the source aspect, so it draws like `contain`.
        AspectMode::Contain | AspectMode::Match => (w / bw).min(h / bh),
        AspectMode::Cover => (w / bw).max(h / bh),
    };

    let width = bw * scale;
    let height = bh * scale;
    Placement {
        x: (w - width) / 2.0,
        y: (h - height) / 2.0,
        width,
        height,
    }
}

/// Clear `frame` to transparent and draw `src` onto it per `mode`.
pub fn draw_image(frame: &mut FrameRGBA, src: &RgbaImage, mode: AspectMode) -> SlidecastResult<()> {
    frame.clear();
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 {
        return Ok(());
    }
    let (dst_w, dst_h) = (frame.width, frame.height);
    let mut canvas = frame.as_image_mut()?;

    match mode {
        AspectMode::Stretch => {
            let scaled = scale_to(src, dst_w, dst_h);
            imageops::replace(&mut canvas, scaled.as_ref().unwrap_or(src), 0, 0);
        }
        AspectMode::Contain | AspectMode::Match => {
            let p = placement(src_w, src_h, dst_w, dst_h, mode);
            let w = (p.width.round() as u32).clamp(1, dst_w);
            let h = (p.height.round() as u32).clamp(1, dst_h);
            let x = i64::from((dst_w - w) / 2);
            let y = i64::from((dst_h - h) / 2);
            let scaled = scale_to(src, w, h);
            imageops::replace(&mut canvas, scaled.as_ref().unwrap_or(src), x, y);
        }
        AspectMode::Cover => {
            // Only the centered window of the source that survives clipping is resampled.
            let p = placement(src_w, src_h, dst_w, dst_h, mode);
            let scale = p.width / f64::from(src_w);
            let crop_w = ((f64::from(dst_w) / scale).round() as u32).clamp(1, src_w);
            let crop_h = ((f64::from(dst_h) / scale).round() as u32).clamp(1, src_h);
            let crop_x = (src_w - crop_w) / 2;
            let crop_y = (src_h - crop_h) / 2;
            let window = imageops::crop_imm(src, crop_x, crop_y, crop_w, crop_h).to_image();
            let scaled = scale_to(&window, dst_w, dst_h);
            imageops::replace(&mut canvas, scaled.as_ref().unwrap_or(&window), 0, 0);
        }
    }
    Ok(())
}

/// Fill `frame` with opaque black.
pub fn draw_black(frame: &mut FrameRGBA) {
    frame.fill(OPAQUE_BLACK);
}

fn scale_to(src: &RgbaImage, w: u32, h: u32) -> Option<RgbaImage> {
    if src.dimensions() == (w, h) {
        None
    } else {
        Some(imageops::resize(src, w, h, FILTER))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
