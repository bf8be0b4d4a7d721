use crate::foundation::error::{SlidecastError, SlidecastResult};

/// A tightly packed, row-major RGBA8 frame.
///
/// One frame is allocated per run and overwritten for every output frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// Straight (non-premultiplied) alpha.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Allocate a transparent frame, reporting allocation failure instead of aborting.
    pub fn try_new(width: u32, height: u32) -> SlidecastResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| {
                SlidecastError::resource_exhausted(format!("frame {width}x{height} is too large"))
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            SlidecastError::resource_exhausted(format!(
                "cannot allocate {width}x{height} frame: {e}"
            ))
        })?;
        data.resize(len, 0);

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Overwrite every pixel with `rgba`.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// RGBA at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(off..off + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Borrow the pixels as an `image` buffer for drawing.
    pub(crate) fn as_image_mut(
        &mut self,
    ) -> SlidecastResult<image::ImageBuffer<image::Rgba<u8>, &mut [u8]>> {
        let (w, h) = (self.width, self.height);
        image::ImageBuffer::from_raw(w, h, self.data.as_mut_slice()).ok_or_else(|| {
            SlidecastError::invalid_input("frame data size mismatch with width*height*4")
        })
    }
}
