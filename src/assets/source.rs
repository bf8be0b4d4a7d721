use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// One still image in display order.
///
/// Holds the encoded bytes only. Pixels are decoded on demand with [`SourceImage::decode_rgba8`]
/// and are expected to be dropped as soon as the frame is drawn.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub name: String,
    bytes: Arc<[u8]>,
}

impl SourceImage {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> SlidecastResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Ok(Self::from_bytes(path.display().to_string(), bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Read `(width, height)` from the image header without decoding pixels.
    pub fn natural_size(&self) -> Result<(u32, u32), image::ImageError> {
        image::ImageReader::new(Cursor::new(self.bytes()))
            .with_guessed_format()?
            .into_dimensions()
    }

    /// Decode into straight-alpha RGBA8.
    pub fn decode_rgba8(&self) -> Result<image::RgbaImage, image::ImageError> {
        Ok(image::load_from_memory(self.bytes())?.into_rgba8())
    }
}

/// The caller-supplied, still-encoded audio track.
#[derive(Clone, Debug)]
pub struct AudioBlob {
    pub name: String,
    bytes: Arc<[u8]>,
}

impl AudioBlob {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> SlidecastResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read audio '{}'", path.display()))?;
        Ok(Self::from_bytes(path.display().to_string(), bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Map an `image` failure for item `index` (0-based) of `total` onto the error taxonomy.
///
/// Decoder limit and allocation failures become [`SlidecastError::ResourceExhausted`].
pub(crate) fn image_error(
    err: image::ImageError,
    name: &str,
    index: usize,
    total: u64,
) -> SlidecastError {
    match err {
        image::ImageError::Limits(e) => SlidecastError::resource_exhausted(format!(
            "image {}/{total} ({name}): {e}",
            index + 1
        )),
        other => SlidecastError::decode("image", index as u64 + 1, total, format!("{name}: {other}")),
    }
}
