use std::{io::Cursor, path::Path, sync::Arc};

use anyhow::Context as _;

use crate::foundation::{
    core::{BYTES_PER_TEXEL, Dimensions, Rgba8},
    error::{InkError, InkResult},
};

/// Default file name used when saving a canvas snapshot.
pub const DEFAULT_SNAPSHOT_FILE: &str = "image.png";

/// Immutable copy of a canvas pixel buffer (row-major, tightly packed RGBA8).
///
/// Cloning is cheap and never aliases the canvas' live buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    dims: Dimensions,
    pixels: Arc<[u8]>,
}

impl Snapshot {
    pub(crate) fn new(dims: Dimensions, pixels: Arc<[u8]>) -> Self {
        debug_assert_eq!(pixels.len(), dims.byte_len());
        Self { dims, pixels }
    }

    /// Wrap an external RGBA8 buffer, e.g. a decoded image.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> InkResult<Self> {
        let dims = Dimensions::new(width, height)?;
        if pixels.len() != dims.byte_len() {
            return Err(InkError::validation(format!(
                "snapshot expects {} bytes for {}x{} rgba8, got {}",
                dims.byte_len(),
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self::new(dims, Arc::from(pixels)))
    }

    pub fn width(&self) -> u32 {
        self.dims.width
    }

    pub fn height(&self) -> u32 {
        self.dims.height
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn texel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        let off = self.dims.offset(x, y);
        let mut px = [0u8; BYTES_PER_TEXEL];
        px.copy_from_slice(&self.pixels[off..off + BYTES_PER_TEXEL]);
        Some(px)
    }

    /// Encode as a lossless RGBA8 PNG.
    pub fn encode_png(&self) -> InkResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut out,
            &self.pixels,
            self.dims.width,
            self.dims.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .context("encode snapshot png")?;
        Ok(out.into_inner())
    }

    /// Write the snapshot to `path` as PNG, creating parent directories as needed.
    pub fn save_png(&self, path: &Path) -> InkResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.dims.width,
            self.dims.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    /// Decode a PNG (or any format `image` was built with) into an RGBA8 snapshot.
    pub fn load_png(path: &Path) -> InkResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("read image '{}'", path.display()))?
            .into_rgba8();
        let (w, h) = img.dimensions();
        Self::from_rgba8(w, h, img.into_raw())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/snapshot.rs"]
mod tests;
