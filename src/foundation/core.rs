use crate::foundation::error::{InkError, InkResult};

pub use kurbo::{Affine, Point};

/// Straight (non-premultiplied) RGBA8 texel.
pub type Rgba8 = [u8; 4];

/// Canvas background: opaque black.
pub const BACKGROUND: Rgba8 = [0, 0, 0, 255];

/// Ink color: opaque white.
pub const FOREGROUND: Rgba8 = [255, 255, 255, 255];

/// Bytes per RGBA8 texel.
pub const BYTES_PER_TEXEL: usize = 4;

/// Width and height of a raster, both strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> InkResult<Self> {
        if width == 0 || height == 0 {
            return Err(InkError::invalid_dimensions(width, height));
        }
        // Reject sizes whose RGBA8 buffer cannot be addressed.
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(BYTES_PER_TEXEL))
            .ok_or_else(|| InkError::validation("raster buffer size overflow"))?;
        Ok(Self { width, height })
    }

    pub fn texel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn byte_len(self) -> usize {
        self.texel_count() * BYTES_PER_TEXEL
    }

    /// Byte offset of texel `(x, y)` in a tightly packed row-major RGBA8 buffer.
    pub fn offset(self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * BYTES_PER_TEXEL
    }
}

/// Fill `buf` with copies of `px`.
pub(crate) fn fill_rgba8(buf: &mut [u8], px: Rgba8) {
    for texel in buf.chunks_exact_mut(BYTES_PER_TEXEL) {
        texel.copy_from_slice(&px);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
