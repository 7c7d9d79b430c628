//! Fixed-resolution resampling of composited canvas ink.
//!
//! The whole snapshot is mapped onto the target raster with one affine transform
//! (`scale(Wt / Ws, Ht / Hs)`); strokes are never re-rasterized at the target size.

use crate::{
    canvas::snapshot::Snapshot,
    foundation::{
        core::{Affine, BYTES_PER_TEXEL, Dimensions, Point},
        error::InkResult,
    },
};

/// Resampling filter used when mapping the canvas onto the export raster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Sample the source texel under each destination texel center.
    #[default]
    Nearest,
    /// Average the exact source footprint of each destination texel (box filter).
    Area,
}

impl std::str::FromStr for Filter {
    type Err = crate::InkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "area" | "box" => Ok(Self::Area),
            other => Err(crate::InkError::validation(format!(
                "unknown filter '{other}' (expected 'nearest' or 'area')"
            ))),
        }
    }
}

/// Ephemeral downscaled copy of a snapshot (row-major RGBA8).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScaledBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ScaledBuffer {
    pub fn texels(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.pixels.chunks_exact(BYTES_PER_TEXEL)
    }
}

/// Affine transform taking snapshot coordinates to target coordinates.
pub fn export_transform(src: Dimensions, dst: Dimensions) -> Affine {
    Affine::scale_non_uniform(
        f64::from(dst.width) / f64::from(src.width),
        f64::from(dst.height) / f64::from(src.height),
    )
}

/// Resample `src` to `width x height`.
#[tracing::instrument(skip(src), fields(src_w = src.width(), src_h = src.height()))]
pub fn rescale(src: &Snapshot, width: u32, height: u32, filter: Filter) -> InkResult<ScaledBuffer> {
    let dst = Dimensions::new(width, height)?;
    let pixels = match filter {
        Filter::Nearest => nearest(src, dst),
        Filter::Area => area(src, dst),
    };
    debug_assert_eq!(pixels.len(), dst.byte_len());
    Ok(ScaledBuffer {
        width,
        height,
        pixels,
    })
}

fn nearest(src: &Snapshot, dst: Dimensions) -> Vec<u8> {
    let sd = src.dimensions();
    let inv = export_transform(sd, dst).inverse();
    let data = src.pixels();

    let mut out = Vec::with_capacity(dst.byte_len());
    for y in 0..dst.height {
        for x in 0..dst.width {
            let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let sx = clamp_index(p.x, sd.width);
            let sy = clamp_index(p.y, sd.height);
            let off = sd.offset(sx, sy);
            out.extend_from_slice(&data[off..off + BYTES_PER_TEXEL]);
        }
    }
    out
}

fn clamp_index(v: f64, len: u32) -> u32 {
    (v.floor().max(0.0) as u32).min(len - 1)
}

/// Source texels overlapped by one destination texel along an axis, with overlap widths.
fn footprints(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f64)>> {
    let step = f64::from(src_len) / f64::from(dst_len);
    (0..dst_len)
        .map(|d| {
            let a = f64::from(d) * step;
            let b = (f64::from(d) + 1.0) * step;
            let first = a.floor() as u32;
            let last = (b.ceil() as u32).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let w = b.min(f64::from(s) + 1.0) - a.max(f64::from(s));
                    (w > 0.0).then_some((s, w))
                })
                .collect()
        })
        .collect()
}

fn area(src: &Snapshot, dst: Dimensions) -> Vec<u8> {
    let sd = src.dimensions();
    let xs = footprints(sd.width, dst.width);
    let ys = footprints(sd.height, dst.height);
    let data = src.pixels();

    let mut out = Vec::with_capacity(dst.byte_len());
    for yspan in &ys {
        for xspan in &xs {
            let mut acc = [0.0f64; BYTES_PER_TEXEL];
            let mut total = 0.0f64;
            for &(sy, wy) in yspan {
                for &(sx, wx) in xspan {
                    let w = wx * wy;
                    let off = sd.offset(sx, sy);
                    for (c, a) in acc.iter_mut().enumerate() {
                        *a += w * f64::from(data[off + c]);
                    }
                    total += w;
                }
            }
            for a in acc {
                let v = if total > 0.0 { a / total } else { 0.0 };
                out.push(v.round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/rescale.rs"]
mod tests;
