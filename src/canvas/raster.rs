use std::sync::Arc;

use crate::{
    canvas::{
        snapshot::Snapshot,
        stroke::{DiskSpan, Stroke, covers},
    },
    foundation::{
        core::{BACKGROUND, Dimensions, FOREGROUND, Point, fill_rgba8},
        error::{InkError, InkResult},
    },
};

/// How far into history the pixel buffer is known to be up to date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PaintCursor {
    stroke: usize,
    point: usize,
}

/// Persistent RGBA8 ink buffer plus the stroke history that produced it.
///
/// Painting is binary: a texel touched by any brush disk becomes [`FOREGROUND`], everything
/// else stays [`BACKGROUND`]. Coverage is therefore independent of stroke order and of how
/// often a region is repainted, which is what makes [`RasterCanvas::render`] and
/// [`RasterCanvas::render_pending`] interchangeable.
#[derive(Clone, Debug)]
pub struct RasterCanvas {
    dims: Dimensions,
    brush_radius: f64,
    pixels: Vec<u8>,
    history: Vec<Stroke>,
    open: bool,
    painted: PaintCursor,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, brush_radius: f64) -> InkResult<Self> {
        let dims = Dimensions::new(width, height)?;
        if !brush_radius.is_finite() {
            return Err(InkError::validation("brush radius must be finite"));
        }
        let mut pixels = vec![0u8; dims.byte_len()];
        fill_rgba8(&mut pixels, BACKGROUND);
        Ok(Self {
            dims,
            brush_radius,
            pixels,
            history: Vec::new(),
            open: false,
            painted: PaintCursor::default(),
        })
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

    pub fn brush_radius(&self) -> f64 {
        self.brush_radius
    }

    /// Current pixel buffer, row-major RGBA8. May lag history until the next render.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn history(&self) -> &[Stroke] {
        &self.history
    }

    /// Whether the last stroke in history still accepts points.
    pub fn has_open_stroke(&self) -> bool {
        self.open
    }

    /// Whether history holds points that are not yet in the pixel buffer.
    pub fn has_pending(&self) -> bool {
        let Some(last) = self.history.last() else {
            return false;
        };
        self.painted.stroke + 1 < self.history.len() || self.painted.point < last.len()
    }

    /// Start a new stroke at `p` using the session brush. An open stroke is finished first.
    pub fn begin_stroke(&mut self, p: Point) {
        self.finish_stroke();
        let mut stroke = Stroke::new(self.brush_radius);
        stroke.push(p);
        self.history.push(stroke);
        self.open = true;
    }

    /// Append `p` to the open stroke. Returns `false` (and does nothing) if no stroke is open.
    pub fn extend_stroke(&mut self, p: Point) -> bool {
        if !self.open {
            return false;
        }
        match self.history.last_mut() {
            Some(stroke) => {
                stroke.push(p);
                true
            }
            None => false,
        }
    }

    /// Close the open stroke so no further points can be appended to it.
    pub fn finish_stroke(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    /// Append an already complete stroke to history.
    ///
    /// The stroke must use the session brush radius.
    pub fn push_stroke(&mut self, stroke: Stroke) -> InkResult<()> {
        if stroke.brush_radius() != self.brush_radius {
            return Err(InkError::validation(format!(
                "stroke brush radius {} differs from session radius {}",
                stroke.brush_radius(),
                self.brush_radius
            )));
        }
        self.finish_stroke();
        self.history.push(stroke);
        Ok(())
    }

    /// Repaint the whole buffer from history.
    #[tracing::instrument(skip(self), fields(strokes = self.history.len()))]
    pub fn render(&mut self) {
        fill_rgba8(&mut self.pixels, BACKGROUND);
        self.painted = PaintCursor::default();
        self.render_pending();
    }

    /// Paint only the points appended since the last render.
    pub fn render_pending(&mut self) {
        let Some(last) = self.history.len().checked_sub(1) else {
            return;
        };
        for (si, stroke) in self.history.iter().enumerate().skip(self.painted.stroke) {
            let first = if si == self.painted.stroke {
                self.painted.point
            } else {
                0
            };
            for &p in stroke.points().iter().skip(first) {
                paint_disk(&mut self.pixels, self.dims, p, stroke.brush_radius());
            }
        }
        self.painted = PaintCursor {
            stroke: last,
            point: self.history[last].len(),
        };
    }

    /// Drop all history and reset every texel to background.
    pub fn clear(&mut self) {
        fill_rgba8(&mut self.pixels, BACKGROUND);
        self.history.clear();
        self.open = false;
        self.painted = PaintCursor::default();
        tracing::debug!(
            width = self.dims.width,
            height = self.dims.height,
            "canvas cleared"
        );
    }

    /// Immutable copy of the current pixel buffer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.dims, Arc::from(self.pixels.as_slice()))
    }
}

/// Paint a filled disk of `radius` centered at `center`, clipped to the raster.
fn paint_disk(pixels: &mut [u8], dims: Dimensions, center: Point, radius: f64) {
    let Some(span) = DiskSpan::clipped(center, radius, dims.width, dims.height) else {
        return;
    };
    for py in span.y0..span.y1 {
        for px in span.x0..span.x1 {
            if covers(center, radius, px, py) {
                let off = dims.offset(px, py);
                pixels[off..off + 4].copy_from_slice(&FOREGROUND);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/raster.rs"]
mod tests;
