use crate::foundation::core::Point;

/// One pointer-down-to-pointer-up gesture: ordered samples painted with a fixed brush.
///
/// Strokes are built by [`crate::RasterCanvas`] (or handed to it whole through
/// [`crate::RasterCanvas::push_stroke`]); once a stroke lives in canvas history only the
/// canvas may extend it, and only while it is the open stroke.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stroke {
    points: Vec<Point>,
    brush_radius: f64,
}

impl Stroke {
    pub fn new(brush_radius: f64) -> Self {
        Self {
            points: Vec::new(),
            brush_radius,
        }
    }

    pub fn from_points(brush_radius: f64, points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
            brush_radius,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn brush_radius(&self) -> f64 {
        self.brush_radius
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn push(&mut self, p: Point) {
        self.points.push(p);
    }
}

/// Axis-aligned texel bounds `[x0, x1) x [y0, y1)` of a brush disk, clipped to a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DiskSpan {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl DiskSpan {
    /// Texels whose centers may fall inside the disk, or `None` when nothing can be painted.
    pub(crate) fn clipped(center: Point, radius: f64, width: u32, height: u32) -> Option<Self> {
        if !radius.is_finite() || radius <= 0.0 || !center.is_finite() {
            return None;
        }
        // A texel center sits at (px + 0.5, py + 0.5).
        let lo = |c: f64| (c - radius - 0.5).ceil();
        let hi = |c: f64| (c + radius - 0.5).floor() + 1.0;
        let clamp = |v: f64, max: u32| v.clamp(0.0, f64::from(max)) as u32;

        let x0 = clamp(lo(center.x), width);
        let x1 = clamp(hi(center.x), width);
        let y0 = clamp(lo(center.y), height);
        let y1 = clamp(hi(center.y), height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Self { x0, x1, y0, y1 })
    }
}

/// Whether the center of texel `(px, py)` lies within `radius` of `center`.
#[inline]
pub(crate) fn covers(center: Point, radius: f64, px: u32, py: u32) -> bool {
    let dx = f64::from(px) + 0.5 - center.x;
    let dy = f64::from(py) + 0.5 - center.y;
    dx * dx + dy * dy <= radius * radius
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/stroke.rs"]
mod tests;
