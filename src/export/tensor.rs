use crate::{
    canvas::snapshot::Snapshot,
    export::{
        quantize::{Dtype, DtypeTag, ExportWarning, TargetShape, TensorData, luma_plane, quantize},
        rescale::{Filter, rescale},
    },
    foundation::{
        core::Dimensions,
        error::{InkError, InkResult},
    },
};

/// Default export raster edge, matching MNIST-style 28x28 inputs.
pub const DEFAULT_TARGET_EDGE: u32 = 28;

/// Default divisor for the `float32` domain.
pub const DEFAULT_DOMAIN_SCALE: f64 = 255.0;

/// Parameters of one tensor export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRequest {
    pub dtype: DtypeTag,
    pub target_width: u32,
    pub target_height: u32,
    pub domain_scale: f64,
    pub target_shape: Option<TargetShape>,
    pub filter: Filter,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            dtype: DtypeTag::default(),
            target_width: DEFAULT_TARGET_EDGE,
            target_height: DEFAULT_TARGET_EDGE,
            domain_scale: DEFAULT_DOMAIN_SCALE,
            target_shape: None,
            filter: Filter::default(),
        }
    }
}

impl ExportRequest {
    pub fn new(dtype: impl Into<DtypeTag>) -> Self {
        Self {
            dtype: dtype.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.target_width = width;
        self.target_height = height;
        self
    }

    pub fn with_shape(mut self, shape: TargetShape) -> Self {
        self.target_shape = Some(shape);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_domain_scale(mut self, scale: f64) -> Self {
        self.domain_scale = scale;
        self
    }

    /// Check every argument without touching pixels. Returns the export raster size.
    pub fn validate(&self) -> InkResult<Dimensions> {
        let dims = Dimensions::new(self.target_width, self.target_height)?;
        if !self.domain_scale.is_finite() || self.domain_scale <= 0.0 {
            return Err(InkError::validation(format!(
                "domain scale must be finite and > 0, got {}",
                self.domain_scale
            )));
        }
        if let Some(shape) = &self.target_shape {
            shape.check(dims.texel_count())?;
        }
        Ok(dims)
    }
}

/// Numeric tensor produced from a canvas snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ExportedTensor {
    pub dtype: Dtype,
    pub width: u32,
    pub height: u32,
    pub shape: Vec<usize>,
    pub data: TensorData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ExportWarning>,
}

impl ExportedTensor {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of texel `(row, col)`; independent of the logical shape.
    pub fn flat_index(&self, row: u32, col: u32) -> usize {
        (row as usize) * (self.width as usize) + (col as usize)
    }

    /// Value at texel `(row, col)` widened to `f64`.
    pub fn value_at(&self, row: u32, col: u32) -> Option<f64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get_f64(self.flat_index(row, col))
    }

    /// Reinterpret under another shape; element order is unchanged.
    pub fn reshape(mut self, shape: &TargetShape) -> InkResult<Self> {
        shape.check(self.len())?;
        self.shape = shape.dims().to_vec();
        Ok(self)
    }
}

/// Downscale `snapshot` and quantize it per `req`.
///
/// All arguments are validated before the rescale buffer is allocated; a failed export
/// leaves nothing behind.
#[tracing::instrument(
    skip(snapshot, req),
    fields(dtype = ?req.dtype, w = req.target_width, h = req.target_height)
)]
pub fn export_tensor(snapshot: &Snapshot, req: &ExportRequest) -> InkResult<ExportedTensor> {
    let dims = req.validate()?;
    let (dtype, warning) = req.dtype.resolve();

    let scaled = rescale(snapshot, dims.width, dims.height, req.filter)?;
    let luma = luma_plane(&scaled);
    let data = quantize(&luma, dtype, req.domain_scale);

    let shape = match &req.target_shape {
        Some(s) => s.dims().to_vec(),
        None => vec![dims.texel_count()],
    };

    Ok(ExportedTensor {
        dtype,
        width: dims.width,
        height: dims.height,
        shape,
        data,
        warnings: warning.into_iter().collect(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/tensor.rs"]
mod tests;
