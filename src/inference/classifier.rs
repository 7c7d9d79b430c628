//! Narrow contract with an external inference runtime.
//!
//! inkgrid never loads or runs models. A runtime adapter implements [`Classifier`], declares
//! the input it expects through [`InputSpec`], and receives tensors exported to match.

use crate::{
    canvas::snapshot::Snapshot,
    export::{
        quantize::{DtypeTag, TargetShape},
        rescale::Filter,
        tensor::{
            DEFAULT_DOMAIN_SCALE, DEFAULT_TARGET_EDGE, ExportRequest, ExportedTensor, export_tensor,
        },
    },
    foundation::error::InkResult,
};

/// Input tensor declared by a model.
#[derive(Clone, Debug, PartialEq)]
pub struct InputSpec {
    /// Dtype tag as reported by the runtime (`"float32"`, `"int8"`, `"uint8"`, ...).
    pub dtype: DtypeTag,
    pub width: u32,
    pub height: u32,
    /// Declared input shape, e.g. `[1, 28, 28, 1]`.
    pub shape: Option<TargetShape>,
}

impl InputSpec {
    /// A `width x height` single-channel input with a leading batch axis.
    pub fn image(dtype: impl Into<DtypeTag>, width: u32, height: u32) -> InkResult<Self> {
        Ok(Self {
            dtype: dtype.into(),
            width,
            height,
            shape: Some(TargetShape::new(vec![
                1,
                height as usize,
                width as usize,
                1,
            ])?),
        })
    }

    pub fn export_request(&self, filter: Filter) -> ExportRequest {
        ExportRequest {
            dtype: self.dtype.clone(),
            target_width: self.width,
            target_height: self.height,
            domain_scale: DEFAULT_DOMAIN_SCALE,
            target_shape: self.shape.clone(),
            filter,
        }
    }
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            dtype: DtypeTag::default(),
            width: DEFAULT_TARGET_EDGE,
            height: DEFAULT_TARGET_EDGE,
            shape: None,
        }
    }
}

/// Adapter over a model runtime: tensor in, class scores out.
pub trait Classifier {
    fn input_spec(&self) -> InputSpec;

    fn infer(&mut self, input: &ExportedTensor) -> InkResult<Vec<f32>>;
}

/// Outcome of one classification.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Index of the highest score, `None` when the runtime produced no scores.
    pub label: Option<usize>,
    pub scores: Vec<f32>,
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.label {
            Some(label) => write!(f, "You drew a: {label}"),
            None => f.write_str("No output"),
        }
    }
}

/// Index of the first maximum score. NaN scores never win.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

/// Export `snapshot` the way `model` declares and pick the winning class.
#[tracing::instrument(skip(snapshot, model))]
pub fn predict(
    snapshot: &Snapshot,
    model: &mut dyn Classifier,
    filter: Filter,
) -> InkResult<Prediction> {
    let req = model.input_spec().export_request(filter);
    let input = export_tensor(snapshot, &req)?;
    let scores = model.infer(&input)?;
    let label = argmax(&scores);
    tracing::debug!(?label, classes = scores.len(), "prediction");
    Ok(Prediction { label, scores })
}

#[cfg(test)]
#[path = "../../tests/unit/inference/classifier.rs"]
mod tests;
