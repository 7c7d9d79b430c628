use std::{fmt, str::FromStr};

use crate::{
    export::rescale::ScaledBuffer,
    foundation::{
        error::{InkError, InkResult},
        math::luma_bt709,
    },
};

/// Numeric domain the exported tensor is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// `luma / domain_scale`, `[0.0, 1.0]` with the default scale.
    Float32,
    /// `luma - 128`, `[-128, 127]`.
    Int8,
    /// `luma`, `[0, 255]`.
    #[default]
    Uint8,
}

impl Dtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dtype {
    type Err = InkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float32" => Ok(Self::Float32),
            "int8" => Ok(Self::Int8),
            "uint8" => Ok(Self::Uint8),
            other => Err(InkError::validation(format!("unknown dtype '{other}'"))),
        }
    }
}

/// A dtype as requested by a caller: either a known domain or a free-form tag taken from an
/// inference runtime's metadata.
///
/// Tags are matched exactly; `"INT8"` or `" int8"` stay [`DtypeTag::Unknown`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DtypeTag {
    Known(Dtype),
    Unknown(String),
}

impl DtypeTag {
    /// Resolve to a concrete domain. Unknown tags fall back to [`Dtype::Uint8`] with a warning.
    pub fn resolve(&self) -> (Dtype, Option<ExportWarning>) {
        match self {
            Self::Known(d) => (*d, None),
            Self::Unknown(tag) => {
                tracing::warn!(tag = %tag, "unknown dtype, falling back to uint8");
                (
                    Dtype::Uint8,
                    Some(ExportWarning::UnknownDtype { tag: tag.clone() }),
                )
            }
        }
    }
}

impl Default for DtypeTag {
    fn default() -> Self {
        Self::Known(Dtype::default())
    }
}

impl From<Dtype> for DtypeTag {
    fn from(d: Dtype) -> Self {
        Self::Known(d)
    }
}

impl From<&str> for DtypeTag {
    fn from(s: &str) -> Self {
        s.parse::<Dtype>()
            .map(Self::Known)
            .unwrap_or_else(|_| Self::Unknown(s.to_string()))
    }
}

impl From<String> for DtypeTag {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Non-fatal condition raised while exporting.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportWarning {
    /// The requested dtype tag was not recognized; `uint8` was used instead.
    UnknownDtype { tag: String },
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDtype { tag } => write!(f, "unknown dtype '{tag}', selected uint8"),
        }
    }
}

/// Flat, row-major tensor storage in one of the export domains.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum TensorData {
    F32(Vec<f32>),
    I8(Vec<i8>),
    U8(Vec<u8>),
}

impl TensorData {
    pub fn dtype(&self) -> Dtype {
        match self {
            Self::F32(_) => Dtype::Float32,
            Self::I8(_) => Dtype::Int8,
            Self::U8(_) => Dtype::Uint8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `i` widened to `f64`.
    pub fn get_f64(&self, i: usize) -> Option<f64> {
        match self {
            Self::F32(v) => v.get(i).map(|&x| f64::from(x)),
            Self::I8(v) => v.get(i).map(|&x| f64::from(x)),
            Self::U8(v) => v.get(i).map(|&x| f64::from(x)),
        }
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Self::F32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<&[i8]> {
        match self {
            Self::I8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            Self::U8(v) => Some(v),
            _ => None,
        }
    }
}

/// Caller-declared tensor shape: a non-empty sequence of positive extents.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct TargetShape(Vec<usize>);

impl TargetShape {
    pub fn new(dims: impl Into<Vec<usize>>) -> InkResult<Self> {
        let dims = dims.into();
        if dims.is_empty() {
            return Err(InkError::invalid_shape("target shape must not be empty"));
        }
        if let Some(pos) = dims.iter().position(|&d| d == 0) {
            return Err(InkError::invalid_shape(format!(
                "target shape extents must be positive (axis {pos} is 0)"
            )));
        }
        dims.iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| InkError::invalid_shape("target shape element count overflows"))?;
        Ok(Self(dims))
    }

    /// Decode a shape from JSON; only an array of positive integers is accepted.
    pub fn from_json(value: &serde_json::Value) -> InkResult<Self> {
        let serde_json::Value::Array(items) = value else {
            return Err(InkError::invalid_shape(format!(
                "target shape must be an array of integers, got {value}"
            )));
        };
        let dims = items
            .iter()
            .map(|v| {
                v.as_u64()
                    .and_then(|d| usize::try_from(d).ok())
                    .ok_or_else(|| {
                        InkError::invalid_shape(format!(
                            "target shape element {v} is not a positive integer"
                        ))
                    })
            })
            .collect::<InkResult<Vec<_>>>()?;
        Self::new(dims)
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn element_count(&self) -> usize {
        self.0.iter().product()
    }

    /// Fail with [`InkError::ShapeMismatch`] unless the shape holds exactly `len` elements.
    pub fn check(&self, len: usize) -> InkResult<()> {
        let actual = self.element_count();
        if actual != len {
            return Err(InkError::shape_mismatch(len, actual));
        }
        Ok(())
    }
}

impl FromStr for TargetShape {
    type Err = InkError;

    /// Parse `"1,28,28,1"`, `"(1, 28, 28, 1)"` or `"1x28x28x1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .trim_start_matches(['(', '['])
            .trim_end_matches([')', ']']);
        let dims = inner
            .split([',', 'x'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<usize>().map_err(|_| {
                    InkError::invalid_shape(format!(
                        "target shape element '{t}' is not a positive integer"
                    ))
                })
            })
            .collect::<InkResult<Vec<_>>>()?;
        Self::new(dims)
    }
}

impl<'de> serde::Deserialize<'de> for TargetShape {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let value = <serde_json::Value as serde::Deserialize>::deserialize(de)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Reduce every texel of `buf` to BT.709 luma, row-major.
pub fn luma_plane(buf: &ScaledBuffer) -> Vec<u8> {
    buf.texels().map(|t| luma_bt709(t[0], t[1], t[2])).collect()
}

/// Map luma values into `dtype`'s numeric domain.
pub fn quantize(luma: &[u8], dtype: Dtype, domain_scale: f64) -> TensorData {
    match dtype {
        Dtype::Float32 => TensorData::F32(
            luma.iter()
                .map(|&l| (f64::from(l) / domain_scale) as f32)
                .collect(),
        ),
        Dtype::Int8 => TensorData::I8(luma.iter().map(|&l| (i16::from(l) - 128) as i8).collect()),
        Dtype::Uint8 => TensorData::U8(luma.to_vec()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/quantize.rs"]
mod tests;
