/// Convenience result type used across inkgrid.
pub type InkResult<T> = Result<T, InkError>;

/// Top-level error taxonomy used by canvas and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum InkError {
    /// A canvas or export target was requested with a zero-sized axis.
    #[error("invalid dimensions: {width}x{height} (both must be > 0)")]
    InvalidDimensions {
        /// Requested width in texels.
        width: u32,
        /// Requested height in texels.
        height: u32,
    },

    /// The requested target shape does not hold exactly one element per exported texel.
    #[error("shape mismatch: target shape holds {actual} elements, image has {expected}")]
    ShapeMismatch {
        /// Number of texels produced by the export (`width * height`).
        expected: usize,
        /// Element count of the requested target shape.
        actual: usize,
    },

    /// A target shape argument that is not a non-empty sequence of positive integers.
    #[error("invalid shape type: {0}")]
    InvalidShapeType(String),

    /// Invalid user-provided values (config, brush, domain scale).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InkError {
    /// Build a [`InkError::InvalidDimensions`] value.
    pub fn invalid_dimensions(width: u32, height: u32) -> Self {
        Self::InvalidDimensions { width, height }
    }

    /// Build a [`InkError::ShapeMismatch`] value.
    pub fn shape_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    /// Build a [`InkError::InvalidShapeType`] value.
    pub fn invalid_shape(msg: impl Into<String>) -> Self {
        Self::InvalidShapeType(msg.into())
    }

    /// Build a [`InkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
