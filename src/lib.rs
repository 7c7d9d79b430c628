//! inkgrid turns free-hand pointer strokes into tensors for small image classifiers.
//!
//! # Pipeline overview
//!
//! 1. **Record**: pointer events drive a [`StrokeRecorder`], which appends strokes to a
//!    [`RasterCanvas`] and paints them as binary white-on-black brush disks.
//! 2. **Snapshot**: the canvas hands out an immutable [`Snapshot`] of its RGBA8 buffer
//!    (optionally saved losslessly as PNG).
//! 3. **Rescale**: the snapshot is mapped onto a small raster (28x28 by default) with one
//!    affine transform, see [`rescale`].
//! 4. **Quantize**: every texel is reduced to BT.709 luma and mapped into the numeric
//!    domain an inference runtime declares ([`Dtype`]), then reshaped to its input shape.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: rendering, rescaling and quantization are pure functions of history.
//! - **Fail fast**: malformed export arguments are rejected before any pixel work, and no
//!   export error can touch canvas history.
#![forbid(unsafe_code)]

mod canvas;
mod config;
mod export;
mod foundation;
mod inference;
mod input;

pub use canvas::raster::RasterCanvas;
pub use canvas::snapshot::{DEFAULT_SNAPSHOT_FILE, Snapshot};
pub use canvas::stroke::Stroke;
pub use config::settings::{
    CanvasConfig, ENV_BRUSH_RADIUS, ENV_DTYPE, ENV_FILTER, ExportConfig, PadConfig,
};
pub use export::quantize::{
    Dtype, DtypeTag, ExportWarning, TargetShape, TensorData, luma_plane, quantize,
};
pub use export::rescale::{Filter, ScaledBuffer, export_transform, rescale};
pub use export::tensor::{
    DEFAULT_DOMAIN_SCALE, DEFAULT_TARGET_EDGE, ExportRequest, ExportedTensor, export_tensor,
};
pub use foundation::core::{
    Affine, BACKGROUND, BYTES_PER_TEXEL, Dimensions, FOREGROUND, Point, Rgba8,
};
pub use foundation::error::{InkError, InkResult};
pub use foundation::math::luma_bt709;
pub use inference::classifier::{Classifier, InputSpec, Prediction, argmax, predict};
pub use input::recorder::{Action, DrawState, PointerEvent, StrokeRecorder};
