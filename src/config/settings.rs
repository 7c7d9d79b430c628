use std::path::Path;

use anyhow::Context as _;

use crate::{
    canvas::raster::RasterCanvas,
    export::{
        quantize::{DtypeTag, TargetShape},
        rescale::Filter,
        tensor::{DEFAULT_DOMAIN_SCALE, DEFAULT_TARGET_EDGE, ExportRequest},
    },
    foundation::{
        core::Dimensions,
        error::{InkError, InkResult},
    },
};

/// Environment keys understood by [`PadConfig::apply_overrides`].
pub const ENV_BRUSH_RADIUS: &str = "INKGRID_BRUSH_RADIUS";
pub const ENV_DTYPE: &str = "INKGRID_DTYPE";
pub const ENV_FILTER: &str = "INKGRID_FILTER";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub brush_radius: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 250,
            height: 250,
            brush_radius: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Free-form so runtime-reported tags can be stored verbatim.
    pub dtype: String,
    pub target_width: u32,
    pub target_height: u32,
    pub domain_scale: f64,
    pub target_shape: Option<TargetShape>,
    pub filter: Filter,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dtype: "uint8".to_string(),
            target_width: DEFAULT_TARGET_EDGE,
            target_height: DEFAULT_TARGET_EDGE,
            domain_scale: DEFAULT_DOMAIN_SCALE,
            target_shape: None,
            filter: Filter::default(),
        }
    }
}

/// Canvas and export settings, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PadConfig {
    pub canvas: CanvasConfig,
    pub export: ExportConfig,
}

impl PadConfig {
    pub fn from_json_str(s: &str) -> InkResult<Self> {
        let value: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| InkError::validation(format!("parse config JSON: {e}")))?;
        // Shape errors keep their own variant instead of becoming a generic parse error.
        if let Some(shape) = value
            .pointer("/export/target_shape")
            .filter(|v| !v.is_null())
        {
            TargetShape::from_json(shape)?;
        }
        let cfg: Self = serde_json::from_value(value)
            .map_err(|e| InkError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> InkResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Override fields from `INKGRID_*` keys resolved through `lookup`.
    ///
    /// Pass `|k| std::env::var(k).ok()` to read the process environment.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> InkResult<()> {
        if let Some(v) = lookup(ENV_BRUSH_RADIUS) {
            self.canvas.brush_radius = v.trim().parse().map_err(|_| {
                InkError::validation(format!("{ENV_BRUSH_RADIUS} must be a number, got '{v}'"))
            })?;
        }
        if let Some(v) = lookup(ENV_DTYPE) {
            self.export.dtype = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_FILTER) {
            self.export.filter = v.parse()?;
        }
        self.validate()
    }

    pub fn validate(&self) -> InkResult<()> {
        Dimensions::new(self.canvas.width, self.canvas.height)?;
        if !self.canvas.brush_radius.is_finite() {
            return Err(InkError::validation("canvas.brush_radius must be finite"));
        }
        self.export_request().validate()?;
        Ok(())
    }

    pub fn build_canvas(&self) -> InkResult<RasterCanvas> {
        RasterCanvas::new(
            self.canvas.width,
            self.canvas.height,
            self.canvas.brush_radius,
        )
    }

    pub fn export_request(&self) -> ExportRequest {
        ExportRequest {
            dtype: DtypeTag::from(self.export.dtype.as_str()),
            target_width: self.export.target_width,
            target_height: self.export.target_height,
            domain_scale: self.export.domain_scale,
            target_shape: self.export.target_shape.clone(),
            filter: self.export.filter,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
