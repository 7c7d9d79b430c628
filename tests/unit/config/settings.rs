use std::collections::HashMap;

use super::*;
use crate::Dtype;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k: &str| map.get(k).cloned()
}

#[test]
fn defaults_match_the_drawing_pad() {
    let cfg = PadConfig::default();
    assert_eq!(cfg.canvas.width, 250);
    assert_eq!(cfg.canvas.height, 250);
    assert_eq!(cfg.canvas.brush_radius, 10.0);
    assert_eq!(cfg.export.target_width, 28);
    assert_eq!(cfg.export.target_height, 28);
    assert_eq!(cfg.export.domain_scale, 255.0);
    assert_eq!(cfg.export.filter, Filter::Nearest);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.export_request(), ExportRequest::default());
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = PadConfig::from_json_str(
        r#"{
            "canvas": { "brush_radius": 6.5 },
            "export": { "dtype": "float32", "target_shape": [1, 28, 28, 1], "filter": "area" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.canvas.width, 250);
    assert_eq!(cfg.canvas.brush_radius, 6.5);

    let req = cfg.export_request();
    assert_eq!(req.dtype, DtypeTag::Known(Dtype::Float32));
    assert_eq!(req.filter, Filter::Area);
    assert_eq!(req.target_shape.unwrap().dims(), &[1, 28, 28, 1]);

    let canvas = cfg.build_canvas().unwrap();
    assert_eq!(canvas.brush_radius(), 6.5);
}

#[test]
fn invalid_json_values_are_rejected() {
    assert!(matches!(
        PadConfig::from_json_str(r#"{"canvas": {"width": 0}}"#),
        Err(InkError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        PadConfig::from_json_str(r#"{"export": {"target_shape": [1, 27, 28, 1]}}"#),
        Err(InkError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        PadConfig::from_json_str(r#"{"export": {"domain_scale": -1.0}}"#),
        Err(InkError::Validation(_))
    ));
    assert!(PadConfig::from_json_str(r#"{"canvas": {"colour": "red"}}"#).is_err());
}

#[test]
fn malformed_target_shape_is_a_shape_error() {
    for shape in [
        r#""1,28,28,1""#,
        "[]",
        "[1, 0, 28]",
        "[1, -28, 28]",
        "[1.5, 28]",
        "{}",
    ] {
        let json = format!(r#"{{"export": {{"target_shape": {shape}}}}}"#);
        assert!(
            matches!(
                PadConfig::from_json_str(&json),
                Err(InkError::InvalidShapeType(_))
            ),
            "{shape}"
        );
    }

    let cfg = PadConfig::from_json_str(r#"{"export": {"target_shape": null}}"#).unwrap();
    assert!(cfg.export.target_shape.is_none());
}

#[test]
fn unknown_dtype_in_config_is_kept_verbatim() {
    let cfg = PadConfig::from_json_str(r#"{"export": {"dtype": "bfloat16"}}"#).unwrap();
    assert_eq!(
        cfg.export_request().dtype,
        DtypeTag::Unknown("bfloat16".to_string())
    );
}

#[test]
fn overrides_replace_fields() {
    let mut cfg = PadConfig::default();
    cfg.apply_overrides(env(&[
        (ENV_BRUSH_RADIUS, "4"),
        (ENV_DTYPE, "int8"),
        (ENV_FILTER, "area"),
    ]))
    .unwrap();
    assert_eq!(cfg.canvas.brush_radius, 4.0);
    assert_eq!(cfg.export.dtype, "int8");
    assert_eq!(cfg.export.filter, Filter::Area);
}

#[test]
fn bad_overrides_are_validation_errors() {
    let mut cfg = PadConfig::default();
    assert!(matches!(
        cfg.apply_overrides(env(&[(ENV_BRUSH_RADIUS, "wide")])),
        Err(InkError::Validation(_))
    ));
    assert!(matches!(
        cfg.apply_overrides(env(&[(ENV_FILTER, "lanczos")])),
        Err(InkError::Validation(_))
    ));
    assert!(PadConfig::default().apply_overrides(env(&[])).is_ok());
}

#[test]
fn config_file_round_trips() {
    let dir = std::path::PathBuf::from("target").join("config_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("pad.json");

    let mut cfg = PadConfig::default();
    cfg.export.dtype = "float32".to_string();
    cfg.export.target_shape = Some(TargetShape::new(vec![1, 784]).unwrap());
    std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();

    assert_eq!(PadConfig::from_path(&path).unwrap(), cfg);
    assert!(matches!(
        PadConfig::from_path(&dir.join("missing.json")),
        Err(InkError::Other(_))
    ));
}
