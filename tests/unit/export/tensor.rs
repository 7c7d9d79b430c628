use super::*;
use crate::RasterCanvas;
use crate::foundation::core::Point;

fn dot_canvas() -> Snapshot {
    let mut canvas = RasterCanvas::new(250, 250, 10.0).unwrap();
    canvas.begin_stroke(Point::new(125.0, 125.0));
    canvas.finish_stroke();
    canvas.render();
    canvas.snapshot()
}

#[test]
fn single_dot_exports_centered_cluster() {
    let t = export_tensor(&dot_canvas(), &ExportRequest::new(Dtype::Uint8)).unwrap();
    assert_eq!(t.dtype, Dtype::Uint8);
    assert_eq!(t.len(), 784);
    assert_eq!(t.shape, vec![784]);
    assert!(t.warnings.is_empty());

    let data = t.data.as_u8().unwrap();
    for row in 0..28u32 {
        for col in 0..28u32 {
            let v = data[t.flat_index(row, col)];
            if (13..=14).contains(&row) && (13..=14).contains(&col) {
                assert_eq!(v, 255, "({row},{col})");
            } else {
                assert_eq!(v, 0, "({row},{col})");
            }
        }
    }
}

#[test]
fn bogus_dtype_degrades_to_uint8() {
    let t = export_tensor(&dot_canvas(), &ExportRequest::new("bogus")).unwrap();
    assert_eq!(t.dtype, Dtype::Uint8);
    assert_eq!(t.len(), 28 * 28);
    assert!(t.data.as_u8().is_some());
    assert_eq!(
        t.warnings,
        vec![ExportWarning::UnknownDtype {
            tag: "bogus".to_string()
        }]
    );
}

#[test]
fn float_and_int_domains_follow_luma() {
    let snap = dot_canvas();

    let f = export_tensor(&snap, &ExportRequest::new(Dtype::Float32)).unwrap();
    assert_eq!(f.value_at(14, 14), Some(1.0));
    assert_eq!(f.value_at(0, 0), Some(0.0));

    let i = export_tensor(&snap, &ExportRequest::new(Dtype::Int8)).unwrap();
    assert_eq!(i.value_at(14, 14), Some(127.0));
    assert_eq!(i.value_at(0, 0), Some(-128.0));
    assert_eq!(i.value_at(28, 0), None);
}

#[test]
fn target_shape_preserves_row_major_order() {
    let snap = dot_canvas();
    let flat = export_tensor(&snap, &ExportRequest::new(Dtype::Uint8)).unwrap();
    let shape = TargetShape::new(vec![1, 28, 28, 1]).unwrap();
    let req = ExportRequest::new(Dtype::Uint8).with_shape(shape);
    let shaped = export_tensor(&snap, &req).unwrap();

    assert_eq!(shaped.shape, vec![1, 28, 28, 1]);
    assert_eq!(shaped.data, flat.data);
    assert_eq!(shaped.flat_index(13, 14), 13 * 28 + 14);
}

#[test]
fn shape_product_law() {
    let snap = dot_canvas();
    for (dims, ok) in [
        (vec![784], true),
        (vec![1, 784], true),
        (vec![28, 28], true),
        (vec![4, 7, 28], true),
        (vec![1, 28, 27, 1], false),
        (vec![785], false),
    ] {
        let shape = TargetShape::new(dims.clone()).unwrap();
        let req = ExportRequest::new(Dtype::Float32).with_shape(shape);
        let res = export_tensor(&snap, &req);
        if ok {
            assert!(res.is_ok(), "{dims:?}");
        } else {
            assert!(
                matches!(res, Err(InkError::ShapeMismatch { expected: 784, .. })),
                "{dims:?}"
            );
        }
    }
}

#[test]
fn custom_target_size_changes_element_count() {
    let req = ExportRequest::new(Dtype::Uint8)
        .with_size(10, 5)
        .with_shape(TargetShape::new(vec![5, 10]).unwrap());
    let t = export_tensor(&dot_canvas(), &req).unwrap();
    assert_eq!(t.len(), 50);
    assert_eq!((t.width, t.height), (10, 5));
}

#[test]
fn invalid_requests_fail_before_work() {
    let snap = dot_canvas();
    assert!(matches!(
        export_tensor(&snap, &ExportRequest::new(Dtype::Uint8).with_size(0, 28)),
        Err(InkError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        export_tensor(&snap, &ExportRequest::new(Dtype::Float32).with_domain_scale(0.0)),
        Err(InkError::Validation(_))
    ));
    assert!(matches!(
        export_tensor(
            &snap,
            &ExportRequest::new(Dtype::Float32).with_domain_scale(f64::NAN)
        ),
        Err(InkError::Validation(_))
    ));
}

#[test]
fn area_filter_export_is_bounded() {
    let req = ExportRequest::new(Dtype::Float32).with_filter(Filter::Area);
    let t = export_tensor(&dot_canvas(), &req).unwrap();
    let data = t.data.as_f32().unwrap();
    assert!(data.iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(data.iter().any(|&v| v > 0.5));
}

#[test]
fn reshape_checks_element_count() {
    let t = export_tensor(&dot_canvas(), &ExportRequest::default()).unwrap();
    let t = t.reshape(&TargetShape::new(vec![28, 28]).unwrap()).unwrap();
    assert_eq!(t.shape, vec![28, 28]);
    assert!(matches!(
        t.reshape(&TargetShape::new(vec![27, 28]).unwrap()),
        Err(InkError::ShapeMismatch {
            expected: 784,
            actual: 756
        })
    ));
}

#[test]
fn export_leaves_canvas_untouched() {
    let mut canvas = RasterCanvas::new(50, 50, 4.0).unwrap();
    canvas.begin_stroke(Point::new(20.0, 20.0));
    canvas.render();
    let before = canvas.snapshot();

    let bad = ExportRequest::new(Dtype::Uint8).with_shape(TargetShape::new(vec![3]).unwrap());
    assert!(export_tensor(&canvas.snapshot(), &bad).is_err());
    let _ = export_tensor(&canvas.snapshot(), &ExportRequest::default()).unwrap();

    assert_eq!(canvas.snapshot(), before);
    assert_eq!(canvas.history().len(), 1);
    assert!(canvas.has_open_stroke());
}

#[test]
fn tensor_serializes_as_plain_json() {
    let t = export_tensor(&dot_canvas(), &ExportRequest::new("bogus").with_size(2, 2)).unwrap();
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["dtype"], "uint8");
    assert_eq!(v["shape"], serde_json::json!([4]));
    assert_eq!(v["data"].as_array().unwrap().len(), 4);
    assert_eq!(v["warnings"][0]["kind"], "unknown_dtype");
}
