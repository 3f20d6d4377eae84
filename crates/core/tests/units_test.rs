//! Tests for length conversion and the viewBox scale.

use svgtex_core::error::SvgTexError;
use svgtex_core::units::{
    DPI, Length, LengthUnit, PhysicalSize, ViewBox, length_to_px, viewbox_scale,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_length_to_px_units() {
    assert_eq!(length_to_px("2in").unwrap(), 192.0);
    assert_close(length_to_px("25.4mm").unwrap(), DPI);
    assert_close(length_to_px("2.54cm").unwrap(), DPI);
    assert_close(length_to_px("72pt").unwrap(), DPI);
    assert_eq!(length_to_px("10px").unwrap(), 10.0);
    assert_eq!(length_to_px("10").unwrap(), 10.0);
}

#[test]
fn test_unsupported_unit() {
    match length_to_px("3em") {
        Err(SvgTexError::UnsupportedUnit(unit)) => assert_eq!(unit, "em"),
        other => panic!("expected unsupported unit, got {other:?}"),
    }
    assert!(matches!(
        length_to_px("50%"),
        Err(SvgTexError::UnsupportedUnit(_))
    ));
}

#[test]
fn test_malformed_number() {
    assert!(matches!(
        length_to_px("in"),
        Err(SvgTexError::Parse { what: "length", .. })
    ));
}

#[test]
fn test_length_display() {
    let len: Length = "210mm".parse().unwrap();
    assert_eq!(len.unit, LengthUnit::Millimeter);
    assert_eq!(len.to_string(), "210mm");
}

#[test]
fn test_viewbox_scale() {
    assert_eq!(
        viewbox_scale("2in", Some("0 0 200 100")).unwrap(),
        192.0 / 200.0
    );
    assert_eq!(viewbox_scale("2in", None).unwrap(), 1.0);
    assert_eq!(viewbox_scale("400", Some("0,0,200,100")).unwrap(), 2.0);
}

#[test]
fn test_viewbox_parse() {
    let vb: ViewBox = "-10 -5 200 100".parse().unwrap();
    assert_eq!((vb.min_x, vb.min_y, vb.width, vb.height), (-10.0, -5.0, 200.0, 100.0));
    assert!("0 0 200".parse::<ViewBox>().is_err());
    assert!("0 0 0 100".parse::<ViewBox>().is_err());
}

#[test]
fn test_physical_size() {
    let size = PhysicalSize::from_declared("2in", "96px").unwrap();
    assert_eq!(size.inches(), (2.0, 1.0));
    assert_eq!(size.big_points(), (144.0, 72.0));
}
