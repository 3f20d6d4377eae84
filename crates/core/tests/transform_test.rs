//! Tests for affine transforms and the transform attribute parser.

use svgtex_core::error::SvgTexError;
use svgtex_core::transform::{AffineTransform, parse_transform};
use svgtex_core::utils::Point;

fn assert_point_eq(actual: Point, expected: Point) {
    let eps = 1e-9;
    assert!(
        (actual.0 - expected.0).abs() < eps && (actual.1 - expected.1).abs() < eps,
        "expected {expected:?}, got {actual:?}"
    );
}

// === Composition ===

#[test]
fn test_compose_applies_inner_first() {
    let outer = AffineTransform::translate(10.0, 0.0);
    let inner = AffineTransform::uniform_scale(2.0);
    let composed = AffineTransform::compose(&outer, &inner);
    assert_point_eq(composed.apply((1.0, 1.0)), (12.0, 2.0));

    let reversed = AffineTransform::compose(&inner, &outer);
    assert_point_eq(reversed.apply((1.0, 1.0)), (22.0, 2.0));
}

#[test]
fn test_composition_matches_sequential_application() {
    let steps = [
        AffineTransform::translate(10.0, 5.0),
        AffineTransform::rotate(30.0),
        AffineTransform::scale(2.0, 3.0),
        AffineTransform::matrix(1.0, 0.5, 0.0, 1.0, 3.0, 4.0),
        AffineTransform::rotate_about(45.0, 7.0, -2.0),
    ];
    let points = [(0.0, 0.0), (1.0, 2.0), (-3.5, 8.25)];

    let composed = steps.iter().fold(AffineTransform::identity(), |acc, step| {
        AffineTransform::compose(step, &acc)
    });
    for p in points {
        let sequential = steps.iter().fold(p, |q, step| step.apply(q));
        assert_point_eq(composed.apply(p), sequential);
    }
}

#[test]
fn test_composition_is_associative() {
    let a = AffineTransform::translate(1.0, 2.0);
    let b = AffineTransform::rotate(60.0);
    let c = AffineTransform::scale(0.5, 4.0);
    let left = AffineTransform::compose(&AffineTransform::compose(&a, &b), &c);
    let right = AffineTransform::compose(&a, &AffineTransform::compose(&b, &c));
    assert_point_eq(left.apply((3.0, -1.0)), right.apply((3.0, -1.0)));
}

#[test]
fn test_identity_is_neutral() {
    let t = AffineTransform::matrix(2.0, 1.0, -1.0, 3.0, 5.0, 6.0);
    let id = AffineTransform::identity();
    assert_eq!(AffineTransform::compose(&t, &id), t);
    assert_eq!(AffineTransform::compose(&id, &t), t);
    assert!(id.is_identity());
    assert!(!t.is_identity());
}

// === Builders ===

#[test]
fn test_rotate_about_center() {
    let t = AffineTransform::rotate_about(90.0, 10.0, 10.0);
    assert_point_eq(t.apply((10.0, 10.0)), (10.0, 10.0));
    assert_point_eq(t.apply((20.0, 10.0)), (10.0, 20.0));
}

#[test]
fn test_apply_linear_ignores_translation() {
    let t = AffineTransform::compose(
        &AffineTransform::translate(100.0, 100.0),
        &AffineTransform::uniform_scale(2.0),
    );
    assert_point_eq(t.apply_linear((1.0, 1.0)), (2.0, 2.0));
    assert_eq!(t.translation(), (100.0, 100.0));
}

// === Rotation extraction ===

#[test]
fn test_rotation_degrees_recovers_angle() {
    for theta in [0.0, 30.0, 90.0, 180.0, 270.0] {
        let recovered = AffineTransform::rotate(theta).rotation_degrees();
        let diff = (recovered - theta).rem_euclid(360.0);
        let diff = diff.min(360.0 - diff);
        assert!(diff < 1e-9, "theta {theta}: recovered {recovered}");
    }
}

#[test]
fn test_rotation_survives_uniform_scale() {
    let t = AffineTransform::compose(
        &AffineTransform::uniform_scale(3.0),
        &AffineTransform::rotate(30.0),
    );
    assert!(t.is_similarity());
    assert!((t.rotation_degrees() - 30.0).abs() < 1e-9);
}

#[test]
fn test_skew_is_not_a_similarity() {
    let skew = AffineTransform::matrix(1.0, 0.0, 0.5, 1.0, 0.0, 0.0);
    assert!(!skew.is_similarity());
    // First column only: the skew does not show up in the angle.
    assert_eq!(skew.rotation_degrees(), 0.0);
}

// === Parser ===

#[test]
fn test_parse_single_functions() {
    assert_eq!(
        parse_transform("translate(10,20)").unwrap(),
        AffineTransform::translate(10.0, 20.0)
    );
    assert_eq!(
        parse_transform("translate(7)").unwrap(),
        AffineTransform::translate(7.0, 0.0)
    );
    assert_eq!(
        parse_transform("scale(2)").unwrap(),
        AffineTransform::scale(2.0, 2.0)
    );
    assert_eq!(
        parse_transform("matrix(1 0 0 1 5 6)").unwrap(),
        AffineTransform::matrix(1.0, 0.0, 0.0, 1.0, 5.0, 6.0)
    );
    assert_point_eq(
        parse_transform("rotate(90 10 10)").unwrap().apply((20.0, 10.0)),
        (10.0, 20.0),
    );
}

#[test]
fn test_parse_empty_is_identity() {
    assert!(parse_transform("").unwrap().is_identity());
    assert!(parse_transform("  ").unwrap().is_identity());
}

#[test]
fn test_parse_leftmost_applies_first() {
    let t = parse_transform("translate(10) scale(2)").unwrap();
    assert_point_eq(t.apply((1.0, 1.0)), (22.0, 2.0));

    let t = parse_transform("scale(2),translate(10)").unwrap();
    assert_point_eq(t.apply((1.0, 1.0)), (12.0, 2.0));
}

#[test]
fn test_parse_errors() {
    for bad in [
        "skewX(10)",
        "translate(1,2,3)",
        "rotate(1,2)",
        "scale()",
        "translate(a)",
        "translate 10",
        "translate(1) garbage",
    ] {
        match parse_transform(bad) {
            Err(SvgTexError::Parse { what, .. }) => assert_eq!(what, "transform", "{bad}"),
            other => panic!("expected parse error for `{bad}`, got {other:?}"),
        }
    }
}
