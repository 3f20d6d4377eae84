//! Geometric primitives shared by the transform, bounding-box and picture code.
//!
//! Matrices use the common six-element affine convention `(a, b, c, d, e, f)`,
//! mapping a point `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// A 6-element affine transformation matrix (a, b, c, d, e, f).
pub type Matrix = (f64, f64, f64, f64, f64, f64);

/// Identity transformation matrix.
pub const MATRIX_IDENTITY: Matrix = (1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Number of decimal digits kept for picture coordinates.
pub const PICTURE_DIGITS: i32 = 3;

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Multiplies two matrices so that the result applies `m1` first, then `m0`.
pub fn mult_matrix(m1: Matrix, m0: Matrix) -> Matrix {
    let (a1, b1, c1, d1, e1, f1) = m1;
    let (a0, b0, c0, d0, e0, f0) = m0;
    (
        a0 * a1 + c0 * b1,
        b0 * a1 + d0 * b1,
        a0 * c1 + c0 * d1,
        b0 * c1 + d0 * d1,
        a0 * e1 + c0 * f1 + e0,
        b0 * e1 + d0 * f1 + f0,
    )
}

/// Applies a matrix to a point.
pub fn apply_matrix_pt(m: Matrix, v: Point) -> Point {
    let (a, b, c, d, e, f) = m;
    let (x, y) = v;
    (a * x + c * y + e, b * x + d * y + f)
}

/// Applies the linear part of a matrix to a vector (ignoring translation).
pub fn apply_matrix_norm(m: Matrix, v: Point) -> Point {
    let (a, b, c, d, _e, _f) = m;
    let (p, q) = v;
    (a * p + c * q, b * p + d * q)
}

/// Rounds `value` to `digits` decimal places.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    // Normalize negative zero so it never prints as "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Divides `value` by `unit` and rounds to picture precision.
pub fn normalize(value: f64, unit: f64) -> f64 {
    round_to(value / unit, PICTURE_DIGITS)
}
