//! Affine transforms for resolving absolute positions of nested SVG nodes.
//!
//! An [`AffineTransform`] is an immutable value: every builder and every
//! composition returns a new transform. Composition follows function
//! notation, `compose(outer, inner)` maps a point through `inner` first and
//! then through `outer`.

mod parser;

pub use parser::parse_transform;
pub(crate) use parser::parse_number_list;

use std::fmt;

use crate::utils::{
    EPSILON, MATRIX_IDENTITY, Matrix, Point, apply_matrix_norm, apply_matrix_pt, approx_eq,
    mult_matrix,
};

/// A 2-D affine map: a 2x2 linear part plus a translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    m: Matrix,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self { m: MATRIX_IDENTITY };

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Raw six-parameter construction, same convention as SVG `matrix(a,b,c,d,e,f)`.
    pub const fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            m: (a, b, c, d, e, f),
        }
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::matrix(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::matrix(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub const fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s)
    }

    /// Rotation by `angle` degrees about the origin.
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self::matrix(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by `angle` degrees about `(cx, cy)`:
    /// `translate(cx, cy) ∘ rotate(angle) ∘ translate(-cx, -cy)`.
    pub fn rotate_about(angle: f64, cx: f64, cy: f64) -> Self {
        if cx == 0.0 && cy == 0.0 {
            return Self::rotate(angle);
        }
        Self::compose(
            &Self::translate(cx, cy),
            &Self::compose(&Self::rotate(angle), &Self::translate(-cx, -cy)),
        )
    }

    /// Combines two transforms; applying the result equals applying `inner`
    /// then `outer`.
    pub fn compose(outer: &Self, inner: &Self) -> Self {
        Self {
            m: mult_matrix(inner.m, outer.m),
        }
    }

    /// Maps a point through this transform.
    pub fn apply(&self, p: Point) -> Point {
        apply_matrix_pt(self.m, p)
    }

    /// Maps a vector through the linear part only.
    pub fn apply_linear(&self, v: Point) -> Point {
        apply_matrix_norm(self.m, v)
    }

    /// The linear part `(a, b, c, d)`.
    pub const fn linear(&self) -> (f64, f64, f64, f64) {
        (self.m.0, self.m.1, self.m.2, self.m.3)
    }

    pub const fn translation(&self) -> Point {
        (self.m.4, self.m.5)
    }

    pub fn is_identity(&self) -> bool {
        let (a, b, c, d, e, f) = self.m;
        approx_eq(a, 1.0, EPSILON)
            && approx_eq(b, 0.0, EPSILON)
            && approx_eq(c, 0.0, EPSILON)
            && approx_eq(d, 1.0, EPSILON)
            && approx_eq(e, 0.0, EPSILON)
            && approx_eq(f, 0.0, EPSILON)
    }

    /// Whether the linear part is a rotation times a uniform scale (no skew,
    /// no non-uniform scale, no reflection).
    pub fn is_similarity(&self) -> bool {
        let (a, b, c, d) = self.linear();
        let tolerance = 1e-6 * (a.abs() + b.abs() + c.abs() + d.abs()).max(1.0);
        approx_eq(a, d, tolerance) && approx_eq(b, -c, tolerance)
    }

    /// Rotation in degrees implied by the first column of the linear part.
    ///
    /// This is `atan2(b, a)` and nothing more: skewed or non-uniformly scaled
    /// transforms yield an approximate angle only.
    pub fn rotation_degrees(&self) -> f64 {
        let (a, b, _, _) = self.linear();
        if !self.is_similarity() {
            tracing::debug!(
                transform = %self,
                "rotation of a non-similarity transform is approximate"
            );
        }
        b.atan2(a).to_degrees()
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b, c, d, e, g) = self.m;
        write!(f, "[{a},{c},{e} ; {b},{d},{g}]")
    }
}
