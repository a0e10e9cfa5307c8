use crate::{CanvasError, Result};
use std::{
    fmt,
    ops::{Add, Div, Mul, Sub},
};

pub type Scalar = f64;
pub const EPSILON: f64 = f64::EPSILON;
pub const PI: f64 = std::f64::consts::PI;

/// Format floats in a compact way suitable for debug output
pub fn scalar_fmt(f: &mut fmt::Formatter<'_>, value: Scalar) -> fmt::Result {
    let value_abs = value.abs();
    if value_abs.fract() < EPSILON {
        write!(f, "{}", value.trunc() as i64)
    } else if value_abs > 9999.0 || value_abs <= 0.0001 {
        write!(f, "{:.3e}", value)
    } else {
        let ten: Scalar = 10.0;
        let round = ten.powi(6 - (value_abs.trunc() + 1.0).log10().ceil() as i32);
        write!(f, "{}", (value * round).round() / round)
    }
}

/// Value representing a 2D point or vector.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Point(pub [Scalar; 2]);

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Point([x, y]) = self;
        scalar_fmt(f, *x)?;
        write!(f, ",")?;
        scalar_fmt(f, *y)?;
        Ok(())
    }
}

impl Point {
    #[inline]
    pub const fn new(x: Scalar, y: Scalar) -> Self {
        Self([x, y])
    }

    /// Get `x` component of the point
    #[inline]
    pub fn x(&self) -> Scalar {
        self.0[0]
    }

    /// Get `y` compenent of the point
    #[inline]
    pub fn y(&self) -> Scalar {
        self.0[1]
    }

    /// Get length of the vector (distance from the origin)
    pub fn length(self) -> Scalar {
        let Self([x, y]) = self;
        x.hypot(y)
    }

    /// Distance between two points
    pub fn dist(self, other: Self) -> Scalar {
        (self - other).length()
    }

    /// Midpoint between two points
    pub fn mid(self, other: Self) -> Self {
        (self + other) / 2.0
    }

    /// Dot product between two vectors
    pub fn dot(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * x1 + y0 * y1
    }

    /// Vector rotated by 90 degrees
    pub fn normal(self) -> Point {
        let Self([x, y]) = self;
        Self([-y, x])
    }

    /// Unit vector with the same direction, `None` for zero length vectors
    pub fn normalize(self) -> Option<Point> {
        let length = self.length();
        if length < EPSILON || !length.is_finite() {
            None
        } else {
            Some(self / length)
        }
    }

    /// Cross product between two vectors
    pub fn cross(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * y1 - y0 * x1
    }

    /// Determine if self is close to the other within the margin of error
    pub fn is_close_to(self, other: Point, eps: Scalar) -> bool {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        (x0 - x1).abs() < eps && (y0 - y1).abs() < eps
    }
}

impl From<(Scalar, Scalar)> for Point {
    #[inline]
    fn from(xy: (Scalar, Scalar)) -> Self {
        Self([xy.0, xy.1])
    }
}

impl From<[Scalar; 2]> for Point {
    #[inline]
    fn from(xy: [Scalar; 2]) -> Self {
        Self(xy)
    }
}

impl Mul<Point> for Scalar {
    type Output = Point;

    #[inline]
    fn mul(self, other: Point) -> Self::Output {
        let Point([x, y]) = other;
        Point([self * x, self * y])
    }
}

impl Mul<Scalar> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: Scalar) -> Self::Output {
        rhs * self
    }
}

impl Div<Scalar> for Point {
    type Output = Point;

    #[inline]
    fn div(self, rhs: Scalar) -> Self::Output {
        let Point([x, y]) = self;
        Point([x / rhs, y / rhs])
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 + x1, y0 + y1])
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 - x1, y0 - y1])
    }
}

/// 2D affine transformation
///
/// Stored as an array [a, b, c, d, e, f] that semantically corresponds to
/// a matrix:
/// ┌       ┐
/// │ a b c │
/// │ d e f │
/// │ 0 0 1 │
/// └       ┘
/// so that `x' = a·x + b·y + c` and `y' = d·x + e·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform([Scalar; 6]);

impl Default for Transform {
    fn default() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }
}

impl Transform {
    pub const fn new(a: Scalar, b: Scalar, c: Scalar, d: Scalar, e: Scalar, f: Scalar) -> Self {
        Self([a, b, c, d, e, f])
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn new_scale(sx: Scalar, sy: Scalar) -> Self {
        Self([sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    pub fn new_translate(tx: Scalar, ty: Scalar) -> Self {
        Self([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    /// Mirror transformation, negates the flipped axes
    pub fn new_flip(xflip: bool, yflip: bool) -> Self {
        let sx = if xflip { -1.0 } else { 1.0 };
        let sy = if yflip { -1.0 } else { 1.0 };
        Self::new_scale(sx, sy)
    }

    /// Rotation around the origin by `degrees`
    pub fn new_rotate(degrees: Scalar) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self([cos, -sin, 0.0, sin, cos, 0.0])
    }

    /// Coefficients `[a, b, c, d, e, f]`
    pub fn coefficients(&self) -> [Scalar; 6] {
        self.0
    }

    /// Determinant of the linear part
    pub fn det(&self) -> Scalar {
        let Self([a, b, _, d, e, _]) = self;
        a * e - b * d
    }

    /// Apply this transformation to a point
    pub fn apply(&self, point: impl Into<Point>) -> Point {
        let Self([a, b, c, d, e, f]) = self;
        let Point([x, y]) = point.into();
        Point([a * x + b * y + c, d * x + e * y + f])
    }

    /// Apply only the linear part of the transformation (translation is ignored)
    pub fn apply_vector(&self, vector: impl Into<Point>) -> Point {
        let Self([a, b, _, d, e, _]) = self;
        let Point([x, y]) = vector.into();
        Point([a * x + b * y, d * x + e * y])
    }

    /// Find the inverse transformation
    pub fn invert(&self) -> Result<Self> {
        // inv([[M, v], [0, 1]]) = [[inv(M), - inv(M) * v], [0, 1]]
        let Self([a, b, c, d, e, f]) = self;
        let det = self.det();
        if det == 0.0 || !det.is_finite() {
            return Err(CanvasError::DegenerateTransform);
        }
        let ra = e / det;
        let rb = -b / det;
        let rd = -d / det;
        let re = a / det;
        let rc = -ra * c - rb * f;
        let rf = -rd * c - re * f;
        Ok(Self([ra, rb, rc, rd, re, rf]))
    }

    /// Apply translation by `[tx, ty]` before self
    pub fn translate(&self, tx: Scalar, ty: Scalar) -> Self {
        self.compose(Self::new_translate(tx, ty))
    }

    /// Apply scale transformatoin by `[sx, sy]` before self
    pub fn scale(&self, sx: Scalar, sy: Scalar) -> Self {
        self.compose(Self::new_scale(sx, sy))
    }

    /// Apply flip of the selected axes before self
    pub fn flip(&self, xflip: bool, yflip: bool) -> Self {
        self.compose(Self::new_flip(xflip, yflip))
    }

    /// Apply rotation by `degrees` around the origin before self
    pub fn rotate(&self, degrees: Scalar) -> Self {
        self.compose(Self::new_rotate(degrees))
    }

    /// Apply rotation around point `p` by `degrees` before self
    pub fn rotate_around(&self, degrees: Scalar, p: impl Into<Point>) -> Self {
        let p = p.into();
        self.translate(p.x(), p.y())
            .rotate(degrees)
            .translate(-p.x(), -p.y())
    }

    /// Multiply transformations in matrix form, resulting transformation applies
    /// `other` first and `self` after it.
    pub fn compose(&self, other: Transform) -> Self {
        let Self([s00, s01, s02, s10, s11, s12]) = self;
        let Self([o00, o01, o02, o10, o11, o12]) = other;

        // s00, s01, s02 | o00, o01, o02
        // s10, s11, s12 | o10, o11, o12
        // 0  , 0  , 1   | 0  , 0  , 1
        Self([
            s00 * o00 + s01 * o10,
            s00 * o01 + s01 * o11,
            s00 * o02 + s01 * o12 + s02,
            s10 * o00 + s11 * o10,
            s10 * o01 + s11 * o11,
            s10 * o02 + s11 * o12 + s12,
        ])
    }

    /// Check that all coefficients are within `eps` of the other transformation
    pub fn is_close_to(&self, other: Transform, eps: Scalar) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(s, o)| (s - o).abs() < eps)
    }
}

impl Mul<Transform> for Transform {
    type Output = Transform;

    fn mul(self, other: Transform) -> Self::Output {
        self.compose(other)
    }
}
