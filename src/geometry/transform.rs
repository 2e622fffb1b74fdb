use std::ops::{Mul, MulAssign};

use super::Point;

/// 2x3 affine matrix, `[a b c d e f]` mapping `(x, y)` to
/// `(a*x + c*y + e, b*x + d*y + f)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }
}

impl Mul<Point> for Transform {
    type Output = Point;

    fn mul(self, other: Point) -> Self::Output {
        let x = self.a * other.x + self.c * other.y + self.e;
        let y = self.b * other.x + self.d * other.y + self.f;

        Point::new(x, y)
    }
}

impl MulAssign<Transform> for Point {
    fn mul_assign(&mut self, rhs: Transform) {
        *self = rhs * *self;
    }
}
