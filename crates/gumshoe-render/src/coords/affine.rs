use super::{Rect, Vec2};

/// 2D affine transform, laid out like a canvas matrix:
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
///
/// `translate`/`rotate`/`scale` post-multiply, so operations apply to
/// geometry in reverse call order (canvas semantics).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// `self * other`.
    #[inline]
    pub fn then(self, o: Affine) -> Affine {
        Affine {
            a: self.a * o.a + self.c * o.b,
            b: self.b * o.a + self.d * o.b,
            c: self.a * o.c + self.c * o.d,
            d: self.b * o.c + self.d * o.d,
            e: self.a * o.e + self.c * o.f + self.e,
            f: self.b * o.e + self.d * o.f + self.f,
        }
    }

    #[inline]
    pub fn translate(self, tx: f32, ty: f32) -> Affine {
        self.then(Affine { e: tx, f: ty, ..Self::IDENTITY })
    }

    #[inline]
    pub fn rotate(self, radians: f32) -> Affine {
        let (s, c) = radians.sin_cos();
        self.then(Affine { a: c, b: s, c: -s, d: c, e: 0.0, f: 0.0 })
    }

    #[inline]
    pub fn scale(self, sx: f32, sy: f32) -> Affine {
        self.then(Affine { a: sx, d: sy, ..Self::IDENTITY })
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        Vec2::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    #[inline]
    pub fn determinant(self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` for degenerate (zero-scale) matrices.
    pub fn inverse(self) -> Option<Affine> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// Axis-aligned bounds of `rect` after transformation.
    pub fn transform_bounds(self, rect: Rect) -> Rect {
        let corners = [
            self.apply(Vec2::new(rect.x(), rect.y())),
            self.apply(Vec2::new(rect.right(), rect.y())),
            self.apply(Vec2::new(rect.x(), rect.bottom())),
            self.apply(Vec2::new(rect.right(), rect.bottom())),
        ];

        let mut min = corners[0];
        let mut max = corners[0];
        for p in &corners[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}
