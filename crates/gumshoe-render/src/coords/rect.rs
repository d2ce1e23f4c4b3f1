use super::Vec2;

/// Axis-aligned rectangle (top-left origin).
///
/// Width/height are expected to be non-negative; producers that may yield
/// negative extents (sprites with mirrored scale) should call `normalized()`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of size `w x h` centered on `center`.
    #[inline]
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn area(self) -> f32 {
        self.size.x.max(0.0) * self.size.y.max(0.0)
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let (x, w) = if self.size.x < 0.0 {
            (self.origin.x + self.size.x, -self.size.x)
        } else {
            (self.origin.x, self.size.x)
        };
        let (y, h) = if self.size.y < 0.0 {
            (self.origin.y + self.size.y, -self.size.y)
        } else {
            (self.origin.y, self.size.y)
        };
        Rect::new(x, y, w, h)
    }

    /// Grows the rectangle by `margin` on every side.
    #[inline]
    pub fn expanded(self, margin: f32) -> Self {
        Rect::new(
            self.origin.x - margin,
            self.origin.y - margin,
            self.size.x + margin * 2.0,
            self.size.y + margin * 2.0,
        )
    }

    /// Closed-interval containment: edges count as inside.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.origin.x && p.x <= self.right() && p.y >= self.origin.y && p.y <= self.bottom()
    }

    /// Separating-axis overlap test. Touching edges count as overlapping.
    #[inline]
    pub fn overlaps(self, other: Rect) -> bool {
        !(other.right() < self.origin.x
            || other.origin.x > self.right()
            || other.bottom() < self.origin.y
            || other.origin.y > self.bottom())
    }

    /// Positive-area intersection, or `None`.
    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let x0 = self.origin.x.max(other.origin.x);
        let y0 = self.origin.y.max(other.origin.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }

    /// Smallest rectangle covering both.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        let x0 = self.origin.x.min(other.origin.x);
        let y0 = self.origin.y.min(other.origin.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Horizontal and vertical gap to `other`; zero on an axis where they overlap.
    #[inline]
    pub fn gap_to(self, other: Rect) -> Vec2 {
        let gx = (self.origin.x.max(other.origin.x) - self.right().min(other.right())).max(0.0);
        let gy = (self.origin.y.max(other.origin.y) - self.bottom().min(other.bottom())).max(0.0);
        Vec2::new(gx, gy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── overlaps ──────────────────────────────────────────────────────────

    #[test]
    fn overlaps_partial() {
        assert!(r(0.0, 0.0, 800.0, 600.0).overlaps(r(790.0, 300.0, 32.0, 32.0)));
    }

    #[test]
    fn overlaps_touching_edge_counts() {
        assert!(r(0.0, 0.0, 10.0, 10.0).overlaps(r(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn overlaps_disjoint() {
        assert!(!r(0.0, 0.0, 800.0, 600.0).overlaps(r(1000.0, 1000.0, 32.0, 32.0)));
        assert!(!r(0.0, 0.0, 10.0, 10.0).overlaps(r(-20.0, 0.0, 5.0, 5.0)));
    }

    // ── contains / expanded ───────────────────────────────────────────────

    #[test]
    fn contains_is_closed() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(!rect.contains(Vec2::new(10.1, 5.0)));
    }

    #[test]
    fn expanded_grows_every_side() {
        assert_eq!(r(10.0, 10.0, 5.0, 5.0).expanded(2.0), r(8.0, 8.0, 9.0, 9.0));
    }

    #[test]
    fn from_center_places_origin() {
        assert_eq!(Rect::from_center(Vec2::new(100.0, 50.0), 32.0, 16.0), r(84.0, 42.0, 32.0, 16.0));
    }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_flips_negative_extents() {
        assert_eq!(r(10.0, 10.0, -4.0, -3.0).normalized(), r(6.0, 7.0, 4.0, 3.0));
    }

    // ── intersect / union / gap ───────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        assert_eq!(r(0.0, 0.0, 10.0, 10.0).intersect(r(5.0, 5.0, 10.0, 10.0)), Some(r(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn intersect_touching_is_none() {
        assert!(r(0.0, 0.0, 10.0, 10.0).intersect(r(10.0, 0.0, 10.0, 10.0)).is_none());
    }

    #[test]
    fn union_covers_both() {
        assert_eq!(r(0.0, 0.0, 10.0, 10.0).union(r(20.0, 5.0, 10.0, 10.0)), r(0.0, 0.0, 30.0, 15.0));
    }

    #[test]
    fn gap_is_zero_on_overlapping_axis() {
        let g = r(0.0, 0.0, 10.0, 10.0).gap_to(r(40.0, 5.0, 10.0, 10.0));
        assert_eq!(g, Vec2::new(30.0, 0.0));
    }
}
