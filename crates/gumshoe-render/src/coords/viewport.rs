/// Viewport size in screen pixels.
///
/// The camera divides this by its zoom to get the world-space footprint.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// World-space extent covered at the given zoom.
    #[inline]
    pub fn scaled(self, zoom: f32) -> Self {
        Self::new(self.width / zoom, self.height / zoom)
    }
}
