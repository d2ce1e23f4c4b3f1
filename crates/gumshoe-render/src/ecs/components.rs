use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::surface::ImageHandle;

use super::Component;

/// World-space placement of an entity. `x`/`y` is the sprite center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    /// Radians, clockwise in screen space.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self { x, y, ..Self::default() }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn is_scaled(&self) -> bool {
        self.scale_x != 1.0 || self.scale_y != 1.0
    }
}

impl Component for Transform {
    const TYPE_NAME: &'static str = "Transform";
}

/// Visual representation of an entity.
///
/// `layer: None` targets the `entities` layer. When `image` is missing or not
/// loaded yet, the sprite is drawn as a `color` rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub width: f32,
    pub height: f32,
    pub visible: bool,
    pub layer: Option<String>,
    pub z_index: i32,
    pub alpha: f32,
    pub color: Color,
    pub image: Option<ImageHandle>,
    /// Sub-rectangle of `image` in image pixels (sprite-sheet frame).
    pub source: Option<Rect>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
            visible: true,
            layer: None,
            z_index: 0,
            alpha: 1.0,
            color: Color::MAGENTA,
            image: None,
            source: None,
        }
    }
}

impl Sprite {
    pub const DEFAULT_LAYER: &'static str = "entities";

    pub fn sized(width: f32, height: f32) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn on_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn with_z(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_image(mut self, image: ImageHandle, source: Option<Rect>) -> Self {
        self.image = Some(image);
        self.source = source;
        self
    }

    /// Target layer name, resolving the default.
    #[inline]
    pub fn layer_name(&self) -> &str {
        self.layer.as_deref().unwrap_or(Self::DEFAULT_LAYER)
    }

    /// World-space bounding box for a sprite centered at `center`.
    ///
    /// Rotation and scale are ignored, as for culling.
    #[inline]
    pub fn bounds_at(&self, center: Vec2) -> Rect {
        Rect::from_center(center, self.width, self.height)
    }
}

impl Component for Sprite {
    const TYPE_NAME: &'static str = "Sprite";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let t = Transform::default();
        assert_eq!((t.scale_x, t.scale_y), (1.0, 1.0));
        assert!(!t.is_scaled());

        let s = Sprite::default();
        assert_eq!((s.width, s.height), (32.0, 32.0));
        assert!(s.visible);
        assert_eq!(s.layer_name(), "entities");
        assert_eq!(s.color, Color::MAGENTA);
    }

    #[test]
    fn bounds_are_centered() {
        let s = Sprite::sized(20.0, 10.0);
        let b = s.bounds_at(Vec2::new(100.0, 50.0));
        assert_eq!(b, Rect::new(90.0, 45.0, 20.0, 10.0));
    }

    #[test]
    fn explicit_layer_overrides_default() {
        assert_eq!(Sprite::default().on_layer("effects").layer_name(), "effects");
    }
}
