use crate::scene::{SortKey, ZIndex};
use crate::surface::{DrawContext, Surface};

/// One named, z-ordered offscreen surface.
///
/// A layer never draws itself; callers draw into [`Layer::surface_mut`] and
/// the manager composites it. `dirty` means the pixels are stale and must be
/// redrawn before they can be trusted.
#[derive(Debug)]
pub struct Layer {
    name: String,
    z_index: ZIndex,
    seq: u32,
    surface: Surface,
    dirty: bool,
    visible: bool,
    opacity: f32,
}

/// Read-only snapshot of a layer's attributes, handed to draw callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerView {
    pub name: String,
    pub z_index: ZIndex,
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
    pub visible: bool,
}

impl Layer {
    /// New layers start dirty: they have never been drawn.
    pub(crate) fn new(name: String, z_index: ZIndex, seq: u32, width: u32, height: u32, smoothing: bool) -> Self {
        let mut surface = Surface::new(width, height);
        surface.set_image_smoothing(smoothing);
        Self {
            name,
            z_index,
            seq,
            surface,
            dirty: true,
            visible: true,
            opacity: 1.0,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn z_index(&self) -> ZIndex {
        self.z_index
    }

    /// Composite order: z-index, then creation order.
    #[inline]
    pub fn sort_key(&self) -> SortKey {
        SortKey::new(self.z_index, self.seq)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn view(&self) -> LayerView {
        LayerView {
            name: self.name.clone(),
            z_index: self.z_index,
            width: self.width(),
            height: self.height(),
            opacity: self.opacity,
            visible: self.visible,
        }
    }

    /// Wipes the surface to transparent. The dirty flag is left alone.
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Clamped to `[0, 1]`; NaN is ignored.
    pub fn set_opacity(&mut self, opacity: f32) {
        if !opacity.is_nan() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Reallocates the surface (content is lost) and marks the layer dirty.
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        let smoothing = self.surface.image_smoothing();
        self.surface.resize(width, height);
        self.surface.set_image_smoothing(smoothing);
        self.dirty = true;
    }

    pub(crate) fn set_image_smoothing(&mut self, enabled: bool) {
        self.surface.set_image_smoothing(enabled);
    }
}
