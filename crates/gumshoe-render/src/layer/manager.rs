use crate::error::RenderError;
use crate::scene::{ZIndex, sort_in_paint_order};
use crate::surface::{DrawContext, Surface};

use super::{Layer, LayerDef, LayerView, default_layer_defs};

/// Owns the named layers and composites them in z order.
///
/// Layers live in an arena keyed by name; at most one layer exists per name.
/// Insertion order is irrelevant for compositing, which always follows
/// `(z_index, creation order)`.
#[derive(Debug)]
pub struct LayerManager {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    next_seq: u32,
    image_smoothing: bool,
}

impl LayerManager {
    /// Creates the manager with the seven standard layers.
    pub fn new(width: u32, height: u32) -> Self {
        let mut manager = Self::empty(width, height);
        for def in default_layer_defs() {
            manager.push(def.name, ZIndex(def.z_index));
        }
        manager
    }

    /// Creates the manager with a custom initial layer set.
    pub fn with_layers(width: u32, height: u32, defs: &[LayerDef]) -> Result<Self, RenderError> {
        let mut manager = Self::empty(width, height);
        for def in defs {
            manager.add_layer(&def.name, def.z_index)?;
        }
        Ok(manager)
    }

    fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
            next_seq: 0,
            image_smoothing: false,
        }
    }

    fn push(&mut self, name: String, z_index: ZIndex) -> &mut Layer {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.layers.push(Layer::new(name, z_index, seq, self.width, self.height, self.image_smoothing));
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name() == name)
    }

    // ── dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resizes every layer. Content is lost, so every layer becomes dirty.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        for layer in &mut self.layers {
            layer.resize(width, height);
        }
        log::debug!("layers resized to {width}x{height}");
    }

    // ── lookup and lifecycle ──────────────────────────────────────────────

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name() == name)
    }

    /// Adds a layer sized to the manager.
    ///
    /// Fails with [`RenderError::DuplicateLayer`] if the name is taken.
    pub fn add_layer(&mut self, name: &str, z_index: i32) -> Result<&mut Layer, RenderError> {
        if self.index_of(name).is_some() {
            return Err(RenderError::DuplicateLayer { name: name.to_string() });
        }
        Ok(self.push(name.to_string(), ZIndex(z_index)))
    }

    pub fn remove_layer(&mut self, name: &str) -> bool {
        match self.index_of(name) {
            Some(i) => {
                self.layers.remove(i);
                true
            }
            None => false,
        }
    }

    // ── dirtiness ─────────────────────────────────────────────────────────

    /// No-op for unknown names.
    pub fn mark_layer_dirty(&mut self, name: &str) {
        if let Some(layer) = self.layer_mut(name) {
            layer.mark_dirty();
        }
    }

    pub fn mark_all_layers_dirty(&mut self) {
        self.layers.iter_mut().for_each(Layer::mark_dirty);
    }

    pub fn mark_all_layers_clean(&mut self) {
        self.layers.iter_mut().for_each(Layer::mark_clean);
    }

    pub fn clear_layer(&mut self, name: &str) {
        if let Some(layer) = self.layer_mut(name) {
            layer.clear();
        }
    }

    pub fn clear_all_layers(&mut self) {
        self.layers.iter_mut().for_each(Layer::clear);
    }

    // ── appearance ────────────────────────────────────────────────────────

    pub fn set_layer_visible(&mut self, name: &str, visible: bool) {
        if let Some(layer) = self.layer_mut(name) {
            layer.set_visible(visible);
        }
    }

    pub fn set_layer_opacity(&mut self, name: &str, opacity: f32) {
        if let Some(layer) = self.layer_mut(name) {
            layer.set_opacity(opacity);
        }
    }

    #[inline]
    pub fn image_smoothing(&self) -> bool {
        self.image_smoothing
    }

    /// Applies to every current and future layer surface.
    pub fn set_image_smoothing(&mut self, enabled: bool) {
        self.image_smoothing = enabled;
        for layer in &mut self.layers {
            layer.set_image_smoothing(enabled);
        }
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Runs `draw` against a layer's surface.
    ///
    /// Skipped (returns `false`) when the layer is missing or hidden. A dirty
    /// layer is cleared first; the layer is clean afterwards.
    pub fn render_to_layer<F>(&mut self, name: &str, draw: F) -> bool
    where
        F: FnOnce(&mut Surface, LayerView),
    {
        let Some(layer) = self.layer_mut(name) else {
            return false;
        };
        if !layer.is_visible() {
            return false;
        }

        if layer.is_dirty() {
            layer.clear();
        }
        let view = layer.view();
        draw(layer.surface_mut(), view);
        layer.mark_clean();
        true
    }

    /// Blits every visible layer onto `dst` in ascending z order.
    ///
    /// Each layer is drawn at `(0, 0)` under its opacity; global alpha is
    /// reset to 1.0 after every layer.
    pub fn composite<C>(&self, dst: &mut C)
    where
        C: DrawContext + ?Sized,
    {
        for layer in self.sorted_layers() {
            if !layer.is_visible() {
                continue;
            }
            dst.set_global_alpha(layer.opacity());
            dst.draw_surface(layer.surface(), 0.0, 0.0);
            dst.set_global_alpha(1.0);
        }
    }

    // ── introspection ─────────────────────────────────────────────────────

    pub fn sorted_layers(&self) -> Vec<&Layer> {
        let mut sorted: Vec<&Layer> = self.layers.iter().collect();
        sort_in_paint_order(&mut sorted, |l| l.sort_key());
        sorted
    }

    /// Names in creation order.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(Layer::name).collect()
    }

    pub fn dirty_layer_count(&self) -> usize {
        self.layers.iter().filter(|l| l.is_dirty()).count()
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;
    use image::RgbaImage;

    /// Records blits as `(global_alpha at draw time, surface width)`.
    #[derive(Default)]
    struct Recorder {
        alpha: f32,
        blits: Vec<(f32, u32)>,
    }

    impl DrawContext for Recorder {
        fn width(&self) -> u32 {
            0
        }
        fn height(&self) -> u32 {
            0
        }
        fn save(&mut self) {}
        fn restore(&mut self) {}
        fn translate(&mut self, _x: f32, _y: f32) {}
        fn rotate(&mut self, _radians: f32) {}
        fn scale(&mut self, _sx: f32, _sy: f32) {}
        fn global_alpha(&self) -> f32 {
            self.alpha
        }
        fn set_global_alpha(&mut self, alpha: f32) {
            self.alpha = alpha;
        }
        fn image_smoothing(&self) -> bool {
            false
        }
        fn set_image_smoothing(&mut self, _enabled: bool) {}
        fn set_fill_color(&mut self, _color: Color) {}
        fn fill_rect(&mut self, _rect: Rect) {}
        fn draw_image(&mut self, _image: &RgbaImage, _src: Option<Rect>, _dest: Rect) {}
        fn draw_surface(&mut self, surface: &Surface, _x: f32, _y: f32) {
            self.blits.push((self.alpha, surface.width()));
        }
        fn clear(&mut self) {}
        fn fill(&mut self, _color: Color) {}
    }

    fn bare(width: u32, height: u32) -> LayerManager {
        LayerManager::with_layers(width, height, &[]).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn default_set_has_seven_named_layers() {
        let m = LayerManager::new(64, 32);
        assert_eq!(m.layer_count(), 7);
        assert_eq!(
            m.layer_names(),
            ["background", "ground", "tiles", "environment", "entities", "effects", "ui"]
        );
        assert_eq!(m.layer("entities").map(|l| l.z_index()), Some(ZIndex(4)));
        assert_eq!(m.layer("ui").map(|l| (l.width(), l.height())), Some((64, 32)));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut m = LayerManager::new(8, 8);
        let err = m.add_layer("tiles", 9).unwrap_err();
        assert_eq!(err, RenderError::DuplicateLayer { name: "tiles".into() });
        assert_eq!(m.layer_count(), 7);

        let defs = [LayerDef::new("a", 0), LayerDef::new("a", 1)];
        assert!(LayerManager::with_layers(8, 8, &defs).is_err());
    }

    #[test]
    fn add_and_remove() {
        let mut m = LayerManager::new(10, 10);
        let layer = m.add_layer("minimap", 7).unwrap();
        assert_eq!((layer.width(), layer.height()), (10, 10));
        assert!(m.layer("minimap").is_some());

        assert!(m.remove_layer("minimap"));
        assert!(!m.remove_layer("minimap"));
        assert!(m.layer("minimap").is_none());
    }

    #[test]
    fn unknown_names_are_noops() {
        let mut m = LayerManager::new(4, 4);
        m.mark_all_layers_dirty();
        m.mark_layer_dirty("nope");
        m.clear_layer("nope");
        m.set_layer_opacity("nope", 0.5);
        assert_eq!(m.dirty_layer_count(), 7);
    }

    #[test]
    fn clear_all_layers_erases_pixels_but_keeps_dirty_flags() {
        let mut m = LayerManager::new(4, 4);
        assert!(m.render_to_layer("tiles", |s, _| s.fill(Color::WHITE)));
        assert!(m.render_to_layer("ui", |s, _| s.fill(Color::WHITE)));
        m.mark_layer_dirty("ui");

        m.clear_all_layers();

        for name in ["tiles", "ui"] {
            let layer = m.layer(name).unwrap();
            assert_eq!(layer.surface().pixel(1, 1), Some(Color::TRANSPARENT));
        }
        assert!(!m.layer("tiles").unwrap().is_dirty());
        assert!(m.layer("ui").unwrap().is_dirty());
    }

    // ── compositing ───────────────────────────────────────────────────────

    #[test]
    fn composites_in_ascending_z_regardless_of_insertion() {
        let mut m = bare(4, 4);
        for (name, z, opacity) in [("c", 30, 0.3), ("a", 10, 0.1), ("d", 40, 0.4), ("b", 20, 0.2)] {
            m.add_layer(name, z).unwrap().set_opacity(opacity);
        }

        let mut rec = Recorder { alpha: 1.0, ..Recorder::default() };
        m.composite(&mut rec);

        let order: Vec<f32> = rec.blits.iter().map(|(a, _)| *a).collect();
        assert_eq!(order, [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(rec.global_alpha(), 1.0);
    }

    #[test]
    fn equal_z_keeps_creation_order() {
        let mut m = bare(4, 4);
        m.add_layer("first", 1).unwrap().set_opacity(0.25);
        m.add_layer("second", 1).unwrap().set_opacity(0.75);
        m.add_layer("under", 0).unwrap().set_opacity(0.5);

        let mut rec = Recorder::default();
        m.composite(&mut rec);
        let order: Vec<f32> = rec.blits.iter().map(|(a, _)| *a).collect();
        assert_eq!(order, [0.5, 0.25, 0.75]);
    }

    #[test]
    fn hidden_layers_issue_no_draws() {
        let mut m = LayerManager::new(4, 4);
        m.set_layer_visible("ui", false);
        m.set_layer_visible("tiles", false);

        let mut rec = Recorder::default();
        m.composite(&mut rec);
        assert_eq!(rec.blits.len(), 5);
        assert_eq!(rec.global_alpha(), 1.0);
    }

    #[test]
    fn composite_onto_surface_applies_opacity() {
        let mut m = bare(2, 2);
        let layer = m.add_layer("only", 0).unwrap();
        layer.surface_mut().fill(Color::WHITE);
        layer.set_opacity(0.5);

        let mut dst = Surface::new(2, 2);
        dst.fill(Color::BLACK);
        m.composite(&mut dst);
        assert_eq!(dst.pixel(1, 1).unwrap().to_premul_u8(), [128, 128, 128, 255]);
        assert_eq!(dst.global_alpha(), 1.0);
    }

    // ── render_to_layer ───────────────────────────────────────────────────

    #[test]
    fn render_to_dirty_layer_clears_then_marks_clean() {
        let mut m = LayerManager::new(4, 4);
        m.layer_mut("tiles").unwrap().surface_mut().fill(Color::WHITE);

        let mut seen = None;
        let ran = m.render_to_layer("tiles", |surface, view| {
            seen = Some((surface.pixel(0, 0), view.name.clone(), view.z_index));
        });

        assert!(ran);
        assert_eq!(seen, Some((Some(Color::TRANSPARENT), "tiles".to_string(), ZIndex(2))));
        assert!(!m.layer("tiles").unwrap().is_dirty());
    }

    #[test]
    fn render_to_clean_layer_keeps_content() {
        let mut m = LayerManager::new(4, 4);
        m.render_to_layer("tiles", |s, _| s.fill(Color::WHITE));
        m.render_to_layer("tiles", |s, _| {
            assert_eq!(s.pixel(0, 0), Some(Color::WHITE));
        });
    }

    #[test]
    fn render_to_missing_or_hidden_layer_is_skipped() {
        let mut m = LayerManager::new(4, 4);
        assert!(!m.render_to_layer("nope", |_, _| panic!("must not run")));

        m.set_layer_visible("ui", false);
        assert!(!m.render_to_layer("ui", |_, _| panic!("must not run")));
        assert!(m.layer("ui").unwrap().is_dirty());
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_dirties_and_resizes_every_layer() {
        let mut m = LayerManager::new(4, 4);
        m.add_layer("extra", 99).unwrap();
        m.mark_all_layers_clean();
        assert_eq!(m.dirty_layer_count(), 0);

        m.resize(20, 10);
        assert_eq!((m.width(), m.height()), (20, 10));
        assert_eq!(m.dirty_layer_count(), m.layer_count());
        assert!(m.sorted_layers().iter().all(|l| (l.width(), l.height()) == (20, 10)));
    }

    #[test]
    fn smoothing_reaches_new_layers() {
        let mut m = LayerManager::new(2, 2);
        m.set_image_smoothing(true);
        let layer = m.add_layer("late", 1).unwrap();
        assert!(layer.surface().image_smoothing());
        assert!(m.layer("background").unwrap().surface().image_smoothing());
    }
}
