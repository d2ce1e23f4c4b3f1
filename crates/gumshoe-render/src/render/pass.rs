use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::camera::Camera;
use crate::coords::Rect;
use crate::ecs::{ComponentSource, EntityId, Sprite, Transform};
use crate::events::{self, EventBus, Subscription};
use crate::layer::LayerManager;
use crate::scene::{SortKey, ZIndex, sort_in_paint_order};
use crate::surface::{DrawContext, ImageHandle};
use crate::time::{Clock, MonotonicClock};

/// Render after every logic system.
pub const RENDER_PRIORITY: i32 = 100;

/// World units added around the camera footprint before culling.
pub const DEFAULT_CULL_MARGIN: f32 = 100.0;

/// Layers redrawn when components are added or removed.
const ENTITY_LAYERS: [&str; 2] = ["entities", "effects"];
/// Layer redrawn when the camera moves.
const CAMERA_LAYER: &str = "tiles";

/// Counters from the most recent `update`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RenderMetrics {
    pub render_time_ms: f64,
    pub rendered_count: usize,
    pub culled_count: usize,
}

/// Layer names waiting to be marked dirty.
type Inbox = Rc<RefCell<BTreeSet<&'static str>>>;

/// One culled-in sprite, borrowed from the component store for this frame only.
struct Drawable<'a> {
    key: SortKey,
    transform: &'a Transform,
    sprite: &'a Sprite,
}

struct Bucket<'a> {
    layer: &'a str,
    items: Vec<Drawable<'a>>,
}

/// Draws `Transform` + `Sprite` entities into their layers.
///
/// Per update: cull against the camera footprint (plus margin), bucket by
/// target layer, and redraw only buckets whose layer is dirty, back to front.
/// Clean layers keep their pixels, which is where most of the saved draw work
/// comes from.
///
/// Dirtiness comes from outside: component and camera notifications are
/// queued by the subscriptions made in [`RenderPass::init`] and applied to the
/// layer manager at the start of the next update.
pub struct RenderPass<C: Clock = MonotonicClock> {
    clock: C,
    enabled: bool,
    cull_margin: f32,
    metrics: RenderMetrics,

    inbox: Inbox,
    subscriptions: Vec<Subscription>,
}

impl<C: Clock> std::fmt::Debug for RenderPass<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPass")
            .field("enabled", &self.enabled)
            .field("cull_margin", &self.cull_margin)
            .field("metrics", &self.metrics)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl Default for RenderPass<MonotonicClock> {
    fn default() -> Self {
        Self::new(MonotonicClock::new())
    }
}

impl<C: Clock> RenderPass<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            enabled: true,
            cull_margin: DEFAULT_CULL_MARGIN,
            metrics: RenderMetrics::default(),
            inbox: Rc::default(),
            subscriptions: Vec::new(),
        }
    }

    pub fn with_cull_margin(mut self, margin: f32) -> Self {
        if margin.is_finite() {
            self.cull_margin = margin.max(0.0);
        }
        self
    }

    #[inline]
    pub fn cull_margin(&self) -> f32 {
        self.cull_margin
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        RENDER_PRIORITY
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Subscribes to the dirtying notifications. Calling it again replaces
    /// the previous subscriptions.
    pub fn init(&mut self, bus: &EventBus) {
        self.subscriptions.clear();

        for event in [events::COMPONENT_ADDED, events::COMPONENT_REMOVED] {
            let inbox = Rc::clone(&self.inbox);
            self.subscriptions.push(bus.on(event, move |_| {
                inbox.borrow_mut().extend(ENTITY_LAYERS);
            }));
        }

        let inbox = Rc::clone(&self.inbox);
        self.subscriptions.push(bus.on(events::CAMERA_MOVED, move |_| {
            inbox.borrow_mut().insert(CAMERA_LAYER);
        }));
    }

    /// Releases every subscription.
    pub fn cleanup(&mut self) {
        self.subscriptions.clear();
        self.inbox.borrow_mut().clear();
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[inline]
    pub fn metrics(&self) -> RenderMetrics {
        self.metrics
    }

    /// Marks every layer named by queued notifications dirty.
    ///
    /// `update` does this first; call it directly when other layer drawing
    /// (tiles, backgrounds) must see this frame's dirtiness before the pass runs.
    pub fn apply_notifications(&self, layers: &mut LayerManager) {
        let pending = std::mem::take(&mut *self.inbox.borrow_mut());
        for name in pending {
            layers.mark_layer_dirty(name);
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Culls, buckets, sorts and draws `entities` into their layers.
    ///
    /// Components are read fresh from `store`; nothing is retained past the call.
    /// Only `entities` and `effects` are cleared when left without sprites; other
    /// sprite layers keep their old pixels until the caller clears them.
    pub fn update<S>(
        &mut self,
        delta_time: f32,
        entities: &[EntityId],
        store: &S,
        camera: &Camera,
        layers: &mut LayerManager,
    ) where
        S: ComponentSource + ?Sized,
    {
        let _ = delta_time;

        if !self.enabled {
            self.metrics = RenderMetrics::default();
            return;
        }

        let start = self.clock.now_ms();
        self.apply_notifications(layers);

        let mut rendered = 0;
        let mut culled = 0;
        let footprint = camera.bounds().expanded(self.cull_margin);
        let mut buckets: Vec<Bucket<'_>> = Vec::new();

        for (order, &id) in entities.iter().enumerate() {
            let (Some(transform), Some(sprite)) =
                (store.get_component::<Transform>(id), store.get_component::<Sprite>(id))
            else {
                continue;
            };
            if !sprite.visible {
                continue;
            }
            if !footprint.overlaps(sprite.bounds_at(transform.position())) {
                culled += 1;
                continue;
            }

            let drawable = Drawable {
                key: SortKey::new(ZIndex(sprite.z_index), order as u32),
                transform,
                sprite,
            };
            let name = sprite.layer_name();
            match buckets.iter_mut().find(|b| b.layer == name) {
                Some(bucket) => bucket.items.push(drawable),
                None => buckets.push(Bucket { layer: name, items: vec![drawable] }),
            }
        }

        // A removal can leave an entity layer dirty with nothing left to draw.
        for name in ENTITY_LAYERS {
            if let Some(layer) = layers.layer_mut(name).filter(|l| l.is_dirty()) {
                layer.clear();
            }
        }

        for mut bucket in buckets {
            let Some(layer) = layers.layer_mut(bucket.layer) else {
                log::debug!("no layer {:?}; dropped {} sprite(s)", bucket.layer, bucket.items.len());
                continue;
            };
            if !layer.is_dirty() {
                continue;
            }

            sort_in_paint_order(&mut bucket.items, |d| d.key);
            let surface = layer.surface_mut();
            surface.clear();
            for d in &bucket.items {
                draw_sprite(surface, camera, d.transform, d.sprite);
                rendered += 1;
            }
        }

        layers.mark_all_layers_clean();

        self.metrics = RenderMetrics {
            render_time_ms: self.clock.now_ms() - start,
            rendered_count: rendered,
            culled_count: culled,
        };
    }
}

/// Draws one sprite centered on its screen-space position.
///
/// Falls back to a `color` rectangle while the image is absent or pending.
/// Global alpha is 1.0 and the transform is unchanged on return.
pub fn draw_sprite<D>(ctx: &mut D, camera: &Camera, transform: &Transform, sprite: &Sprite)
where
    D: DrawContext + ?Sized,
{
    let screen = camera.world_to_screen(transform.x, transform.y);

    ctx.set_global_alpha(sprite.alpha);
    ctx.save();
    ctx.translate(screen.x, screen.y);
    if transform.rotation != 0.0 {
        ctx.rotate(transform.rotation);
    }
    if transform.is_scaled() {
        ctx.scale(transform.scale_x, transform.scale_y);
    }

    let dest = Rect::new(-sprite.width / 2.0, -sprite.height / 2.0, sprite.width, sprite.height);
    match sprite.image.as_ref().and_then(ImageHandle::get) {
        Some(image) => ctx.draw_image(image, sprite.source, dest),
        None => {
            ctx.set_fill_color(sprite.color);
            ctx.fill_rect(dest);
        }
    }

    ctx.restore();
    ctx.set_global_alpha(1.0);
}
