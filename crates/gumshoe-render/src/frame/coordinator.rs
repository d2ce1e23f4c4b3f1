use std::cell::Cell;
use std::rc::Rc;

use crate::camera::{Camera, PositionSource};
use crate::config::RendererConfig;
use crate::coords::Vec2;
use crate::error::RenderError;
use crate::events::{self, EventBus, EventData, Subscription};
use crate::layer::LayerManager;
use crate::paint::Color;
use crate::surface::DrawContext;
use crate::time::{Clock, MonotonicClock};

use super::{Canvas, OffscreenCanvas};

/// Timing of the last completed frame, in milliseconds.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub frame_time_ms: f64,
    pub render_time_ms: f64,
}

/// Everything a frame's draw callback may touch.
pub struct DrawScope<'s, S: ?Sized> {
    pub layers: &'s mut LayerManager,
    /// Destination canvas context. Layers composite onto it after the callback.
    pub ctx: &'s mut dyn DrawContext,
    pub camera: &'s mut Camera,
    pub scene: &'s S,
}

/// Owns the destination canvas, the camera and the layer manager, and runs
/// the per-frame sequence:
///
/// `begin_frame` → clear → draw callback → composite layers → `end_frame`.
///
/// Single-threaded; a frame always runs to completion inside [`render`](Self::render).
pub struct FrameCoordinator<V: Canvas = OffscreenCanvas, C: Clock = MonotonicClock> {
    canvas: V,
    clock: C,
    camera: Camera,
    layers: LayerManager,

    clear_color: Color,
    image_smoothing: bool,
    width: u32,
    height: u32,

    frame_time: f64,
    render_time: f64,
    last_frame_start: f64,

    bus: Option<EventBus>,
    resize_pending: Rc<Cell<bool>>,
    resize_subscriptions: Vec<Subscription>,
}

impl<V: Canvas, C: Clock> std::fmt::Debug for FrameCoordinator<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCoordinator")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("camera", &self.camera)
            .field("layers", &self.layers.layer_count())
            .field("render_time", &self.render_time)
            .field("responsive", &self.is_responsive())
            .finish()
    }
}

impl<V: Canvas, C: Clock> FrameCoordinator<V, C> {
    /// Validates the canvas and configuration and builds the pipeline.
    ///
    /// Fails fast: a zero-sized canvas is [`RenderError::MissingCanvas`], a
    /// canvas without a 2D context is [`RenderError::ContextUnavailable`] and a
    /// bad config is [`RenderError::Config`].
    pub fn new(mut canvas: V, config: &RendererConfig, clock: C) -> Result<Self, RenderError> {
        let (width, height) = canvas.backing_size();
        if width == 0 || height == 0 {
            return Err(RenderError::MissingCanvas);
        }

        config.validate()?;
        let clear_color = config.parsed_clear_color()?;
        let mut layers = LayerManager::with_layers(width, height, &config.layers)?;
        layers.set_image_smoothing(config.image_smoothing);

        let Some(ctx) = canvas.context_2d() else {
            return Err(RenderError::ContextUnavailable);
        };
        ctx.set_image_smoothing(config.image_smoothing);

        log::info!(
            "frame coordinator ready: {width}x{height}, {} layers, clear {}",
            layers.layer_count(),
            clear_color.to_hex()
        );

        Ok(Self {
            canvas,
            clock,
            camera: Camera::new(0.0, 0.0, width as f32, height as f32),
            layers,
            clear_color,
            image_smoothing: config.image_smoothing,
            width,
            height,
            frame_time: 0.0,
            render_time: 0.0,
            last_frame_start: 0.0,
            bus: None,
            resize_pending: Rc::default(),
            resize_subscriptions: Vec::new(),
        })
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    #[inline]
    pub fn layers_mut(&mut self) -> &mut LayerManager {
        &mut self.layers
    }

    #[inline]
    pub fn canvas(&self) -> &V {
        &self.canvas
    }

    /// Direct canvas access. Call [`handle_resize`](Self::handle_resize)
    /// after changing its size.
    #[inline]
    pub fn canvas_mut(&mut self) -> &mut V {
        &mut self.canvas
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn render_time(&self) -> f64 {
        self.render_time
    }

    #[inline]
    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    #[inline]
    pub fn last_frame_start(&self) -> f64 {
        self.last_frame_start
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    #[inline]
    pub fn image_smoothing(&self) -> bool {
        self.image_smoothing
    }

    pub fn set_image_smoothing(&mut self, enabled: bool) {
        self.image_smoothing = enabled;
        self.layers.set_image_smoothing(enabled);
        if let Some(ctx) = self.canvas.context_2d() {
            ctx.set_image_smoothing(enabled);
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Applies a pending responsive resize, then records the frame start.
    pub fn begin_frame(&mut self) -> f64 {
        if self.resize_pending.take() {
            self.handle_resize();
        }
        self.last_frame_start = self.clock.now_ms();
        self.last_frame_start
    }

    /// Fills the destination with the clear color.
    pub fn clear(&mut self) {
        if let Some(ctx) = self.canvas.context_2d() {
            ctx.fill(self.clear_color);
        }
    }

    /// Records timing for the frame started by [`begin_frame`](Self::begin_frame).
    pub fn end_frame(&mut self) -> FrameStats {
        self.render_time = self.clock.now_ms() - self.last_frame_start;
        self.frame_time = self.render_time;
        FrameStats {
            frame_time_ms: self.frame_time,
            render_time_ms: self.render_time,
        }
    }

    /// Runs one full frame.
    ///
    /// `draw` typically redraws dirty layers (render pass, tiles); the layers
    /// are composited onto the canvas after it returns.
    pub fn render<S, F>(&mut self, scene: &S, draw: F) -> Result<FrameStats, RenderError>
    where
        S: ?Sized,
        F: FnOnce(DrawScope<'_, S>),
    {
        self.begin_frame();

        let Some(ctx) = self.canvas.context_2d() else {
            return Err(RenderError::ContextUnavailable);
        };
        ctx.fill(self.clear_color);

        draw(DrawScope {
            layers: &mut self.layers,
            ctx: &mut *ctx,
            camera: &mut self.camera,
            scene,
        });

        self.layers.composite(ctx);
        Ok(self.end_frame())
    }

    // ── camera ────────────────────────────────────────────────────────────

    /// Bus used to announce `camera-moved`.
    pub fn attach_events(&mut self, bus: EventBus) {
        self.bus = Some(bus);
    }

    /// Advances the camera one tick and announces movement on the attached bus.
    ///
    /// Returns whether the view changed.
    pub fn update_camera<P>(&mut self, delta_time: f32, source: &P) -> bool
    where
        P: PositionSource + ?Sized,
    {
        self.camera.update(delta_time, source);
        let moved = self.camera.take_moved();
        if moved {
            if let Some(bus) = &self.bus {
                bus.emit(events::CAMERA_MOVED, EventData::None);
            }
        }
        moved
    }

    #[inline]
    pub fn world_to_screen(&self, x: f32, y: f32) -> Vec2 {
        self.camera.world_to_screen(x, y)
    }

    #[inline]
    pub fn screen_to_world(&self, x: f32, y: f32) -> Vec2 {
        self.camera.screen_to_world(x, y)
    }

    #[inline]
    pub fn is_visible(&self, x: f32, y: f32, margin: f32) -> bool {
        self.camera.contains(x, y, margin)
    }

    #[inline]
    pub fn is_rect_visible(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.camera.contains_rect(x, y, width, height)
    }

    // ── resize ────────────────────────────────────────────────────────────

    /// Matches the backing store to the canvas client size and propagates
    /// the new size to the camera viewport and every layer.
    ///
    /// A zero client size (minimized window) is ignored.
    pub fn handle_resize(&mut self) {
        let (cw, ch) = self.canvas.client_size();
        if cw == 0 || ch == 0 {
            log::debug!("ignoring resize to {cw}x{ch}");
            return;
        }

        self.canvas.set_backing_size(cw, ch);
        let (width, height) = self.canvas.backing_size();
        self.width = width;
        self.height = height;

        if let Some(ctx) = self.canvas.context_2d() {
            ctx.set_image_smoothing(self.image_smoothing);
        }
        self.camera.set_viewport(width as f32, height as f32);
        self.layers.resize(width, height);
        log::debug!("canvas resized to {width}x{height}");
    }

    /// Resizes on `window-resized` and `canvas-resized`. The resize itself
    /// happens at the next `begin_frame`.
    pub fn enable_responsive(&mut self, bus: &EventBus) {
        self.resize_subscriptions.clear();
        for event in [events::WINDOW_RESIZED, events::CANVAS_RESIZED] {
            let pending = Rc::clone(&self.resize_pending);
            self.resize_subscriptions.push(bus.on(event, move |_| pending.set(true)));
        }
    }

    #[inline]
    pub fn is_responsive(&self) -> bool {
        !self.resize_subscriptions.is_empty()
    }

    /// Drops the responsive-resize subscriptions.
    pub fn cleanup(&mut self) {
        self.resize_subscriptions.clear();
        self.resize_pending.set(false);
    }
}
