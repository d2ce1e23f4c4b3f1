//! Headless sandbox.
//!
//! Drives the render pipeline for a fixed number of ticks against an
//! offscreen canvas and writes the last composited frame to a PNG.
//!
//! Usage: `gumshoe-sandbox [OUTPUT.png] [CONFIG.toml]`

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};

use gumshoe_render::camera::Camera;
use gumshoe_render::coords::Rect;
use gumshoe_render::ecs::{ComponentRegistry, EntityId, Sprite, Transform};
use gumshoe_render::layer::LayerView;
use gumshoe_render::logging::{LoggingConfig, init_logging};
use gumshoe_render::surface::{DrawContext, ImageHandle, Surface};
use gumshoe_render::time::{FrameClock, ManualClock, MonotonicClock};
use gumshoe_render::{Color, EventBus, FrameCoordinator, OffscreenCanvas, RenderPass, RendererConfig};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 360;
const TICKS: u64 = 180;
const TICK_MS: f64 = 1000.0 / 60.0;
const TILE: f32 = 32.0;
const SHAKE_AT: u64 = 90;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "gumshoe-frame.png".to_string());
    let config = match args.next() {
        Some(path) => RendererConfig::load(&path)?,
        None => RendererConfig::default(),
    };
    init_logging(LoggingConfig::from(&config));

    let bus = EventBus::new();
    let mut world = ComponentRegistry::with_events(bus.clone());

    let mut coordinator = FrameCoordinator::new(OffscreenCanvas::new(WIDTH, HEIGHT), &config, MonotonicClock::new())
        .context("failed to create frame coordinator")?;
    coordinator.attach_events(bus.clone());
    coordinator.enable_responsive(&bus);

    let mut pass = RenderPass::new(MonotonicClock::new()).with_cull_margin(config.cull_margin);
    pass.init(&bus);

    let (player, shadow) = spawn_scene(&mut world);
    coordinator.camera_mut().follow(player, 0.15, 0.0, 0.0);

    // Simulated time keeps the output identical between runs.
    let sim_clock = ManualClock::new(0.0);
    let mut frames = FrameClock::new(sim_clock.clone());

    for _ in 0..TICKS {
        sim_clock.advance(TICK_MS);
        let ft = frames.tick();
        let t = (ft.now_ms / 1000.0) as f32;

        let (x, y) = (320.0 + 240.0 * (t * 0.8).cos(), 180.0 + 140.0 * (t * 1.3).sin());
        if let Some(transform) = world.get_mut::<Transform>(player) {
            *transform = Transform { rotation: t, ..Transform::at(x, y) };
        }
        if let Some(transform) = world.get_mut::<Transform>(shadow) {
            *transform = Transform::at(x, y + 14.0);
        }
        // Moving entities does not emit component events.
        coordinator.layers_mut().mark_layer_dirty("environment");
        coordinator.layers_mut().mark_layer_dirty("entities");

        if ft.frame_index == SHAKE_AT {
            coordinator.camera_mut().shake(12.0, None);
        }
        coordinator.update_camera(ft.dt, &world);

        let entities = world.entities_with::<Sprite>();
        let stats = coordinator
            .render(&world, |scope| {
                pass.apply_notifications(scope.layers);

                if scope.layers.layer("background").is_some_and(|l| l.is_dirty()) {
                    scope.layers.render_to_layer("background", |surface, _| {
                        surface.fill(Color::from_rgba_u8(24, 26, 38, 255));
                    });
                }
                if scope.layers.layer("tiles").is_some_and(|l| l.is_dirty()) {
                    let camera = &*scope.camera;
                    scope
                        .layers
                        .render_to_layer("tiles", |surface, view| draw_tiles(surface, camera, view));
                }

                pass.update(ft.dt, &entities, scope.scene, scope.camera, scope.layers);
            })
            .context("frame failed")?;

        log::debug!(
            "tick {}: {:.3} ms, {} drawn, {} culled",
            ft.frame_index,
            stats.render_time_ms,
            pass.metrics().rendered_count,
            pass.metrics().culled_count
        );
    }

    let metrics = pass.metrics();
    log::info!(
        "{TICKS} ticks done; last frame {:.3} ms, {} sprites drawn, {} culled",
        coordinator.render_time(),
        metrics.rendered_count,
        metrics.culled_count
    );

    coordinator
        .canvas()
        .surface()
        .to_image()
        .save(&output)
        .with_context(|| format!("failed to write {output}"))?;
    log::info!("wrote {output}");

    pass.cleanup();
    coordinator.cleanup();
    Ok(())
}

/// Populates the world. Returns the player and its shadow.
fn spawn_scene(world: &mut ComponentRegistry) -> (EntityId, EntityId) {
    let crate_image = ImageHandle::ready(RgbaImage::from_fn(16, 16, |x, y| {
        if x == 0 || y == 0 || x == 15 || y == 15 || x == y || x + y == 15 {
            Rgba([92, 58, 30, 255])
        } else {
            Rgba([168, 118, 62, 255])
        }
    }));

    for i in 0..24 {
        let e = world.spawn();
        let x = (i % 6) as f32 * 150.0 + 40.0;
        let y = (i / 6) as f32 * 120.0 + 40.0;
        world.insert(e, Transform::at(x, y));
        world.insert(e, Sprite::sized(28.0, 28.0).with_image(crate_image.clone(), None));
    }

    // Far outside the view; these only ever count as culled.
    for i in 0..40 {
        let e = world.spawn();
        world.insert(e, Transform::at(2000.0 + i as f32 * 40.0, -1500.0));
        world.insert(e, Sprite::sized(8.0, 8.0).with_color(Color::WHITE).on_layer("effects"));
    }

    let shadow = world.spawn();
    world.insert(shadow, Transform::at(320.0, 180.0));
    world.insert(
        shadow,
        Sprite {
            alpha: 0.4,
            ..Sprite::sized(36.0, 12.0).with_color(Color::BLACK).on_layer("environment")
        },
    );

    let player = world.spawn();
    world.insert(player, Transform::at(320.0, 180.0));
    world.insert(
        player,
        Sprite::sized(24.0, 24.0)
            .with_color(Color::from_rgba_u8(80, 200, 255, 255))
            .with_z(10),
    );
    (player, shadow)
}

/// Checkerboard floor covering the camera footprint, in world space.
fn draw_tiles(surface: &mut Surface, camera: &Camera, view: LayerView) {
    let bounds = camera.bounds();
    let light = Color::from_rgba_u8(46, 52, 64, 255);
    let dark = Color::from_rgba_u8(38, 43, 54, 255);

    let first_col = (bounds.x() / TILE).floor() as i64;
    let first_row = (bounds.y() / TILE).floor() as i64;
    let cols = (bounds.width() / TILE).ceil() as i64 + 1;
    let rows = (bounds.height() / TILE).ceil() as i64 + 1;
    let size = TILE * camera.zoom();

    for row in first_row..first_row + rows {
        for col in first_col..first_col + cols {
            let screen = camera.world_to_screen(col as f32 * TILE, row as f32 * TILE);
            if screen.x > view.width as f32 || screen.y > view.height as f32 {
                continue;
            }
            surface.set_fill_color(if (row + col).rem_euclid(2) == 0 { light } else { dark });
            surface.fill_rect(Rect::new(screen.x, screen.y, size, size));
        }
    }
}
