//! Gumshoe 2D render pipeline.
//!
//! Layered software rendering for a top-down 2D game:
//! - [`camera`]: view position, zoom, follow and screen shake
//! - [`layer`]: named offscreen surfaces composited in z order
//! - [`render`]: culls and draws sprite components into dirty layers
//! - [`frame`]: owns the destination canvas and runs the per-frame sequence
//!
//! Entity data lives outside the pipeline; the render pass reads it through
//! [`ecs::ComponentSource`] and hears about changes over the [`events`] bus.

pub mod camera;
pub mod config;
pub mod coords;
pub mod ecs;
pub mod error;
pub mod events;
pub mod frame;
pub mod layer;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod surface;
pub mod time;

pub use camera::{Camera, PositionSource};
pub use config::RendererConfig;
pub use error::RenderError;
pub use events::{EventBus, EventData, Subscription};
pub use frame::{Canvas, DrawScope, FrameCoordinator, FrameStats, OffscreenCanvas};
pub use layer::{Layer, LayerManager};
pub use paint::Color;
pub use render::{RenderMetrics, RenderPass};
