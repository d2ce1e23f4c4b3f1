//! Per-frame sprite rendering.
//!
//! The [`RenderPass`] turns `Transform` + `Sprite` component data into pixels
//! on layer surfaces. Conventions:
//! - entity positions are world space; the camera maps them to layer pixels
//! - a layer is only redrawn while dirty
//! - draw order within a layer is `(sprite z-index, traversal order)`
//!
//! [`DirtyRectTracker`] is a finer-grained helper for callers that redraw
//! sub-regions instead of whole layers.

mod dirty_rect;
mod pass;

pub use dirty_rect::{DEFAULT_MERGE_THRESHOLD, DirtyRectTracker, MAX_DIRTY_RECTS};
pub use pass::{DEFAULT_CULL_MARGIN, RENDER_PRIORITY, RenderMetrics, RenderPass, draw_sprite};
