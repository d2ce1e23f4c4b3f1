//! Offscreen layers and their compositor.
//!
//! Each layer owns one [`Surface`](crate::surface::Surface). Rendering systems
//! redraw only dirty layers; the [`LayerManager`] then blits every visible
//! layer onto the destination in z order. Skipping clean layers is what keeps
//! per-frame draw work low.

mod defaults;
mod manager;
mod offscreen;

pub use defaults::{DEFAULT_LAYERS, LayerDef, default_layer_defs};
pub use manager::LayerManager;
pub use offscreen::{Layer, LayerView};
