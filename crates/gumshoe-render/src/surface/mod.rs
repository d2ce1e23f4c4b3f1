//! Software drawing surfaces.
//!
//! Responsibilities:
//! - own pixel storage for layers and the destination canvas (premultiplied RGBA8)
//! - expose a canvas-like immediate-mode API through [`DrawContext`]
//! - rasterize rects, images and whole surfaces under affine transforms
//!
//! Nothing here knows about layers, cameras or entities.

mod context;
mod image_handle;
mod raster;
mod pixmap;

pub use context::DrawContext;
pub use image_handle::ImageHandle;
pub use pixmap::Surface;
