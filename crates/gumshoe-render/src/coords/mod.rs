//! Coordinate and geometry types shared by the camera, layers and rasterizer.
//!
//! Two spaces are in play:
//! - world space: simulation units, +X right, +Y down
//! - screen space: destination pixels, origin top-left
//!
//! The camera converts between them; everything here is space-agnostic.

mod affine;
mod rect;
mod vec2;
mod viewport;

pub use affine::Affine;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
