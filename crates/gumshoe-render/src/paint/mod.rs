//! Paint model shared by the rasterizer, sprites and the frame coordinator.
//!
//! Colors are premultiplied; surfaces store premultiplied RGBA8.

pub mod color;

pub use color::{Color, ColorParseError};
