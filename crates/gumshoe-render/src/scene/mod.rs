//! Draw-order primitives.
//!
//! Both compositing (layers) and the render pass (sprites within a layer)
//! order by z-index first and by traversal order second, so equal z-indices
//! never reorder between frames.

mod key;
mod z_index;

pub use key::{SortKey, sort_in_paint_order};
pub use z_index::ZIndex;
