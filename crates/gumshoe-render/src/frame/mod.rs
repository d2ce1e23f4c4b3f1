//! Frame coordination.
//!
//! The [`FrameCoordinator`] owns the destination [`Canvas`], the camera and
//! the layer manager and drives one frame at a time: clear, let rendering
//! systems redraw dirty layers, composite, record timing.
//!
//! Platform resize events reach it through the event bus
//! ([`forward_window_event`]), never directly.

mod canvas;
mod coordinator;
mod resize;

pub use canvas::{Canvas, OffscreenCanvas};
pub use coordinator::{DrawScope, FrameCoordinator, FrameStats};
pub use resize::{forward_window_event, translate_resize};
