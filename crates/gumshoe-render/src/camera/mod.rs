//! Viewport camera.
//!
//! Owns the world-space view position, zoom and screen-shake perturbation and
//! converts between world and screen coordinates. The camera never owns entity
//! data: a follow target is only a key resolved through a [`PositionSource`].

mod viewport_camera;
mod source;

pub use viewport_camera::{Camera, DEFAULT_FOLLOW_SPEED, DEFAULT_SHAKE_DECAY, SHAKE_THRESHOLD, ZOOM_MAX, ZOOM_MIN};
pub use source::PositionSource;
