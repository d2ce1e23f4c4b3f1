//! In-process notifications.
//!
//! A minimal single-threaded event bus. Subscribers get an explicit
//! [`Subscription`] handle; dropping or unsubscribing it removes the handler,
//! so nothing leaks past the owner's lifetime.

mod bus;

pub use bus::{EventBus, EventData, Subscription};

pub const COMPONENT_ADDED: &str = "component-added";
pub const COMPONENT_REMOVED: &str = "component-removed";
pub const CAMERA_MOVED: &str = "camera-moved";
pub const WINDOW_RESIZED: &str = "window-resized";
pub const CANVAS_RESIZED: &str = "canvas-resized";
