//! Minimal component store consumed by the render pass.
//!
//! The render pass only depends on [`ComponentSource`] and the two component
//! shapes [`Transform`] and [`Sprite`]; [`ComponentRegistry`] is one concrete
//! store, good enough for the sandbox and tests.

mod components;
mod entity;
mod registry;

pub use components::{Sprite, Transform};
pub use entity::EntityId;
pub use registry::{Component, ComponentRegistry, ComponentSource};
