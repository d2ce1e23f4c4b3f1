//! Time subsystem.
//!
//! Frame timing is measured through the injectable [`Clock`] trait so the
//! coordinator and render pass can be tested without wall-clock flakiness.
//! Intended usage:
//! - production code uses `MonotonicClock`
//! - tests drive a shared `ManualClock`
//! - the outer loop derives per-tick delta time from a `FrameClock`

mod clock;
mod frame_clock;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use frame_clock::{FrameClock, FrameTime};
