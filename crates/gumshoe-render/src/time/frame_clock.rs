use super::Clock;

/// Per-tick timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Clock reading taken at the tick, in milliseconds.
    pub now_ms: f64,

    /// Monotonic tick counter.
    pub frame_index: u64,
}

/// Derives clamped delta time from a [`Clock`].
///
/// Delta time is clamped to avoid pathological values when the process is paused
/// by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock<C: Clock> {
    clock: C,
    last_ms: f64,
    frame_index: u64,
    dt_min: f32,
    dt_max: f32,
}

impl<C: Clock> FrameClock<C> {
    /// Creates a clock with default clamps (0.1 ms .. 250 ms).
    pub fn new(clock: C) -> Self {
        Self::with_clamps(clock, 0.0001, 0.25)
    }

    /// Creates a clock with custom delta-time clamps, in seconds.
    pub fn with_clamps(clock: C, dt_min: f32, dt_max: f32) -> Self {
        debug_assert!(dt_min <= dt_max);
        let last_ms = clock.now_ms();
        Self {
            clock,
            last_ms,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline, e.g. after a resize stall.
    pub fn reset(&mut self) {
        self.last_ms = self.clock.now_ms();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now_ms = self.clock.now_ms();
        let dt = (((now_ms - self.last_ms) / 1000.0) as f32).clamp(self.dt_min, self.dt_max);
        self.last_ms = now_ms;

        let ft = FrameTime {
            dt,
            now_ms,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}
