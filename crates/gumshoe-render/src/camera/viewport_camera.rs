use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coords::{Rect, Vec2, Viewport};
use crate::ecs::EntityId;

use super::PositionSource;

pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 10.0;
pub const DEFAULT_FOLLOW_SPEED: f32 = 0.1;
pub const DEFAULT_SHAKE_DECAY: f32 = 0.9;
/// Shake at or below this intensity snaps to exactly zero.
pub const SHAKE_THRESHOLD: f32 = 0.1;

// A decay of 1.0 would never reach the threshold.
const SHAKE_DECAY_MAX: f32 = 0.999;

/// 2D viewport camera.
///
/// `position` is the world-space point shown at the top-left of the screen.
/// The visible world footprint is `[position, position + viewport / zoom]`.
///
/// Invariants:
/// - `zoom` is always within `[ZOOM_MIN, ZOOM_MAX]`
/// - `follow_speed` is always within `[0, 1]`
/// - `shake_offset` is zero whenever `shake_intensity` is zero
///
/// No method panics or errors; non-finite inputs are ignored or replaced by defaults.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec2,
    viewport: Viewport,
    zoom: f32,

    follow_target: Option<EntityId>,
    follow_speed: f32,
    follow_offset: Vec2,

    shake_intensity: f32,
    shake_decay: f32,
    shake_offset: Vec2,

    moved: bool,
    rng: StdRng,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1280.0, 720.0)
    }
}

impl Camera {
    pub fn new(x: f32, y: f32, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: finite_or(Vec2::new(x, y), Vec2::zero()),
            viewport: Viewport::new(viewport_width, viewport_height),
            zoom: 1.0,
            follow_target: None,
            follow_speed: DEFAULT_FOLLOW_SPEED,
            follow_offset: Vec2::zero(),
            shake_intensity: 0.0,
            shake_decay: DEFAULT_SHAKE_DECAY,
            shake_offset: Vec2::zero(),
            moved: false,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the shake RNG with a seeded one, making shake reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    #[inline]
    pub fn follow_target(&self) -> Option<EntityId> {
        self.follow_target
    }

    #[inline]
    pub fn follow_speed(&self) -> f32 {
        self.follow_speed
    }

    #[inline]
    pub fn follow_offset(&self) -> Vec2 {
        self.follow_offset
    }

    #[inline]
    pub fn shake_intensity(&self) -> f32 {
        self.shake_intensity
    }

    #[inline]
    pub fn shake_decay(&self) -> f32 {
        self.shake_decay
    }

    #[inline]
    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    /// Returns whether the view (position, zoom or shake offset) changed since
    /// the last call, and resets the flag.
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    // ── movement ──────────────────────────────────────────────────────────

    pub fn set_position(&mut self, x: f32, y: f32) {
        let next = finite_or(Vec2::new(x, y), self.position);
        self.relocate(next);
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        let next = finite_or(self.position + Vec2::new(dx, dy), self.position);
        self.relocate(next);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        let z = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        if z != self.zoom {
            self.zoom = z;
            self.moved = true;
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    fn relocate(&mut self, next: Vec2) {
        if next != self.position {
            self.position = next;
            self.moved = true;
        }
    }

    // ── following ─────────────────────────────────────────────────────────

    /// Starts tracking `target`. `speed` saturates into `[0, 1]`.
    pub fn follow(&mut self, target: EntityId, speed: f32, offset_x: f32, offset_y: f32) {
        self.follow_target = Some(target);
        self.follow_speed = if speed.is_nan() { DEFAULT_FOLLOW_SPEED } else { speed.clamp(0.0, 1.0) };
        self.follow_offset = finite_or(Vec2::new(offset_x, offset_y), Vec2::zero());
    }

    pub fn stop_following(&mut self) {
        self.follow_target = None;
    }

    /// Advances follow and shake by one tick.
    ///
    /// The follow lerp is per call, not normalized by `delta_time`:
    /// `position += (goal - position) * follow_speed`, so convergence speed
    /// depends on the tick rate.
    pub fn update<S>(&mut self, delta_time: f32, source: &S)
    where
        S: PositionSource + ?Sized,
    {
        let _ = delta_time;

        if let Some(target) = self.follow_target {
            if let Some(pos) = source.position_of(target).filter(|p| p.is_finite()) {
                let half = Vec2::new(self.viewport.width, self.viewport.height) / (2.0 * self.zoom);
                let goal = pos - half + self.follow_offset;
                let next = self.position.lerp(goal, self.follow_speed);
                self.relocate(next);
            }
        }

        let prev_shake = self.shake_offset;
        if self.shake_intensity > SHAKE_THRESHOLD {
            let i = self.shake_intensity;
            self.shake_offset = Vec2::new(
                (self.rng.r#gen::<f32>() - 0.5) * i,
                (self.rng.r#gen::<f32>() - 0.5) * i,
            );
            self.shake_intensity *= self.shake_decay;
        } else {
            self.shake_intensity = 0.0;
            self.shake_offset = Vec2::zero();
        }
        if self.shake_offset != prev_shake {
            self.moved = true;
        }
    }

    // ── shake ─────────────────────────────────────────────────────────────

    /// Adds shake. Stacked shakes never reduce the current intensity.
    ///
    /// `decay` overrides the per-update multiplier when given.
    pub fn shake(&mut self, intensity: f32, decay: Option<f32>) {
        if intensity.is_finite() {
            self.shake_intensity = self.shake_intensity.max(intensity.max(0.0));
        }
        if let Some(d) = decay.filter(|d| !d.is_nan()) {
            self.shake_decay = d.clamp(0.0, SHAKE_DECAY_MAX);
        }
    }

    // ── coordinate spaces ─────────────────────────────────────────────────

    #[inline]
    pub fn world_to_screen(&self, x: f32, y: f32) -> Vec2 {
        (Vec2::new(x, y) - self.position) * self.zoom + self.shake_offset
    }

    #[inline]
    pub fn screen_to_world(&self, x: f32, y: f32) -> Vec2 {
        (Vec2::new(x, y) - self.shake_offset) / self.zoom + self.position
    }

    /// World-space footprint of the viewport.
    #[inline]
    pub fn bounds(&self) -> Rect {
        let extent = self.viewport.scaled(self.zoom);
        Rect::new(self.position.x, self.position.y, extent.width, extent.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        let extent = self.viewport.scaled(self.zoom);
        self.position + Vec2::new(extent.width, extent.height) / 2.0
    }

    /// Whether a world point lies inside the footprint grown by `margin`.
    #[inline]
    pub fn contains(&self, x: f32, y: f32, margin: f32) -> bool {
        self.bounds().expanded(margin).contains(Vec2::new(x, y))
    }

    /// Whether a world rectangle overlaps the footprint (partial overlap counts).
    #[inline]
    pub fn contains_rect(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.bounds().overlaps(Rect::new(x, y, width, height))
    }
}

#[inline]
fn finite_or(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.is_finite() { v } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn camera() -> Camera {
        Camera::new(0.0, 0.0, 800.0, 600.0).with_seed(7)
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn defaults() {
        let c = camera();
        assert_eq!(c.zoom(), 1.0);
        assert_eq!(c.follow_target(), None);
        assert_eq!(c.follow_speed(), 0.1);
        assert_eq!(c.shake_intensity(), 0.0);
        assert_eq!(c.shake_decay(), 0.9);
        assert_eq!(c.shake_offset(), Vec2::zero());
    }

    // ── clamping ──────────────────────────────────────────────────────────

    #[test]
    fn zoom_is_clamped() {
        let mut c = camera();
        for z in [-5.0, 0.0, 0.05, 0.1, 1.0, 9.99, 10.0, 50.0, f32::INFINITY] {
            c.set_zoom(z);
            assert!((ZOOM_MIN..=ZOOM_MAX).contains(&c.zoom()), "zoom {z} -> {}", c.zoom());
        }
        c.set_zoom(0.05);
        assert_eq!(c.zoom(), 0.1);
        c.set_zoom(f32::NAN);
        assert_eq!(c.zoom(), 0.1);
    }

    #[test]
    fn follow_speed_is_clamped() {
        let mut c = camera();
        c.follow(EntityId(5), -0.5, 0.0, 0.0);
        assert_eq!(c.follow_speed(), 0.0);
        c.follow(EntityId(5), 1.5, 10.0, 20.0);
        assert_eq!(c.follow_speed(), 1.0);
        assert_eq!(c.follow_offset(), Vec2::new(10.0, 20.0));
    }

    // ── follow ────────────────────────────────────────────────────────────

    #[test]
    fn follow_lerps_by_speed_per_call() {
        let mut c = camera();
        c.follow(EntityId(1), 0.5, 0.0, 0.0);
        let source = |_: EntityId| Some(Vec2::new(1000.0, 1000.0));

        c.update(0.016, &source);
        assert_eq!(c.position(), Vec2::new(300.0, 350.0));

        // Same step regardless of delta time.
        c.update(1.0, &source);
        assert_eq!(c.position(), Vec2::new(450.0, 525.0));
    }

    #[test]
    fn follow_offset_shifts_goal() {
        let mut c = camera();
        c.follow(EntityId(1), 1.0, 10.0, -20.0);
        c.update(0.016, &|_: EntityId| Some(Vec2::new(400.0, 300.0)));
        assert_eq!(c.position(), Vec2::new(10.0, -20.0));
    }

    #[test]
    fn no_target_or_unresolved_target_holds_position() {
        let mut c = camera();
        c.update(0.016, &|_: EntityId| Some(Vec2::new(1000.0, 1000.0)));
        assert_eq!(c.position(), Vec2::zero());

        c.follow(EntityId(3), 0.5, 0.0, 0.0);
        c.update(0.016, &());
        assert_eq!(c.position(), Vec2::zero());

        c.stop_following();
        assert_eq!(c.follow_target(), None);
    }

    // ── shake ─────────────────────────────────────────────────────────────

    #[test]
    fn single_update_after_shake() {
        let mut c = camera();
        c.shake(10.0, None);
        c.update(0.016, &());

        let o = c.shake_offset();
        assert!((-5.0..=5.0).contains(&o.x));
        assert!((-5.0..=5.0).contains(&o.y));
        assert_abs_diff_eq!(c.shake_intensity(), 9.0, epsilon = 1e-5);
    }

    #[test]
    fn shake_decays_monotonically_to_exact_zero() {
        let mut c = camera();
        c.shake(10.0, None);

        let mut prev = c.shake_intensity();
        let mut steps = 0;
        while c.shake_intensity() > 0.0 {
            c.update(0.016, &());
            assert!(c.shake_intensity() <= prev);
            prev = c.shake_intensity();
            steps += 1;
            assert!(steps < 1000, "shake never settled");
        }

        assert_eq!(c.shake_offset(), Vec2::zero());
        c.update(0.016, &());
        assert_eq!(c.shake_offset(), Vec2::zero());
    }

    #[test]
    fn stacked_shake_keeps_max() {
        let mut c = camera();
        c.shake(10.0, None);
        c.shake(5.0, None);
        assert_eq!(c.shake_intensity(), 10.0);
        c.shake(15.0, Some(0.5));
        assert_eq!(c.shake_intensity(), 15.0);
        assert_eq!(c.shake_decay(), 0.5);
    }

    #[test]
    fn seeded_shake_is_reproducible() {
        let mut a = camera();
        let mut b = camera();
        a.shake(20.0, None);
        b.shake(20.0, None);
        a.update(0.016, &());
        b.update(0.016, &());
        assert_eq!(a.shake_offset(), b.shake_offset());
    }

    // ── coordinate spaces ─────────────────────────────────────────────────

    #[test]
    fn world_to_screen_scenario() {
        let mut c = camera();
        assert_eq!(c.world_to_screen(100.0, 100.0), Vec2::new(100.0, 100.0));
        c.set_zoom(2.0);
        assert_eq!(c.world_to_screen(100.0, 100.0), Vec2::new(200.0, 200.0));
    }

    #[test]
    fn screen_to_world_inverts_with_zoom_and_shake() {
        let mut c = camera();
        c.set_position(-37.5, 120.25);
        c.set_zoom(2.5);
        c.shake(30.0, None);
        c.update(0.016, &());
        assert_ne!(c.shake_offset(), Vec2::zero());

        for &(x, y) in &[(0.0, 0.0), (123.4, -56.7), (-1000.0, 2500.5), (0.001, 9999.0)] {
            let s = c.world_to_screen(x, y);
            let w = c.screen_to_world(s.x, s.y);
            assert_abs_diff_eq!(w.x, x, epsilon = 1e-2);
            assert_abs_diff_eq!(w.y, y, epsilon = 1e-2);
        }
    }

    // ── visibility ────────────────────────────────────────────────────────

    #[test]
    fn contains_rect_scenario() {
        let c = camera();
        assert!(c.contains_rect(790.0, 300.0, 32.0, 32.0));
        assert!(!c.contains_rect(1000.0, 1000.0, 32.0, 32.0));
    }

    #[test]
    fn contains_uses_margin_and_zoom() {
        let mut c = camera();
        assert!(c.contains(400.0, 300.0, 0.0));
        assert!(c.contains(850.0, 300.0, 100.0));
        assert!(!c.contains(950.0, 300.0, 100.0));
        c.set_zoom(2.0);
        assert!(!c.contains(500.0, 300.0, 0.0));
    }

    #[test]
    fn bounds_and_center_follow_zoom() {
        let mut c = camera();
        c.set_position(100.0, 50.0);
        c.set_zoom(2.0);
        assert_eq!(c.bounds(), Rect::new(100.0, 50.0, 400.0, 300.0));
        assert_eq!(c.center(), Vec2::new(300.0, 200.0));
    }

    #[test]
    fn moved_flag_tracks_changes() {
        let mut c = camera();
        assert!(!c.take_moved());
        c.move_by(5.0, 0.0);
        assert!(c.take_moved());
        assert!(!c.take_moved());
        c.set_position(5.0, 0.0);
        assert!(!c.take_moved());
        c.set_zoom(3.0);
        assert!(c.take_moved());
    }

    #[test]
    fn shake_counts_as_movement() {
        let mut c = camera().with_seed(3);
        c.shake(10.0, Some(0.5));
        c.update(0.016, &());
        assert!(c.take_moved());

        while c.shake_intensity() > 0.0 {
            c.update(0.016, &());
        }
        c.take_moved();
        c.update(0.016, &());
        assert!(!c.take_moved());
    }
}
