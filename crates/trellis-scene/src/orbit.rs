//! Orbit camera controller
//!
//! Owns the orbit state (yaw, pitch, radius) and the input gesture state
//! machine: `Idle`, `Dragging` (single-pointer orbit), `Pinching`
//! (two-finger zoom). All events funnel through one entry point,
//! `apply(event, now)`, and the render-side `frame(now)` emits eased
//! camera poses at the tier's target rate. Time is passed in as a plain
//! `Duration`, so every behavior here — including the double-tap reset
//! and the frame cap — runs against a virtual clock in tests.

use std::time::Duration;

use bevy::math::{Vec2, Vec3};

use crate::tier::{DeviceTier, TierProfile, DEFAULT_PITCH, DEFAULT_YAW};

/// Pitch is kept strictly inside +-PI/2 so the view never flips over the
/// poles.
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.1;

/// Two taps within this window count as a double tap.
const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);
/// A double tap is confirmed (and the reset fires) only if no further
/// touch starts within this delay.
const DOUBLE_TAP_CONFIRM: Duration = Duration::from_millis(200);
/// Movement beyond this many pixels turns a touch into a drag, not a tap.
const TAP_SLOP: f32 = 10.0;

/// Orbit parameters around the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
}

/// Raw input, already filtered by the caller (primary button only for
/// pointer events, egui-captured input dropped).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(Vec2),
    PointerMove(Vec2),
    /// Button release or pointer leaving the viewport.
    PointerUp,
    /// Positive zooms out (radius x1.1), negative zooms in (x0.9).
    Wheel(f32),
    /// Positions of all active touch points after a touch began.
    TouchStart(Vec<Vec2>),
    /// Positions of all active touch points after movement.
    TouchMove(Vec<Vec2>),
    /// A touch ended; `remaining` is the number still down.
    TouchEnd { remaining: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GesturePhase {
    Idle,
    Dragging { last: Vec2 },
    Pinching { last_distance: f32 },
}

/// Camera placement for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// The camera always looks here.
    pub target: Vec3,
}

#[derive(Debug, Clone)]
pub struct OrbitController {
    profile: TierProfile,
    phase: GesturePhase,
    target: OrbitState,
    /// Eased actual camera position, trailing the orbit target.
    position: Vec3,
    last_frame: Option<Duration>,
    last_tap: Option<Duration>,
    pending_reset: Option<Duration>,
    /// The current single touch has not moved beyond the tap slop.
    tap_candidate: bool,
    touch_anchor: Option<Vec2>,
}

impl OrbitController {
    pub fn new(tier: DeviceTier) -> Self {
        let profile = tier.profile();
        let target = OrbitState {
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            radius: profile.initial_radius,
        };
        let mut controller = Self {
            profile,
            phase: GesturePhase::Idle,
            target,
            position: Vec3::ZERO,
            last_frame: None,
            last_tap: None,
            pending_reset: None,
            tap_candidate: false,
            touch_anchor: None,
        };
        controller.position = controller.target_position();
        controller
    }

    pub fn orbit(&self) -> OrbitState {
        self.target
    }

    pub fn profile(&self) -> &TierProfile {
        &self.profile
    }

    pub fn is_idle(&self) -> bool {
        self.phase == GesturePhase::Idle
    }

    /// Override the tier's frame-rate cap, e.g. from a config file.
    pub fn set_target_fps(&mut self, fps: u32) {
        self.profile.target_fps = fps.max(1);
    }

    /// Single entry point for all raw input.
    pub fn apply(&mut self, event: InputEvent, now: Duration) {
        match event {
            InputEvent::PointerDown(pos) => {
                self.phase = GesturePhase::Dragging { last: pos };
            }
            InputEvent::PointerMove(pos) => {
                if let GesturePhase::Dragging { last } = self.phase {
                    self.orbit_by(pos - last, self.profile.drag_sensitivity);
                    self.phase = GesturePhase::Dragging { last: pos };
                }
            }
            InputEvent::PointerUp => {
                if matches!(self.phase, GesturePhase::Dragging { .. }) {
                    self.phase = GesturePhase::Idle;
                }
            }
            InputEvent::Wheel(delta) => {
                let scale = if delta > 0.0 { 1.1 } else { 0.9 };
                self.set_radius(self.target.radius * scale);
            }
            InputEvent::TouchStart(points) => {
                // Any further touch voids an armed double-tap reset.
                self.pending_reset = None;
                match points.len() {
                    1 => {
                        self.phase = GesturePhase::Dragging { last: points[0] };
                        self.touch_anchor = Some(points[0]);
                        self.tap_candidate = true;
                    }
                    n if n >= 2 => {
                        self.phase = GesturePhase::Pinching {
                            last_distance: points[0].distance(points[1]),
                        };
                        self.tap_candidate = false;
                    }
                    _ => {}
                }
            }
            InputEvent::TouchMove(points) => match (self.phase, points.len()) {
                (GesturePhase::Dragging { last }, 1) => {
                    if self.tap_candidate {
                        if let Some(anchor) = self.touch_anchor {
                            if points[0].distance(anchor) > TAP_SLOP {
                                self.tap_candidate = false;
                            }
                        }
                    }
                    self.orbit_by(points[0] - last, self.profile.touch_sensitivity);
                    self.phase = GesturePhase::Dragging { last: points[0] };
                }
                (GesturePhase::Pinching { last_distance }, n) if n >= 2 => {
                    let distance = points[0].distance(points[1]).max(1.0);
                    let scale = last_distance / distance;
                    // Damped blend between the old radius and the scaled
                    // one, so noisy inter-touch distances don't jitter
                    // the zoom.
                    let radius = self.target.radius;
                    self.set_radius(0.9 * radius + 0.1 * (radius * scale));
                    self.phase = GesturePhase::Pinching {
                        last_distance: distance,
                    };
                }
                _ => {}
            },
            InputEvent::TouchEnd { remaining } => {
                let was_tap = self.tap_candidate
                    && matches!(self.phase, GesturePhase::Dragging { .. });
                if remaining < 2 {
                    self.phase = GesturePhase::Idle;
                }
                if remaining == 0 {
                    if was_tap {
                        if let Some(previous) = self.last_tap {
                            if now.saturating_sub(previous) <= DOUBLE_TAP_WINDOW {
                                self.pending_reset = Some(now + DOUBLE_TAP_CONFIRM);
                            }
                        }
                        self.last_tap = Some(now);
                    }
                    self.tap_candidate = false;
                    self.touch_anchor = None;
                }
            }
        }
    }

    /// Advance the render side. Returns `None` while the elapsed time
    /// since the last emitted frame is below the tier frame interval,
    /// otherwise the eased camera pose for this frame.
    pub fn frame(&mut self, now: Duration) -> Option<CameraPose> {
        if let Some(deadline) = self.pending_reset {
            if now >= deadline {
                self.reset();
            }
        }
        if let Some(last) = self.last_frame {
            if now.saturating_sub(last) < self.profile.frame_interval() {
                return None;
            }
        }
        self.last_frame = Some(now);

        let target = self.target_position();
        self.position += (target - self.position) * self.profile.lerp_factor;
        Some(CameraPose {
            position: self.position,
            target: Vec3::ZERO,
        })
    }

    /// Spherical-to-Cartesian conversion of the orbit target, Y-up.
    pub fn target_position(&self) -> Vec3 {
        let OrbitState { yaw, pitch, radius } = self.target;
        Vec3::new(
            radius * yaw.sin() * pitch.cos(),
            radius * pitch.sin(),
            radius * yaw.cos() * pitch.cos(),
        )
    }

    /// Restore the tier default view from any state.
    pub fn reset(&mut self) {
        tracing::debug!("orbit reset to tier defaults");
        self.pending_reset = None;
        self.phase = GesturePhase::Idle;
        self.target = OrbitState {
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            radius: self.profile.initial_radius,
        };
    }

    /// Frame a freshly loaded model: radius from its bounding extent and
    /// the tier fit multiplier, angles back to the defaults.
    pub fn fit_to_extent(&mut self, extent: f32) {
        let radius = (extent * self.profile.fit_multiplier)
            .clamp(self.profile.min_radius, self.profile.max_radius);
        self.target = OrbitState {
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            radius,
        };
    }

    fn orbit_by(&mut self, delta: Vec2, sensitivity: f32) {
        self.target.yaw += delta.x * sensitivity;
        self.target.pitch =
            (self.target.pitch + delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    fn set_radius(&mut self, radius: f32) {
        self.target.radius = radius.clamp(self.profile.min_radius, self.profile.max_radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn desktop() -> OrbitController {
        OrbitController::new(DeviceTier::Desktop)
    }

    fn mobile() -> OrbitController {
        OrbitController::new(DeviceTier::Mobile)
    }

    fn tap(controller: &mut OrbitController, at: Duration) {
        controller.apply(InputEvent::TouchStart(vec![Vec2::new(50.0, 50.0)]), at);
        controller.apply(InputEvent::TouchEnd { remaining: 0 }, at);
    }

    #[test]
    fn test_pitch_stays_clamped_through_any_drag() {
        let mut controller = desktop();
        controller.apply(InputEvent::PointerDown(Vec2::ZERO), ms(0));
        // Wild up-down sweeps far past the poles.
        for i in 1..200 {
            let y = if i % 3 == 0 { -4000.0 } else { 3000.0 };
            controller.apply(InputEvent::PointerMove(Vec2::new(i as f32, y)), ms(i));
        }
        let pitch = controller.orbit().pitch;
        assert!(pitch <= PITCH_LIMIT && pitch >= -PITCH_LIMIT);
    }

    #[test]
    fn test_drag_updates_yaw_by_sensitivity() {
        let mut controller = desktop();
        let start_yaw = controller.orbit().yaw;
        controller.apply(InputEvent::PointerDown(Vec2::new(100.0, 100.0)), ms(0));
        controller.apply(InputEvent::PointerMove(Vec2::new(150.0, 100.0)), ms(16));
        let expected = start_yaw + 50.0 * 0.01;
        assert!((controller.orbit().yaw - expected).abs() < 1e-6);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut controller = desktop();
        let before = controller.orbit();
        controller.apply(InputEvent::PointerMove(Vec2::new(500.0, 500.0)), ms(0));
        assert_eq!(controller.orbit(), before);
    }

    #[test]
    fn test_wheel_zoom_clamps_to_tier_bounds() {
        let mut controller = desktop();
        for i in 0..100 {
            controller.apply(InputEvent::Wheel(1.0), ms(i));
        }
        assert_eq!(controller.orbit().radius, 100.0);
        for i in 0..200 {
            controller.apply(InputEvent::Wheel(-1.0), ms(100 + i));
        }
        assert_eq!(controller.orbit().radius, 5.0);
    }

    #[test]
    fn test_pinch_zoom_clamps_to_touch_bounds() {
        let mut controller = mobile();
        controller.apply(
            InputEvent::TouchStart(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]),
            ms(0),
        );
        // Fingers closing hard, over and over: radius grows, stays bounded.
        for i in 0..500 {
            controller.apply(
                InputEvent::TouchMove(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]),
                ms(i),
            );
            controller.apply(
                InputEvent::TouchStart(vec![Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0)]),
                ms(i),
            );
            controller.apply(
                InputEvent::TouchMove(vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0)]),
                ms(i),
            );
        }
        assert!(controller.orbit().radius <= 150.0);
        assert!(controller.orbit().radius >= 8.0);
    }

    #[test]
    fn test_pinch_is_damped() {
        let mut controller = mobile();
        let start = controller.orbit().radius;
        controller.apply(
            InputEvent::TouchStart(vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)]),
            ms(0),
        );
        // Fingers spread to double the distance: scale 0.5, so the damped
        // radius is 0.9*r + 0.1*(r*0.5) = 0.95*r.
        controller.apply(
            InputEvent::TouchMove(vec![Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0)]),
            ms(16),
        );
        assert!((controller.orbit().radius - 0.95 * start).abs() < 1e-4);
    }

    #[test]
    fn test_double_tap_resets_after_confirmation_delay() {
        let mut controller = mobile();
        // Disturb the orbit first.
        controller.apply(InputEvent::PointerDown(Vec2::ZERO), ms(0));
        controller.apply(InputEvent::PointerMove(Vec2::new(300.0, 200.0)), ms(5));
        controller.apply(InputEvent::PointerUp, ms(10));
        controller.apply(InputEvent::Wheel(1.0), ms(15));
        assert_ne!(controller.orbit().yaw, DEFAULT_YAW);

        tap(&mut controller, ms(1000));
        tap(&mut controller, ms(1200));

        // Confirmation window still open: no reset yet.
        controller.frame(ms(1350));
        assert_ne!(controller.orbit().yaw, DEFAULT_YAW);

        controller.frame(ms(1450));
        let orbit = controller.orbit();
        assert_eq!(orbit.yaw, DEFAULT_YAW);
        assert_eq!(orbit.pitch, DEFAULT_PITCH);
        assert_eq!(orbit.radius, 25.0);
    }

    #[test]
    fn test_slow_taps_do_not_reset() {
        let mut controller = mobile();
        controller.apply(InputEvent::Wheel(1.0), ms(0));
        let disturbed = controller.orbit();

        tap(&mut controller, ms(1000));
        tap(&mut controller, ms(1400));
        controller.frame(ms(2000));
        assert_eq!(controller.orbit(), disturbed);
    }

    #[test]
    fn test_touch_during_confirmation_cancels_reset() {
        let mut controller = mobile();
        controller.apply(InputEvent::Wheel(1.0), ms(0));
        let disturbed = controller.orbit();

        tap(&mut controller, ms(1000));
        tap(&mut controller, ms(1150));
        // A third touch lands before the confirmation delay elapses and
        // turns into a drag.
        controller.apply(InputEvent::TouchStart(vec![Vec2::new(9.0, 9.0)]), ms(1250));
        controller.apply(InputEvent::TouchMove(vec![Vec2::new(59.0, 9.0)]), ms(1280));
        controller.apply(InputEvent::TouchEnd { remaining: 0 }, ms(1300));

        controller.frame(ms(1500));
        // The armed reset was cancelled; the drag moved yaw but radius is
        // untouched and no reset fired.
        assert_eq!(controller.orbit().radius, disturbed.radius);
        assert_ne!(controller.orbit().yaw, DEFAULT_YAW);
    }

    #[test]
    fn test_touch_drags_are_not_taps() {
        let mut controller = mobile();
        controller.apply(InputEvent::Wheel(1.0), ms(0));
        let disturbed_radius = controller.orbit().radius;

        for start in [1000u64, 1100] {
            controller.apply(InputEvent::TouchStart(vec![Vec2::new(0.0, 0.0)]), ms(start));
            controller.apply(
                InputEvent::TouchMove(vec![Vec2::new(80.0, 0.0)]),
                ms(start + 30),
            );
            controller.apply(InputEvent::TouchEnd { remaining: 0 }, ms(start + 60));
        }
        controller.frame(ms(2000));
        // Orbit moved from the drags, but no reset fired.
        assert_eq!(controller.orbit().radius, disturbed_radius);
        assert_ne!(controller.orbit().yaw, DEFAULT_YAW);
    }

    #[test]
    fn test_frame_cap_skips_early_frames() {
        let mut controller = mobile();
        assert!(controller.frame(ms(0)).is_some());
        assert!(controller.frame(ms(10)).is_none());
        assert!(controller.frame(ms(20)).is_none());
        assert!(controller.frame(ms(34)).is_some());

        let mut controller = desktop();
        assert!(controller.frame(ms(0)).is_some());
        assert!(controller.frame(ms(10)).is_none());
        assert!(controller.frame(ms(17)).is_some());
    }

    #[test]
    fn test_frames_ease_toward_spherical_target() {
        let mut controller = desktop();
        controller.apply(InputEvent::PointerDown(Vec2::ZERO), ms(0));
        controller.apply(InputEvent::PointerMove(Vec2::new(120.0, 60.0)), ms(1));
        controller.apply(InputEvent::PointerUp, ms(2));

        let target = controller.target_position();
        let mut previous = f32::INFINITY;
        let mut now = ms(100);
        for _ in 0..240 {
            if let Some(pose) = controller.frame(now) {
                let distance = pose.position.distance(target);
                assert!(distance <= previous + 1e-4);
                previous = distance;
                assert_eq!(pose.target, Vec3::ZERO);
            }
            now += ms(17);
        }
        assert!(previous < 0.01);
    }

    #[test]
    fn test_fit_to_extent_applies_multiplier_and_defaults() {
        let mut controller = desktop();
        controller.apply(InputEvent::PointerDown(Vec2::ZERO), ms(0));
        controller.apply(InputEvent::PointerMove(Vec2::new(50.0, 50.0)), ms(1));

        controller.fit_to_extent(8.5);
        let orbit = controller.orbit();
        assert_eq!(orbit.yaw, DEFAULT_YAW);
        assert_eq!(orbit.pitch, DEFAULT_PITCH);
        assert!((orbit.radius - 8.5 * 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_pinch_release_returns_to_idle() {
        let mut controller = mobile();
        controller.apply(
            InputEvent::TouchStart(vec![Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0)]),
            ms(0),
        );
        assert!(!controller.is_idle());
        controller.apply(InputEvent::TouchEnd { remaining: 1 }, ms(10));
        assert!(controller.is_idle());
    }
}
