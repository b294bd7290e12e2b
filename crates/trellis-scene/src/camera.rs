//! Camera input plugin
//!
//! Thin Bevy layer over the orbit controller: translates raw mouse and
//! touch input into `InputEvent`s, advances the controller once per
//! schedule tick, and applies emitted poses to the main camera. Window
//! resizes go through the debouncer before touching the projection.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::WindowResized;
use bevy_egui::EguiContexts;

use crate::debounce::{Debouncer, RESIZE_DEBOUNCE};
use crate::orbit::{InputEvent, OrbitController};
use crate::tier::DeviceTier;

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// The orbit controller, owned by the viewer instance.
#[derive(Resource)]
pub struct OrbitRig(pub OrbitController);

impl OrbitRig {
    pub fn new(tier: DeviceTier) -> Self {
        Self(OrbitController::new(tier))
    }
}

/// Pending debounced viewport size update.
#[derive(Resource)]
pub struct ResizeDebounce {
    debouncer: Debouncer,
    size: Option<(f32, f32)>,
}

impl Default for ResizeDebounce {
    fn default() -> Self {
        Self {
            debouncer: Debouncer::new(RESIZE_DEBOUNCE),
            size: None,
        }
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ResizeDebounce>().add_systems(
            Update,
            (update_camera, debounce_window_resize, apply_window_resize),
        );
    }
}

/// Raw input sampled for one schedule tick, decoupled from Bevy's
/// resources so the event synthesis order is testable.
#[derive(Debug, Clone, Default)]
struct TickInput {
    /// egui owns the pointer this tick (hovering or interacting with a
    /// panel), so new camera gestures stand down.
    egui_wants_pointer: bool,
    cursor: Option<Vec2>,
    primary_just_pressed: bool,
    primary_pressed: bool,
    primary_just_released: bool,
    /// Wheel y deltas seen this tick; scrolling down (negative) zooms out.
    wheel: Vec<f32>,
    /// Positions of all active touch points.
    touch_points: Vec<Vec2>,
    touch_started: bool,
    touch_moved: bool,
    touches_ended: usize,
}

/// Controller events for one tick, in emission order.
fn synthesize_events(input: &TickInput) -> Vec<InputEvent> {
    let mut events = Vec::new();

    // Primary-button orbit.
    if !input.egui_wants_pointer {
        if input.primary_just_pressed {
            if let Some(pos) = input.cursor {
                events.push(InputEvent::PointerDown(pos));
            }
        } else if input.primary_pressed {
            if let Some(pos) = input.cursor {
                events.push(InputEvent::PointerMove(pos));
            }
        }
    }
    // A release always ends the drag, captured or not. A cursor that
    // vanishes mid-press is a pointer-leave and ends it the same way;
    // a missing cursor alone is not a release, since touch-only ticks
    // report no cursor position at all.
    if input.primary_just_released || (input.primary_pressed && input.cursor.is_none()) {
        events.push(InputEvent::PointerUp);
    }

    if !input.egui_wants_pointer {
        for delta in &input.wheel {
            events.push(InputEvent::Wheel(-delta));
        }
    }

    // Touch: forward the full set of active points so the controller can
    // track drag vs pinch itself.
    if input.touch_started && !input.egui_wants_pointer {
        events.push(InputEvent::TouchStart(input.touch_points.clone()));
    } else if input.touch_moved && !input.egui_wants_pointer {
        events.push(InputEvent::TouchMove(input.touch_points.clone()));
    }
    if input.touches_ended > 0 {
        events.push(InputEvent::TouchEnd {
            remaining: input.touch_points.len(),
        });
    }

    events
}

#[allow(clippy::too_many_arguments)]
fn update_camera(
    mut rig: ResMut<OrbitRig>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut mouse_wheel: EventReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    let now = time.elapsed();

    let input = TickInput {
        egui_wants_pointer: contexts
            .ctx_mut()
            .map(|ctx| ctx.wants_pointer_input())
            .unwrap_or(false),
        cursor: windows.single().ok().and_then(|w| w.cursor_position()),
        primary_just_pressed: mouse_button.just_pressed(MouseButton::Left),
        primary_pressed: mouse_button.pressed(MouseButton::Left),
        primary_just_released: mouse_button.just_released(MouseButton::Left),
        wheel: mouse_wheel.read().map(|w| w.y).collect(),
        touch_points: touches.iter().map(|t| t.position()).collect(),
        touch_started: touches.iter().any(|t| touches.just_pressed(t.id())),
        touch_moved: touches.iter().any(|t| t.delta() != Vec2::ZERO),
        touches_ended: touches.iter_just_released().count()
            + touches.iter_just_canceled().count(),
    };

    for event in synthesize_events(&input) {
        rig.0.apply(event, now);
    }

    // Render side: the controller decides whether this tick gets a frame.
    if let Some(pose) = rig.0.frame(now) {
        if let Ok(mut transform) = camera_query.single_mut() {
            transform.translation = pose.position;
            transform.look_at(pose.target, Vec3::Y);
        }
    }
}

fn debounce_window_resize(
    mut events: EventReader<WindowResized>,
    mut resize: ResMut<ResizeDebounce>,
    time: Res<Time>,
) {
    let mut seen = false;
    for event in events.read() {
        resize.size = Some((event.width, event.height));
        seen = true;
    }
    if seen {
        resize.debouncer.trigger(time.elapsed());
    }
}

fn apply_window_resize(
    mut resize: ResMut<ResizeDebounce>,
    time: Res<Time>,
    mut projections: Query<&mut Projection, With<MainCamera>>,
) {
    if !resize.debouncer.fire(time.elapsed()) {
        return;
    }
    let Some((width, height)) = resize.size.take() else {
        return;
    };
    if height <= 0.0 {
        return;
    }
    for mut projection in projections.iter_mut() {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = width / height;
        }
    }
    tracing::debug!(width, height, "applied debounced viewport resize");
}
