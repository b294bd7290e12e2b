//! 3D entities for the loaded model
//!
//! Rebuilds the component cuboids when the registry swaps models, mirrors
//! registry visibility onto the entities, drives the highlight blink, and
//! handles click/tap selection via a camera ray against each component's
//! bounding box.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use trellis_core::{BlinkPhase, BlinkSequence};
use trellis_scene::MainCamera;

use crate::app::{Registry, SelectedComponent};

/// Movement beyond this many pixels turns a press into a camera drag, not
/// a selection click.
const CLICK_SLOP: f32 = 10.0;

/// Marker for spawned component entities
#[derive(Component)]
pub struct ComponentEntity {
    pub component_id: String,
}

/// Original and highlight material handles for one component
#[derive(Component)]
pub struct ComponentMaterials {
    pub original: Handle<StandardMaterial>,
    pub highlight: Handle<StandardMaterial>,
}

/// The currently running highlight blink, if any
#[derive(Resource, Default)]
pub struct ActiveBlink(pub Option<BlinkSequence>);

/// Model id of the currently spawned entity set
#[derive(Resource, Default)]
struct SpawnedModel(Option<i64>);

/// Press tracking for click-vs-drag suppression
#[derive(Resource, Default)]
struct PressState {
    start: Option<Vec2>,
    dragged: bool,
    /// Single-touch tap tracking, same suppression rule.
    touch_start: Option<Vec2>,
    touch_dragged: bool,
}

pub struct ModelPlugin;

impl Plugin for ModelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveBlink>()
            .init_resource::<SpawnedModel>()
            .init_resource::<PressState>()
            .add_systems(
                Update,
                (
                    sync_model_entities,
                    sync_visibility,
                    handle_component_selection,
                    handle_deselection,
                    drive_blink,
                ),
            );
    }
}

/// Despawn and respawn the component entities when a new model lands.
fn sync_model_entities(
    mut commands: Commands,
    registry: Res<Registry>,
    mut spawned: ResMut<SpawnedModel>,
    mut blink: ResMut<ActiveBlink>,
    existing: Query<Entity, With<ComponentEntity>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !registry.is_changed() || spawned.0 == registry.0.model_id {
        return;
    }
    spawned.0 = registry.0.model_id;
    blink.0 = None;

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    for record in &registry.0.components {
        let [w, h, d] = record.kind.dimensions();
        let [r, g, b] = record.kind.base_color();

        let original = materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 0.8,
            ..default()
        });
        // Red with a faint glow, matching the blink highlight.
        let highlight = materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.0, 0.0),
            emissive: LinearRgba::rgb(0.2, 0.0, 0.0),
            perceptual_roughness: 0.8,
            ..default()
        });

        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(w, h, d))),
            MeshMaterial3d(original.clone()),
            Transform::from_translation(Vec3::from_array(record.position)),
            if record.visible {
                Visibility::Visible
            } else {
                Visibility::Hidden
            },
            ComponentEntity {
                component_id: record.id.clone(),
            },
            ComponentMaterials {
                original,
                highlight,
            },
        ));
    }

    tracing::info!(
        components = registry.0.len(),
        model_id = ?registry.0.model_id,
        "spawned model entities"
    );
}

/// Mirror registry visibility flags onto the spawned entities.
fn sync_visibility(
    registry: Res<Registry>,
    mut entities: Query<(&ComponentEntity, &mut Visibility)>,
) {
    if !registry.is_changed() {
        return;
    }
    for (entity, mut visibility) in entities.iter_mut() {
        if let Some(record) = registry.0.get(&entity.component_id) {
            let wanted = if record.visible {
                Visibility::Visible
            } else {
                Visibility::Hidden
            };
            if *visibility != wanted {
                *visibility = wanted;
            }
        }
    }
}

/// Advance the active blink and swap materials accordingly. Components
/// outside the active sequence always show their original material.
fn drive_blink(
    mut blink: ResMut<ActiveBlink>,
    mut selected: ResMut<SelectedComponent>,
    time: Res<Time>,
    mut entities: Query<(
        &ComponentEntity,
        &ComponentMaterials,
        &mut MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let now = time.elapsed();

    let mut active_id = None;
    let mut phase = None;
    let mut finished = None;
    if let Some(seq) = blink.0.as_mut() {
        phase = seq.poll(now);
        if seq.is_finished() {
            finished = Some(seq.id().to_string());
        } else {
            active_id = Some(seq.id().to_string());
        }
    }
    if let Some(id) = finished {
        blink.0 = None;
        // The selection indicator clears with the end of the sequence.
        if selected.0.as_deref() == Some(id.as_str()) {
            selected.0 = None;
        }
    }

    for (entity, handles, mut material) in entities.iter_mut() {
        if Some(entity.component_id.as_str()) == active_id.as_deref() {
            if let Some(phase) = phase {
                material.0 = match phase {
                    BlinkPhase::Highlight => handles.highlight.clone(),
                    BlinkPhase::Original => handles.original.clone(),
                };
            }
        } else if material.0 != handles.original {
            material.0 = handles.original.clone();
        }
    }
}

/// Click or tap on a component selects it; clicks that turn into camera
/// drags are suppressed, and empty-space clicks deselect.
#[allow(clippy::too_many_arguments)]
fn handle_component_selection(
    mut selected: ResMut<SelectedComponent>,
    registry: Res<Registry>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    mut press: ResMut<PressState>,
    mut contexts: EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let Ok(window) = windows.single() else {
        return;
    };

    let mut selection_pos: Option<Vec2> = None;

    // Mouse: arm on press, suppress if the pointer wandered, fire on
    // release.
    if mouse_button.just_pressed(MouseButton::Left) && !egui_wants_pointer {
        press.start = window.cursor_position();
        press.dragged = false;
    }
    if let (Some(start), Some(current)) = (press.start, window.cursor_position()) {
        if current.distance(start) > CLICK_SLOP {
            press.dragged = true;
        }
    }
    if mouse_button.just_released(MouseButton::Left) {
        if let Some(start) = press.start.take() {
            if !press.dragged {
                selection_pos = Some(start);
            }
        }
        press.dragged = false;
    }

    // Touch: same rule against the first touch point.
    if let Some(touch) = touches.iter().next() {
        if touches.just_pressed(touch.id()) && !egui_wants_pointer {
            press.touch_start = Some(touch.position());
            press.touch_dragged = false;
        } else if let Some(start) = press.touch_start {
            if touch.position().distance(start) > CLICK_SLOP {
                press.touch_dragged = true;
            }
        }
    }
    if touches.iter_just_released().next().is_some() {
        if let Some(start) = press.touch_start.take() {
            if !press.touch_dragged {
                selection_pos = Some(start);
            }
        }
        press.touch_dragged = false;
    }

    let Some(pos) = selection_pos else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, pos) else {
        return;
    };

    let mut closest: Option<(f32, String)> = None;
    for record in &registry.0.components {
        if !record.visible {
            continue;
        }
        let center = Vec3::from_array(record.position);
        let half = Vec3::from_array(record.kind.dimensions()) / 2.0;
        if let Some(t) = ray_aabb_intersection(ray.origin, *ray.direction, center - half, center + half)
        {
            if closest.as_ref().map(|(best, _)| t < *best).unwrap_or(true) {
                closest = Some((t, record.id.clone()));
            }
        }
    }

    match closest {
        Some((_, id)) => {
            tracing::debug!(component = %id, "selected via viewport ray");
            selected.0 = Some(id);
        }
        None => selected.0 = None,
    }
}

/// Escape clears the current selection.
fn handle_deselection(
    mut selected: ResMut<SelectedComponent>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        selected.0 = None;
    }
}

/// Slab test; returns the entry distance along the ray, or `None` when
/// the ray misses the box entirely or the box is behind the origin.
fn ray_aabb_intersection(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < 1e-8 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let t1 = (min[axis] - o) / d;
        let t2 = (max[axis] - o) / d;
        let (t1, t2) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        t_near = t_near.max(t1);
        t_far = t_far.min(t2);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}
