//! Scene bootstrap - camera, lights, grid, and world axes
//!
//! Everything here is sized from the tier profile chosen at startup:
//! field of view, grid extent, axis length, light intensity, and whether
//! the directional light casts shadows.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::camera::{MainCamera, OrbitRig};
use crate::tier::ActiveTier;

/// Marker component for grid lines.
#[derive(Component)]
pub struct GridLine;

/// Marker component for the world axis visualization.
#[derive(Component)]
pub struct WorldAxis;

pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    tier: Res<ActiveTier>,
    rig: Res<OrbitRig>,
) {
    let profile = tier.0.profile();

    // Y-up world: the ground grid lies on the X-Z plane. The camera starts
    // at the controller's current spherical position so the first rendered
    // frame matches the first eased update.
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: profile.fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(rig.0.target_position()).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0 * profile.ambient_intensity,
        ..default()
    });

    // Key light from high above one corner, sun-like.
    commands.spawn((
        DirectionalLight {
            // Dimmer key light on tiers that skip shadows.
            illuminance: if profile.shadows { 10_000.0 } else { 8_000.0 },
            shadows_enabled: profile.shadows,
            ..default()
        },
        Transform::from_xyz(50.0, 50.0, 50.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    spawn_grid(&mut commands, &mut meshes, &mut materials, &profile);
    spawn_world_axes(&mut commands, &mut meshes, &mut materials, &profile);
}

fn spawn_grid(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    profile: &crate::tier::TierProfile,
) {
    let extent = profile.grid_size / 2.0;
    let spacing = profile.grid_size / profile.grid_divisions as f32;
    let thickness = 0.02;

    let line_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.53, 0.53, 0.53, profile.grid_opacity),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    // Lines along X and along Z.
    let line_mesh_x = meshes.add(Cuboid::new(profile.grid_size, thickness, thickness));
    let line_mesh_z = meshes.add(Cuboid::new(thickness, thickness, profile.grid_size));

    for i in 0..=profile.grid_divisions {
        let offset = -extent + i as f32 * spacing;
        commands.spawn((
            Mesh3d(line_mesh_x.clone()),
            MeshMaterial3d(line_material.clone()),
            Transform::from_translation(Vec3::new(0.0, 0.0, offset)),
            GridLine,
        ));
        commands.spawn((
            Mesh3d(line_mesh_z.clone()),
            MeshMaterial3d(line_material.clone()),
            Transform::from_translation(Vec3::new(offset, 0.0, 0.0)),
            GridLine,
        ));
    }
}

fn spawn_world_axes(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    profile: &crate::tier::TierProfile,
) {
    let length = profile.axis_length;
    let thickness = 0.04;
    let cone_height = thickness * 6.0;
    let cone_radius = thickness * 3.0;

    let shaft_mesh = meshes.add(Cylinder::new(thickness, length));
    let cone_mesh = meshes.add(Cone {
        radius: cone_radius,
        height: cone_height,
    });

    // (color, shaft rotation, unit direction); cylinders and cones are
    // Y-aligned, so X and Z need a quarter turn.
    let axes = [
        (
            Color::srgb(0.9, 0.2, 0.2),
            Quat::from_rotation_z(-FRAC_PI_2),
            Vec3::X,
        ),
        (Color::srgb(0.2, 0.9, 0.2), Quat::IDENTITY, Vec3::Y),
        (
            Color::srgb(0.2, 0.4, 0.9),
            Quat::from_rotation_x(FRAC_PI_2),
            Vec3::Z,
        ),
    ];

    for (color, rotation, direction) in axes {
        let material = materials.add(StandardMaterial {
            base_color: color,
            unlit: true,
            ..default()
        });
        commands.spawn((
            Mesh3d(shaft_mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(direction * (length / 2.0)).with_rotation(rotation),
            WorldAxis,
        ));
        commands.spawn((
            Mesh3d(cone_mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(direction * (length + cone_height / 2.0))
                .with_rotation(rotation),
            WorldAxis,
        ));
    }
}
