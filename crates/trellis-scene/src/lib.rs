//! Trellis Scene - Orbit camera and 3D scene setup
//!
//! This crate provides the interactive heart of the viewer: device tier
//! classification with per-tier constants, the orbit camera controller
//! (input state machine plus frame-capped eased updates), the resize
//! debouncer, and the Bevy plugins that bootstrap the scene and feed raw
//! input into the controller.

pub mod camera;
pub mod debounce;
pub mod orbit;
pub mod scene;
pub mod tier;

use bevy::prelude::*;

/// Plugin bundle for the shared 3D pieces: scene bootstrap plus camera
/// input handling. Expects `ActiveTier` and `OrbitRig` resources to be
/// inserted by the application before startup.
pub struct TrellisScenePlugin;

impl Plugin for TrellisScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(scene::SceneSetupPlugin)
            .add_plugins(camera::CameraPlugin);
    }
}

pub use camera::{MainCamera, OrbitRig};
pub use debounce::{Debouncer, RESIZE_DEBOUNCE};
pub use orbit::{CameraPose, InputEvent, OrbitController, OrbitState};
pub use tier::{ActiveTier, DeviceTier, TierProfile, DEFAULT_PITCH, DEFAULT_YAW};
