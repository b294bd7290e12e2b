//! Bevy application setup

use std::path::PathBuf;
use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};

use trellis_core::ComponentRegistry;
use trellis_scene::{ActiveTier, OrbitRig, TrellisScenePlugin};

use crate::config::Config;
use crate::loader::LoaderPlugin;
use crate::model::ModelPlugin;
use crate::ui::UiPlugin;

/// The component registry backing the side panel and the 3D entities.
#[derive(Debug, Clone, Resource, Default)]
pub struct Registry(pub ComponentRegistry);

/// Currently selected component id
#[derive(Debug, Clone, Resource, Default)]
pub struct SelectedComponent(pub Option<String>);

/// Model loading progress for the UI
#[derive(Debug, Clone, Resource, Default)]
pub struct LoadState {
    pub loading: bool,
    /// Filename of the currently loaded model
    pub source: Option<String>,
    pub error: Option<String>,
}

/// Below this width the controls hint auto-hides after a few seconds.
const HINT_AUTO_HIDE_WIDTH: f32 = 575.0;
const HINT_AUTO_HIDE_DELAY: Duration = Duration::from_secs(5);

/// UI layout settings for responsive design
#[derive(Debug, Clone, Resource)]
pub struct UiLayout {
    /// Whether the components panel is visible
    pub show_panel: bool,
    /// Current screen width
    pub screen_width: f32,
    /// Current screen height
    pub screen_height: f32,
    /// Whether we're on a small screen
    pub is_mobile: bool,
    /// Whether the controls hint overlay is still shown
    pub show_hint: bool,
    /// When the hint auto-hides on very small screens
    pub hint_deadline: Option<Duration>,
}

impl Default for UiLayout {
    fn default() -> Self {
        Self {
            show_panel: true,
            screen_width: 1280.0,
            screen_height: 800.0,
            is_mobile: false,
            show_hint: true,
            hint_deadline: None,
        }
    }
}

impl UiLayout {
    /// Update layout based on screen dimensions
    pub fn update_for_screen(&mut self, width: f32, height: f32, now: Duration) {
        self.screen_width = width;
        self.screen_height = height;

        let was_mobile = self.is_mobile;
        self.is_mobile = width <= 767.0;

        // On first detection of mobile mode, collapse the panel so the
        // scene has the full screen.
        if self.is_mobile && !was_mobile {
            self.show_panel = false;
        }

        // Very small screens get the hint briefly, then reclaim the space.
        if width <= HINT_AUTO_HIDE_WIDTH {
            if self.show_hint && self.hint_deadline.is_none() {
                self.hint_deadline = Some(now + HINT_AUTO_HIDE_DELAY);
            }
        } else {
            self.hint_deadline = None;
        }
    }

    /// Expire the hint once its deadline passes.
    pub fn tick_hint(&mut self, now: Duration) {
        if let Some(deadline) = self.hint_deadline {
            if now >= deadline {
                self.show_hint = false;
                self.hint_deadline = None;
            }
        }
    }

    /// Width for the components panel
    pub fn panel_width(&self) -> f32 {
        if self.is_mobile {
            (self.screen_width * 0.8).min(300.0)
        } else {
            320.0
        }
    }
}

/// Override to apply when the OS scale factor exceeds the tier's pixel
/// ratio cap, so high-DPI displays don't render more pixels than the
/// tier budgets for.
fn capped_scale_factor(scale: f32, cap: f32) -> Option<f32> {
    (scale > cap).then_some(cap)
}

fn apply_pixel_ratio_cap(tier: Res<ActiveTier>, mut windows: Query<&mut Window>) {
    let cap = tier.0.profile().pixel_ratio_cap;
    if let Ok(mut window) = windows.single_mut() {
        let scale = window.resolution.scale_factor();
        if let Some(capped) = capped_scale_factor(scale, cap) {
            window.resolution.set_scale_factor_override(Some(capped));
            tracing::debug!(scale, cap, "capped render pixel ratio");
        }
    }
}

/// Run the Bevy application
pub fn run(config: Config, initial_model: Option<PathBuf>) {
    let tier = config.resolve_tier(config.window.width);
    tracing::info!(?tier, "starting viewer");

    let mut rig = OrbitRig::new(tier);
    if let Some(fps) = config.viewer.target_fps {
        rig.0.set_target_fps(fps);
    }

    App::new()
        // Light gray background matching the panel chrome
        .insert_resource(ClearColor(Color::srgb(0.961, 0.961, 0.961)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: config.window.title.clone(),
                resolution: (config.window.width as u32, config.window.height as u32).into(),
                ..default()
            }),
            ..default()
        }))
        // Picking plugins must be added before EguiPlugin so it can
        // detect PickingPlugin; MeshPickingPlugin supplies 3D raycasting.
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .insert_resource(ActiveTier(tier))
        .insert_resource(rig)
        .init_resource::<Registry>()
        .init_resource::<SelectedComponent>()
        .init_resource::<LoadState>()
        .init_resource::<UiLayout>()
        .add_systems(Startup, apply_pixel_ratio_cap)
        .add_plugins(TrellisScenePlugin)
        .add_plugins(LoaderPlugin {
            initial_model,
        })
        .add_plugins(ModelPlugin)
        .add_plugins(UiPlugin)
        .run();
}
