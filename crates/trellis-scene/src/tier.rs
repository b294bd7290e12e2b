//! Device tiers and their constant profiles
//!
//! A tier is selected once at startup from the viewport width (or forced
//! via configuration) and fixes the camera, quality, and rate constants
//! for the lifetime of the viewer. The responsive panel layout re-reads
//! the width on resize independently of the tier chosen here.

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Default orbit angles restored by the double-tap reset and applied when
/// fitting the camera after a load.
pub const DEFAULT_YAW: f32 = 0.5;
pub const DEFAULT_PITCH: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceTier {
    /// Classify a viewport width in logical pixels.
    pub fn from_width(width: f32) -> Self {
        if width <= 767.0 {
            DeviceTier::Mobile
        } else if width <= 991.0 {
            DeviceTier::Tablet
        } else {
            DeviceTier::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, DeviceTier::Mobile)
    }

    pub fn profile(&self) -> TierProfile {
        let mobile = self.is_mobile();
        TierProfile {
            fov_degrees: if mobile { 85.0 } else { 75.0 },
            drag_sensitivity: if mobile { 0.015 } else { 0.01 },
            touch_sensitivity: 0.02,
            min_radius: if mobile { 8.0 } else { 5.0 },
            max_radius: if mobile { 150.0 } else { 100.0 },
            initial_radius: if mobile { 25.0 } else { 15.0 },
            lerp_factor: if mobile { 0.08 } else { 0.1 },
            target_fps: if mobile { 30 } else { 60 },
            pixel_ratio_cap: if mobile { 2.0 } else { 3.0 },
            fit_multiplier: match self {
                DeviceTier::Mobile => 2.0,
                DeviceTier::Tablet => 1.7,
                DeviceTier::Desktop => 1.5,
            },
            grid_size: if mobile { 10.0 } else { 20.0 },
            grid_divisions: if mobile { 10 } else { 20 },
            grid_opacity: if mobile { 0.2 } else { 0.3 },
            axis_length: if mobile { 3.0 } else { 5.0 },
            ambient_intensity: if mobile { 0.8 } else { 0.6 },
            shadows: !mobile,
        }
    }
}

/// Camera, quality, and rate constants for one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    pub fov_degrees: f32,
    /// Orbit sensitivity for pointer drags (rad per pixel).
    pub drag_sensitivity: f32,
    /// Orbit sensitivity for single-touch drags (rad per pixel).
    pub touch_sensitivity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub initial_radius: f32,
    /// Fraction of the remaining distance covered per rendered frame.
    pub lerp_factor: f32,
    pub target_fps: u32,
    pub pixel_ratio_cap: f32,
    /// Camera-fit multiplier applied to the model's bounding extent.
    pub fit_multiplier: f32,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub grid_opacity: f32,
    pub axis_length: f32,
    pub ambient_intensity: f32,
    pub shadows: bool,
}

impl TierProfile {
    /// Minimum elapsed time between rendered frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps as f64)
    }
}

/// The tier the viewer was started with, chosen once at setup.
#[derive(Debug, Clone, Copy, Resource)]
pub struct ActiveTier(pub DeviceTier);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(DeviceTier::from_width(320.0), DeviceTier::Mobile);
        assert_eq!(DeviceTier::from_width(767.0), DeviceTier::Mobile);
        assert_eq!(DeviceTier::from_width(768.0), DeviceTier::Tablet);
        assert_eq!(DeviceTier::from_width(991.0), DeviceTier::Tablet);
        assert_eq!(DeviceTier::from_width(992.0), DeviceTier::Desktop);
        assert_eq!(DeviceTier::from_width(1920.0), DeviceTier::Desktop);
    }

    #[test]
    fn test_mobile_profile_constants() {
        let profile = DeviceTier::Mobile.profile();
        assert_eq!(profile.fov_degrees, 85.0);
        assert_eq!(profile.min_radius, 8.0);
        assert_eq!(profile.max_radius, 150.0);
        assert_eq!(profile.initial_radius, 25.0);
        assert_eq!(profile.target_fps, 30);
        assert_eq!(profile.pixel_ratio_cap, 2.0);
        assert!(!profile.shadows);
    }

    #[test]
    fn test_tablet_shares_desktop_camera_constants() {
        let tablet = DeviceTier::Tablet.profile();
        let desktop = DeviceTier::Desktop.profile();
        assert_eq!(tablet.min_radius, desktop.min_radius);
        assert_eq!(tablet.max_radius, desktop.max_radius);
        assert_eq!(tablet.target_fps, desktop.target_fps);
        // Only the fit multiplier differs.
        assert_eq!(tablet.fit_multiplier, 1.7);
        assert_eq!(desktop.fit_multiplier, 1.5);
    }

    #[test]
    fn test_frame_interval() {
        let mobile = DeviceTier::Mobile.profile();
        assert_eq!(mobile.frame_interval(), Duration::from_secs_f64(1.0 / 30.0));
        let desktop = DeviceTier::Desktop.profile();
        assert!(desktop.frame_interval() < Duration::from_millis(17));
    }
}
