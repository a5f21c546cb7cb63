//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/strata/config.toml` (XDG) or platform config dir
//! 2. Project config: `.strata.toml`
//! 3. Environment variables: `STRATA_*`, sections separated by `__`
//!    (e.g. `STRATA_CAMERA__LERP_FACTOR=0.2`)
//!
//! Every key is optional. Missing keys fall back to the defaults below, which
//! are the tuned policy constants of the viewer.
//!
//! # Example
//!
//! ```toml
//! [layout]
//! rank_spacing = 6.0
//!
//! [graph]
//! placeholder_children = ["Alpha", "Beta", "Gamma"]
//!
//! [navigation]
//! max_depth = 8
//! drill_motion = "ride"
//!
//! [camera]
//! flythrough_duration_ms = 1500
//! ```

use std::ops::Deref;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub graph: GraphConfig,
    pub navigation: NavigationConfig,
    pub camera: CameraConfig,
    pub viewer: ViewerConfig,
}

/// Rank layout spacing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance along x between consecutive ranks.
    pub rank_spacing: f32,
    /// Distance along z between nodes sharing a rank.
    pub node_spacing: f32,
    /// Relaxation pass cap. Cyclic edge sets freeze here.
    pub max_iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rank_spacing: 5.0,
            node_spacing: 3.0,
            max_iterations: 100,
        }
    }
}

/// Layer nesting parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Vertical drop between a layer and its sub-layers.
    pub layer_separation: f32,
    /// Labels of chained nodes seeded into every freshly created sub-layer.
    pub placeholder_children: Vec<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            layer_separation: 20.0,
            placeholder_children: Vec::new(),
        }
    }
}

/// Camera motion used when drilling into a sub-layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DrillMotion {
    /// Curved flight through the focused node.
    #[default]
    Flythrough,
    /// Straight exponential ease to the destination.
    Transition,
    /// Extend the master path and let the wheel drive the camera.
    Ride,
}

/// Navigation stack policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Maximum number of nested drill-downs.
    pub max_depth: usize,
    /// Camera-to-target distance above which the viewer pops a layer.
    pub zoom_out_threshold: f32,
    pub drill_motion: DrillMotion,
    /// Height of the drill destination eye above the sub-layer.
    pub view_offset_up: f32,
    /// Distance of the drill destination eye behind the focused node.
    pub view_offset_back: f32,
    /// Camera motion progress at which the layer content swaps.
    pub swap_at: f32,
    /// Per-tick opacity easing while a layer fades in.
    pub fade_rate: f32,
    /// Opacity of a hover-previewed sub-layer.
    pub preview_opacity: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_depth: 12,
            zoom_out_threshold: 60.0,
            drill_motion: DrillMotion::default(),
            view_offset_up: 20.0,
            view_offset_back: 20.0,
            swap_at: 0.5,
            fade_rate: 0.1,
            preview_opacity: 0.5,
        }
    }
}

/// Camera motion constants.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub start_position: [f32; 3],
    pub start_target: [f32; 3],
    /// Per-tick interpolation factor of linear transitions.
    pub lerp_factor: f32,
    /// Distance under which a transition counts as arrived.
    pub stopping_threshold: f32,
    pub flythrough_duration_ms: u64,
    /// Per-tick interpolation of the look-at target during a fly-through.
    pub flythrough_target_lerp: f32,
    /// Progress offset sampled ahead of the rider to aim the camera.
    pub ride_lookahead: f32,
    /// Height of the rider's eye above the path.
    pub ride_eye_lift: f32,
    /// Ride progress per unit of wheel delta.
    pub ride_sensitivity: f32,
    /// Height of the bulge of each drill segment on the master path.
    pub transition_curviness: f32,
    /// Fraction of pending orbit input applied per tick.
    pub damping_factor: f32,
    /// Distance scale per wheel notch while orbiting.
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pan distance per tick while a movement key is held.
    pub pan_speed: f32,
    /// Radians of orbit per pixel of drag.
    pub orbit_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 30.0, 40.0],
            start_target: [0.0, 0.0, 0.0],
            lerp_factor: 0.15,
            stopping_threshold: 0.1,
            flythrough_duration_ms: 2000,
            flythrough_target_lerp: 0.1,
            ride_lookahead: 0.02,
            ride_eye_lift: 0.5,
            ride_sensitivity: 0.0005,
            transition_curviness: 10.0,
            damping_factor: 0.05,
            zoom_step: 0.95,
            min_distance: 2.0,
            max_distance: 100.0,
            pan_speed: 0.5,
            orbit_sensitivity: 0.01,
        }
    }
}

/// Window settings for the 3D viewer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Seed of the demo graph shown when no scene file is given.
    pub demo_seed: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Strata DAG Visualizer".to_string(),
            width: 1280.0,
            height: 720.0,
            demo_seed: 7,
        }
    }
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// The layered figment backing [`Config::load`].
    pub fn figment() -> Figment {
        let user_config = Self::user_config_path();

        Figment::new()
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(user_config))
            // Layer 2: Project config
            .merge(Toml::file(".strata.toml"))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("STRATA_").split("__"))
    }

    /// User config path: ~/.config/strata/config.toml (XDG) or platform config dir.
    fn user_config_path() -> std::path::PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("strata").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("strata").join("config.toml"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults_match_policy_constants() {
        let config = Config::default();
        assert_eq!(config.layout.rank_spacing, 5.0);
        assert_eq!(config.layout.max_iterations, 100);
        assert_eq!(config.navigation.max_depth, 12);
        assert_eq!(config.navigation.zoom_out_threshold, 60.0);
        assert_eq!(config.camera.stopping_threshold, 0.1);
        assert_eq!(config.camera.flythrough_duration_ms, 2000);
        assert_eq!(config.navigation.drill_motion, DrillMotion::Flythrough);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = Figment::new()
            .merge(Toml::string(
                r#"
                [layout]
                rank_spacing = 8.0

                [navigation]
                drill_motion = "ride"
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!(config.layout.rank_spacing, 8.0);
        assert_eq!(config.layout.node_spacing, 3.0);
        assert_eq!(config.navigation.drill_motion, DrillMotion::Ride);
        assert_eq!(config.navigation.max_depth, 12);
    }

    #[test]
    #[serial]
    fn test_env_overrides_nested_keys() {
        std::env::set_var("STRATA_CAMERA__LERP_FACTOR", "0.25");
        let config: Config = Figment::new()
            .merge(Env::prefixed("STRATA_").split("__"))
            .extract()
            .unwrap();
        std::env::remove_var("STRATA_CAMERA__LERP_FACTOR");

        assert_eq!(config.camera.lerp_factor, 0.25);
        assert_eq!(config.camera.pan_speed, 0.5);
    }
}
