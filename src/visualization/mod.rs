//! 3D Graph Visualization Module
//!
//! Renders a [`Scene`] with Bevy: one ground plane, node boxes and weighted
//! edges per visible layer, plus a status panel and clickable breadcrumbs.
//!
//! ## Module Structure
//!
//! - `components` - ECS components for layer geometry, labels and UI
//! - `resources` - ECS resources wrapping the scene and render caches
//! - `systems` - ECS systems (input, scene tick, rendering, UI)
//! - `viewport` - Picking and projection through the Bevy camera
//! - `setup` - Scene initialization
//! - `plugin` - Bevy plugin definition
//! - `constants` - Colors, sizes, and other constants

mod components;
mod constants;
mod plugin;
mod resources;
mod setup;
mod systems;
mod viewport;

pub use plugin::VisualizationPlugin;
pub use viewport::CameraViewport;

use bevy::prelude::*;
use tracing::info;

use crate::config::ViewerConfig;
use crate::services::Scene;
use constants::COLOR_BACKGROUND;

/// Run the viewer on a prepared scene.
///
/// This spawns a Bevy window and blocks until the window is closed.
pub fn run_visualizer(scene: Scene, viewer: &ViewerConfig) {
    info!("Opening viewer with {} layers", scene.graph.layer_count());

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: viewer.title.clone(),
                        resolution: (viewer.width, viewer.height).into(),
                        ..default()
                    }),
                    ..default()
                })
                // The binary installs its own tracing subscriber
                .disable::<bevy::log::LogPlugin>(),
        )
        .insert_resource(ClearColor(COLOR_BACKGROUND))
        .add_plugins(VisualizationPlugin::new(scene))
        .run();
}
