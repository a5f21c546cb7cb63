//! Visualization plugin for Bevy.

use bevy::prelude::*;
use std::sync::Mutex;

use super::resources::{
    BreadcrumbState, ClickTracker, LayerMaterials, Notices, RenderState, SceneRes,
    SequentialLabels,
};
use super::setup::setup_scene;
use super::systems;
use crate::services::Scene;

/// Plugin that renders and drives a [`Scene`].
///
/// The `scene` field uses `Mutex<Option<...>>` to allow moving ownership
/// into the resource during `build()` (which takes `&self`).
pub struct VisualizationPlugin {
    pub scene: Mutex<Option<Scene>>,
}

impl VisualizationPlugin {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene: Mutex::new(Some(scene)),
        }
    }
}

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        // Take ownership of the scene (moves it out, leaves None)
        let scene = self
            .scene
            .lock()
            .ok()
            .and_then(|mut scene| scene.take())
            .unwrap_or_default();

        app.insert_resource(SceneRes(scene))
            .init_resource::<SequentialLabels>()
            .init_resource::<RenderState>()
            .init_resource::<LayerMaterials>()
            .init_resource::<ClickTracker>()
            .init_resource::<Notices>()
            .init_resource::<BreadcrumbState>()
            .add_systems(Startup, setup_scene)
            .add_systems(
                Update,
                (
                    systems::collect_input_system,
                    systems::tick_scene_system,
                    systems::rebuild_geometry_system,
                    systems::apply_layer_opacity_system,
                    systems::update_hover_glow_system,
                    systems::draw_master_path_system,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    systems::update_labels_system,
                    systems::update_hud_system,
                    systems::update_breadcrumbs_system,
                    systems::breadcrumb_click_system,
                    systems::update_notices_system,
                )
                    .after(systems::draw_master_path_system),
            );
    }
}
