//! The viewer scene: graph, navigation, camera and input wired together and
//! advanced one tick at a time.

use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{LayerId, LayerMetrics, NodeMetrics, SceneMetrics};

use super::camera::CameraMotionController;
use super::graph::GraphModel;
use super::interaction::{InputEvent, InteractionRouter, LabelSource, RouterContext, Viewport};
use super::navigation::NavigationController;

/// Everything the viewer simulates, independent of any renderer.
#[derive(Debug)]
pub struct Scene {
    pub graph: GraphModel,
    pub nav: NavigationController,
    pub camera: CameraMotionController,
    pub router: InteractionRouter,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Scene {
    pub fn new(config: &Config) -> Self {
        Self {
            graph: GraphModel::new(&config.layout, &config.graph),
            nav: NavigationController::new(&config.navigation),
            camera: CameraMotionController::new(&config.camera),
            router: InteractionRouter::new(config.camera.pan_speed, config.camera.orbit_sensitivity),
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.router.push(event);
    }

    /// Advance one frame.
    ///
    /// Order: queued input, camera motion, held-key pan, zoom-out trigger,
    /// drill choreography.
    pub fn tick(&mut self, dt: Duration, viewport: &dyn Viewport, labels: &mut dyn LabelSource) {
        let mut ctx = RouterContext {
            graph: &mut self.graph,
            nav: &mut self.nav,
            camera: &mut self.camera,
            viewport,
            labels,
        };
        self.router.drain(&mut ctx);

        self.camera.update(dt);
        self.router.apply_held_keys(&mut self.camera);

        if self.nav.auto_trigger(&mut self.camera) {
            debug!("Auto navigated up to {}", self.nav.current_layer());
        }
        self.router.observe_layer(self.nav.current_layer());
        self.nav.advance(&self.camera);
    }

    pub fn focus(&mut self, node: &str) -> Result<LayerId, AppError> {
        let layer = self.nav.focus(&mut self.graph, &mut self.camera, node)?;
        self.router.observe_layer(layer);
        Ok(layer)
    }

    pub fn navigate_up(&mut self) -> Option<LayerId> {
        let layer = self.nav.navigate_up(&mut self.camera)?;
        self.router.observe_layer(layer);
        Some(layer)
    }

    pub fn navigate_to_depth(&mut self, depth: usize) {
        self.nav.navigate_to_depth(&mut self.camera, depth);
        self.router.observe_layer(self.nav.current_layer());
    }

    /// Snapshot of camera, navigation and current-layer state.
    pub fn metrics(&self, viewport: &dyn Viewport) -> SceneMetrics {
        let current = self.nav.current_layer();
        let layer = self.graph.layer(current);

        let nodes: Vec<NodeMetrics> = layer
            .map(|layer| {
                layer
                    .nodes()
                    .map(|node| {
                        let world = layer.world_position(node);
                        NodeMetrics {
                            id: node.id.clone(),
                            label: node.label.clone(),
                            rank: node.rank,
                            x: node.position.x,
                            z: node.position.y,
                            world_position: world.to_array(),
                            screen_position: viewport.project(world).map(|p| p.to_array()),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let layers = self
            .graph
            .layers()
            .into_iter()
            .map(|l| LayerMetrics {
                id: l.id,
                name: l.name.clone(),
                depth: l.depth,
                visible: self.nav.is_visible(l.id),
                opacity: self.nav.layer_opacity(l.id),
            })
            .collect();

        SceneMetrics {
            camera_position: self.camera.position().to_array(),
            camera_target: self.camera.target().to_array(),
            camera_mode: self.camera.mode(),
            camera_distance: self.camera.distance(),
            ride_progress: self.camera.ride_progress(),
            current_layer_id: current,
            current_layer: layer.map(|l| l.name.clone()).unwrap_or_default(),
            root_layer_visible: self.nav.is_visible(LayerId::ROOT),
            navigation_path: self.nav.path(),
            breadcrumbs: self.nav.breadcrumbs(&self.graph),
            hovered: self.router.hovered().map(str::to_string),
            link_source: self.router.link_source().map(str::to_string),
            node_count: nodes.len(),
            nodes,
            layers,
        }
    }
}
