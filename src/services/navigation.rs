//! Layer navigation: the drill-down stack, derived visibility and the
//! per-tick drill choreography.

use bevy::math::Vec3;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{DrillMotion, NavigationConfig};
use crate::error::AppError;
use crate::models::{CameraSnapshot, CameraView, LayerId};

use super::camera::CameraMotionController;
use super::graph::GraphModel;

/// Opacity at which a fading layer counts as fully shown.
const FADE_DONE: f32 = 0.99;

/// One drill-down: where we came from and the node we entered.
#[derive(Debug, Clone)]
pub struct NavEntry {
    pub layer: LayerId,
    pub camera: CameraSnapshot,
    pub node: String,
}

/// Stage of the layer swap animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Choreography {
    #[default]
    Idle,
    /// Camera is flying toward the sub-layer.
    ZoomingIn,
    /// Layer content switches this tick.
    Swapping,
    /// Current layer opacity eases toward 1.
    FadingIn,
}

#[derive(Debug, Clone)]
struct Preview {
    node: String,
    layer: LayerId,
}

/// Owns the current layer and the navigation stack.
#[derive(Debug, Clone)]
pub struct NavigationController {
    config: NavigationConfig,
    stack: Vec<NavEntry>,
    current: LayerId,
    /// Nodes exited by `navigate_up`, most recent last.
    forward: Vec<String>,
    preview: Option<Preview>,
    choreography: Choreography,
    opacity: f32,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(&NavigationConfig::default())
    }
}

impl NavigationController {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            config: config.clone(),
            stack: Vec::new(),
            current: LayerId::ROOT,
            forward: Vec::new(),
            preview: None,
            choreography: Choreography::Idle,
            opacity: 1.0,
        }
    }

    pub fn current_layer(&self) -> LayerId {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[NavEntry] {
        &self.stack
    }

    pub fn choreography(&self) -> Choreography {
        self.choreography
    }

    pub fn drill_motion(&self) -> DrillMotion {
        self.config.drill_motion
    }

    pub fn set_drill_motion(&mut self, motion: DrillMotion) {
        self.config.drill_motion = motion;
    }

    /// Node whose sub-layer is being previewed.
    pub fn preview_node(&self) -> Option<&str> {
        self.preview.as_ref().map(|p| p.node.as_str())
    }

    pub fn preview_layer(&self) -> Option<LayerId> {
        self.preview.as_ref().map(|p| p.layer)
    }

    /// Drill into the sub-layer of a node of the current layer.
    ///
    /// Clears the retrace history.
    pub fn focus(
        &mut self,
        graph: &mut GraphModel,
        camera: &mut CameraMotionController,
        node: &str,
    ) -> Result<LayerId, AppError> {
        let sub = self.descend(graph, camera, node)?;
        self.forward.clear();
        Ok(sub)
    }

    fn descend(
        &mut self,
        graph: &mut GraphModel,
        camera: &mut CameraMotionController,
        node: &str,
    ) -> Result<LayerId, AppError> {
        if self.stack.len() >= self.config.max_depth {
            warn!("Drill into {} rejected at depth {}", node, self.stack.len());
            return Err(AppError::MaxDepthExceeded {
                max: self.config.max_depth,
            });
        }
        let from = self.current;
        let world = graph
            .world_position(from, node)
            .ok_or_else(|| AppError::UnknownNode {
                layer: from,
                id: node.to_string(),
            })?;

        let sub = graph.ensure_sub_layer(from, node)?;
        let floor = graph
            .layer(sub)
            .map(|l| l.vertical_offset)
            .ok_or(AppError::UnknownLayer(sub))?;

        self.stack.push(NavEntry {
            layer: from,
            camera: camera.snapshot(),
            node: node.to_string(),
        });
        self.current = sub;
        self.preview = None;
        self.choreography = Choreography::ZoomingIn;
        self.opacity = 0.0;

        let view = self.drill_view(world, floor);
        match self.config.drill_motion {
            DrillMotion::Flythrough => camera.animate_to(view),
            DrillMotion::Transition => camera.transition_to(view.position, view.target),
            DrillMotion::Ride => camera.ride_towards(view.position),
        }

        info!(
            "Focused node {} ({} -> {}, depth {})",
            node,
            from,
            sub,
            self.stack.len()
        );
        Ok(sub)
    }

    /// Destination for drilling into a node at `world` whose sub-layer sits at `floor`.
    fn drill_view(&self, world: Vec3, floor: f32) -> CameraView {
        CameraView {
            position: Vec3::new(
                world.x,
                floor + self.config.view_offset_up,
                world.z + self.config.view_offset_back,
            ),
            target: Vec3::new(world.x, floor, world.z),
            via: Some(world),
        }
    }

    /// Return to the parent layer and its saved camera. No-op at the root.
    pub fn navigate_up(&mut self, camera: &mut CameraMotionController) -> Option<LayerId> {
        let entry = self.stack.pop()?;
        let left = self.current;
        self.current = entry.layer;
        self.preview = None;
        camera.restore(&entry.camera);
        self.forward.push(entry.node);

        self.choreography = Choreography::FadingIn;
        self.opacity = 0.0;
        info!("Navigated up {} -> {} (depth {})", left, self.current, self.stack.len());
        Some(self.current)
    }

    /// Re-enter the sub-layer most recently exited.
    ///
    /// Returns `Ok(None)` when there is nothing to retrace.
    pub fn retrace(
        &mut self,
        graph: &mut GraphModel,
        camera: &mut CameraMotionController,
    ) -> Result<Option<LayerId>, AppError> {
        let Some(node) = self.forward.pop() else {
            return Ok(None);
        };
        if graph.node(self.current, &node).is_none() {
            debug!("Retrace target {} is gone; history cleared", node);
            self.forward.clear();
            return Ok(None);
        }
        match self.descend(graph, camera, &node) {
            Ok(sub) => Ok(Some(sub)),
            Err(err) => {
                self.forward.push(node);
                Err(err)
            }
        }
    }

    /// Pop until the stack is `depth` entries deep.
    pub fn navigate_to_depth(&mut self, camera: &mut CameraMotionController, depth: usize) {
        while self.stack.len() > depth {
            if self.navigate_up(camera).is_none() {
                break;
            }
        }
    }

    /// Pop a layer when the user has zoomed far out of a sub-layer.
    ///
    /// Runs after the camera update. Autonomous camera motion suppresses it.
    pub fn auto_trigger(&mut self, camera: &mut CameraMotionController) -> bool {
        if self.stack.is_empty() || camera.is_animating() {
            return false;
        }
        if camera.distance() <= self.config.zoom_out_threshold {
            return false;
        }
        debug!("Zoom-out threshold crossed at distance {:.1}", camera.distance());
        self.navigate_up(camera).is_some()
    }

    /// Step the drill choreography once.
    pub fn advance(&mut self, camera: &CameraMotionController) {
        self.choreography = match self.choreography {
            Choreography::Idle => Choreography::Idle,
            Choreography::ZoomingIn => {
                if !camera.is_animating() || camera.motion_progress() >= self.config.swap_at {
                    Choreography::Swapping
                } else {
                    Choreography::ZoomingIn
                }
            }
            Choreography::Swapping => Choreography::FadingIn,
            Choreography::FadingIn => {
                self.opacity += (1.0 - self.opacity) * self.config.fade_rate;
                if self.opacity > FADE_DONE {
                    self.opacity = 1.0;
                    Choreography::Idle
                } else {
                    Choreography::FadingIn
                }
            }
        };
    }

    /// Preview the sub-layer of a hovered node, if it has one.
    pub fn set_preview(&mut self, graph: &GraphModel, node: &str) {
        let layer = graph.node(self.current, node).and_then(|n| n.sub_layer);
        self.preview = layer.map(|layer| Preview {
            node: node.to_string(),
            layer,
        });
    }

    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    /// A layer is visible when it is current or the previewed sub-layer.
    pub fn is_visible(&self, layer: LayerId) -> bool {
        layer == self.current || self.preview_layer() == Some(layer)
    }

    /// Render opacity of a layer.
    pub fn layer_opacity(&self, layer: LayerId) -> f32 {
        if layer == self.current {
            self.opacity
        } else if self.preview_layer() == Some(layer) {
            self.config.preview_opacity
        } else {
            0.0
        }
    }

    /// Layers from the root down to the current one.
    pub fn path(&self) -> Vec<LayerId> {
        self.stack
            .iter()
            .map(|e| e.layer)
            .chain(std::iter::once(self.current))
            .collect()
    }

    /// "Root" followed by the label of every focused node.
    pub fn breadcrumbs(&self, graph: &GraphModel) -> Vec<String> {
        std::iter::once("Root".to_string())
            .chain(self.stack.iter().map(|entry| {
                graph
                    .node(entry.layer, &entry.node)
                    .map(|n| n.label.clone())
                    .unwrap_or_else(|| entry.node.clone())
            }))
            .collect()
    }

    /// Drop references to layers that no longer exist.
    pub fn forget_layers(&mut self, dropped: &[LayerId], camera: &mut CameraMotionController) {
        if dropped.is_empty() {
            return;
        }
        if self.preview_layer().is_some_and(|l| dropped.contains(&l)) {
            self.preview = None;
        }
        while dropped.contains(&self.current) {
            if self.navigate_up(camera).is_none() {
                break;
            }
        }
        self.forward.clear();
    }
}
