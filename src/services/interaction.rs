//! Input routing: turns queued pointer, key and wheel events into graph,
//! navigation and camera operations.

use std::collections::{HashSet, VecDeque};

use bevy::math::{Vec2, Vec3};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::{generate_node_id, LayerId, RideExit, DEFAULT_EDGE_WEIGHT};

use super::camera::CameraMotionController;
use super::graph::GraphModel;
use super::navigation::NavigationController;

/// Pick radius of a node around its world position.
pub const NODE_PICK_RADIUS: f32 = 1.0;

/// Half the side of the square ground plane of a layer.
pub const GROUND_HALF_EXTENT: f32 = 50.0;

/// Keys the router understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Delete,
    Backspace,
}

/// A user input event, in viewport pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMove { position: Vec2 },
    /// `modifier` is the link-mode modifier (Ctrl or Cmd).
    Click { position: Vec2, modifier: bool },
    DoubleClick { position: Vec2 },
    KeyDown(Key),
    KeyUp(Key),
    /// Positive `delta_y` scrolls out.
    Wheel { delta_y: f32 },
    /// Pointer movement while the orbit button is held.
    OrbitDrag { delta: Vec2 },
    /// Leave the current layer (Escape).
    NavigateUp,
    /// Pop back to a stack depth (breadcrumbs).
    NavigateToDepth { depth: usize },
}

/// A pickable node.
#[derive(Debug, Clone, PartialEq)]
pub struct PickCandidate {
    pub id: String,
    pub center: Vec3,
    pub radius: f32,
}

/// Horizontal square a layer's nodes sit on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub center: Vec3,
    pub half_extent: f32,
}

/// Screen-space queries answered by the renderer.
pub trait Viewport {
    /// The nearest candidate under the pointer.
    fn pick(&self, pointer: Vec2, candidates: &[PickCandidate]) -> Option<String>;

    /// Where the pointer ray meets the plane, if inside it.
    fn pick_ground(&self, pointer: Vec2, plane: &GroundPlane) -> Option<Vec3>;

    /// Viewport position of a world point.
    fn project(&self, _world: Vec3) -> Option<Vec2> {
        None
    }
}

/// Prompts the user for a node label.
pub trait LabelSource {
    /// `None` when the prompt was cancelled.
    fn request_label(&mut self) -> Option<String>;
}

/// Collaborators the router operates on during one drain.
pub struct RouterContext<'a> {
    pub graph: &'a mut GraphModel,
    pub nav: &'a mut NavigationController,
    pub camera: &'a mut CameraMotionController,
    pub viewport: &'a dyn Viewport,
    pub labels: &'a mut dyn LabelSource,
}

/// Queues input and applies it once per tick.
#[derive(Debug)]
pub struct InteractionRouter {
    queue: VecDeque<InputEvent>,
    hovered: Option<String>,
    link_source: Option<String>,
    held: HashSet<Key>,
    notices: Vec<String>,
    layer: LayerId,
    pan_speed: f32,
    orbit_sensitivity: f32,
}

impl Default for InteractionRouter {
    fn default() -> Self {
        let camera = crate::config::CameraConfig::default();
        Self::new(camera.pan_speed, camera.orbit_sensitivity)
    }
}

impl InteractionRouter {
    pub fn new(pan_speed: f32, orbit_sensitivity: f32) -> Self {
        Self {
            queue: VecDeque::new(),
            hovered: None,
            link_source: None,
            held: HashSet::new(),
            notices: Vec::new(),
            layer: LayerId::ROOT,
            pan_speed,
            orbit_sensitivity,
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn link_source(&self) -> Option<&str> {
        self.link_source.as_deref()
    }

    /// Drain user-facing rejection messages.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, err: AppError) {
        warn!("{}", err);
        self.notices.push(err.to_string());
    }

    /// Forget per-layer selection state when the current layer changed.
    pub fn observe_layer(&mut self, current: LayerId) {
        if current != self.layer {
            self.layer = current;
            self.hovered = None;
            if self.link_source.take().is_some() {
                debug!("Link source cleared on layer change");
            }
        }
    }

    /// Apply every queued event in arrival order.
    pub fn drain(&mut self, ctx: &mut RouterContext<'_>) {
        self.observe_layer(ctx.nav.current_layer());
        while let Some(event) = self.queue.pop_front() {
            self.handle(ctx, event);
            self.observe_layer(ctx.nav.current_layer());
        }
    }

    /// Pan once for every held movement key.
    pub fn apply_held_keys(&self, camera: &mut CameraMotionController) {
        let speed = self.pan_speed;
        for key in &self.held {
            match key {
                Key::W => camera.pan(0.0, speed),
                Key::S => camera.pan(0.0, -speed),
                Key::A => camera.pan(-speed, 0.0),
                Key::D => camera.pan(speed, 0.0),
                Key::Delete | Key::Backspace => {}
            }
        }
    }

    fn handle(&mut self, ctx: &mut RouterContext<'_>, event: InputEvent) {
        match event {
            InputEvent::PointerMove { position } => self.hover(ctx, position),
            InputEvent::Click { position, modifier } => {
                let Some(hit) = pick_node(ctx, position) else {
                    return;
                };
                if modifier {
                    self.link(ctx, hit);
                } else if let Err(err) = ctx.nav.focus(ctx.graph, ctx.camera, &hit) {
                    self.notify(err);
                }
            }
            InputEvent::DoubleClick { position } => self.create_node(ctx, position),
            InputEvent::KeyDown(key @ (Key::Delete | Key::Backspace)) => {
                self.held.remove(&key);
                self.delete_hovered(ctx);
            }
            InputEvent::KeyDown(key) => {
                self.held.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
            InputEvent::Wheel { delta_y } => match ctx.camera.scroll(delta_y) {
                Some(RideExit::Start) => {
                    if ctx.nav.navigate_up(ctx.camera).is_none() {
                        debug!("Ride start reached at the root");
                    }
                }
                Some(RideExit::End) => match ctx.nav.retrace(ctx.graph, ctx.camera) {
                    Ok(Some(layer)) => debug!("Ride end retraced into {}", layer),
                    Ok(None) => {}
                    Err(err) => self.notify(err),
                },
                None => {}
            },
            InputEvent::OrbitDrag { delta } => ctx.camera.orbit(
                -delta.x * self.orbit_sensitivity,
                -delta.y * self.orbit_sensitivity,
            ),
            InputEvent::NavigateUp => {
                if ctx.nav.navigate_up(ctx.camera).is_none() {
                    debug!("Already at the root");
                }
            }
            InputEvent::NavigateToDepth { depth } => ctx.nav.navigate_to_depth(ctx.camera, depth),
        }
    }

    fn hover(&mut self, ctx: &mut RouterContext<'_>, position: Vec2) {
        let hit = pick_node(ctx, position);
        if hit == self.hovered {
            return;
        }
        match &hit {
            Some(id) => {
                debug!("Hover: {}", id);
                ctx.nav.set_preview(ctx.graph, id);
            }
            None => ctx.nav.clear_preview(),
        }
        self.hovered = hit;
    }

    fn link(&mut self, ctx: &mut RouterContext<'_>, hit: String) {
        let layer = ctx.nav.current_layer();
        match self.link_source.take() {
            None => {
                info!("Link source selected: {}", hit);
                self.link_source = Some(hit);
            }
            Some(source) if source == hit => {
                debug!("Link source {} deselected", source);
            }
            Some(source) => match ctx.graph.add_edge(layer, &source, &hit, DEFAULT_EDGE_WEIGHT) {
                Ok(true) => info!("Linked {} -> {}", source, hit),
                Ok(false) => debug!("Edge {} -> {} already present", source, hit),
                Err(err) => self.notify(err),
            },
        }
    }

    fn create_node(&mut self, ctx: &mut RouterContext<'_>, position: Vec2) {
        if pick_node(ctx, position).is_some() {
            return;
        }
        let layer_id = ctx.nav.current_layer();
        let Some(layer) = ctx.graph.layer(layer_id) else {
            return;
        };
        let origin = layer.origin;
        let plane = GroundPlane {
            center: Vec3::new(origin.x, layer.vertical_offset, origin.y),
            half_extent: GROUND_HALF_EXTENT,
        };
        let Some(ground) = ctx.viewport.pick_ground(position, &plane) else {
            return;
        };

        let label = match ctx.labels.request_label() {
            Some(label) if !label.trim().is_empty() => label.trim().to_string(),
            _ => {
                debug!("Node creation cancelled");
                return;
            }
        };

        let id = generate_node_id();
        let (x, z) = (ground.x - origin.x, ground.z - origin.y);
        match ctx.graph.add_node(layer_id, &id, &label, x, z) {
            Ok(_) => info!("Created node {} \"{}\" in {}", id, label, layer_id),
            Err(err) => self.notify(err),
        }
    }

    fn delete_hovered(&mut self, ctx: &mut RouterContext<'_>) {
        let Some(id) = self.hovered.take() else {
            return;
        };
        ctx.nav.clear_preview();
        if self.link_source.as_deref() == Some(id.as_str()) {
            self.link_source = None;
        }
        match ctx.graph.remove_node(ctx.nav.current_layer(), &id) {
            Ok(Some(removal)) => ctx.nav.forget_layers(&removal.dropped_layers, ctx.camera),
            Ok(None) => {}
            Err(err) => self.notify(err),
        }
    }
}

/// Pick among the nodes of the current layer.
fn pick_node(ctx: &RouterContext<'_>, pointer: Vec2) -> Option<String> {
    let layer = ctx.graph.layer(ctx.nav.current_layer())?;
    let candidates: Vec<PickCandidate> = layer
        .nodes()
        .map(|node| PickCandidate {
            id: node.id.clone(),
            center: layer.world_position(node),
            radius: NODE_PICK_RADIUS,
        })
        .collect();
    ctx.viewport
        .pick(pointer, &candidates)
        .filter(|id| layer.contains(id))
}
