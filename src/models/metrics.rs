//! Read-only scene snapshot for automated verification and HUD display.

use serde::Serialize;

use super::camera::CameraMode;
use super::graph::LayerId;

/// Snapshot of camera, navigation and current-layer state.
#[derive(Debug, Clone, Serialize)]
pub struct SceneMetrics {
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    pub camera_mode: CameraMode,
    /// Distance between camera and look-at target (the zoom level).
    pub camera_distance: f32,
    pub ride_progress: f32,
    pub current_layer_id: LayerId,
    pub current_layer: String,
    pub root_layer_visible: bool,
    /// Layers from the root down to the current one.
    pub navigation_path: Vec<LayerId>,
    /// Labels for breadcrumb display, starting with "Root".
    pub breadcrumbs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_source: Option<String>,
    pub node_count: usize,
    pub nodes: Vec<NodeMetrics>,
    pub layers: Vec<LayerMetrics>,
}

/// Per-node positions of the current layer.
#[derive(Debug, Clone, Serialize)]
pub struct NodeMetrics {
    pub id: String,
    pub label: String,
    pub rank: u32,
    pub x: f32,
    pub z: f32,
    pub world_position: [f32; 3],
    /// Viewport position, when the renderer can project it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_position: Option<[f32; 2]>,
}

/// Visibility flags of every layer.
#[derive(Debug, Clone, Serialize)]
pub struct LayerMetrics {
    pub id: LayerId,
    pub name: String,
    pub depth: usize,
    pub visible: bool,
    pub opacity: f32,
}
