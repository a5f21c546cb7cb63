//! Domain models for the layered graph viewer.

mod camera;
mod graph;
mod metrics;
mod scene_file;

pub use camera::{CameraMode, CameraSnapshot, CameraView, RideExit};
pub use graph::{generate_node_id, Edge, Layer, LayerId, LayerParent, Node, DEFAULT_EDGE_WEIGHT};
pub use metrics::{LayerMetrics, NodeMetrics, SceneMetrics};
pub use scene_file::{SceneEdge, SceneFile, SceneLayer, SceneNode};
