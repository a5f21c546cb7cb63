//! JSON scene description: nested layers of nodes and edges.
//!
//! ```json
//! {
//!   "root": {
//!     "nodes": [
//!       { "id": "ingest", "label": "Ingest",
//!         "children": { "nodes": [{ "id": "parse", "label": "Parse" }] } },
//!       { "id": "store", "label": "Store" }
//!     ],
//!     "edges": [{ "from": "ingest", "to": "store", "weight": 0.8 }]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::graph::DEFAULT_EDGE_WEIGHT;

/// A complete scene file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    pub root: SceneLayer,
}

/// Contents of one layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneLayer {
    #[serde(default)]
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub edges: Vec<SceneEdge>,
}

/// A node and, optionally, the contents of its sub-layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    /// Initial position hint; layout overwrites it.
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<SceneLayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEdge {
    pub from: String,
    pub to: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    DEFAULT_EDGE_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_file_defaults() {
        let json = r#"{
            "root": {
                "nodes": [
                    { "id": "a", "label": "A", "children": { "nodes": [{ "id": "a1", "label": "A1" }] } },
                    { "id": "b", "label": "B" }
                ],
                "edges": [{ "from": "a", "to": "b" }]
            }
        }"#;
        let scene: SceneFile = serde_json::from_str(json).unwrap();
        assert_eq!(scene.root.nodes.len(), 2);
        assert_eq!(scene.root.edges[0].weight, DEFAULT_EDGE_WEIGHT);
        let children = scene.root.nodes[0].children.as_ref().unwrap();
        assert_eq!(children.nodes[0].id, "a1");
        assert!(children.edges.is_empty());
        assert!(scene.root.nodes[1].children.is_none());
    }
}
