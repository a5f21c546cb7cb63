//! Layered graph model: nodes, edges and the layers that own them.

use std::collections::HashMap;
use std::fmt;

use bevy::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::AppError;

/// Edge weight used when the caller does not specify one.
pub const DEFAULT_EDGE_WEIGHT: f32 = 0.5;

/// Handle to a layer stored in a [`GraphModel`](crate::services::GraphModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u32);

impl LayerId {
    /// The implicit root layer.
    pub const ROOT: LayerId = LayerId(0);
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A node in one layer.
#[derive(Debug, Clone)]
pub struct Node {
    /// Identifier, unique within the owning layer.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Layer-of-the-DAG assigned by the layout engine.
    pub rank: u32,
    /// Logical `(x, z)` position on the layer plane.
    pub position: Vec2,
    /// Private child layer, created on first drill-down.
    pub sub_layer: Option<LayerId>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, x: f32, z: f32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            rank: 0,
            position: Vec2::new(x, z),
            sub_layer: None,
        }
    }
}

/// A directed edge between two nodes of the same layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Visual emphasis in `[0, 1]`. Has no effect on layout.
    pub weight: f32,
}

/// The node owning a sub-layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerParent {
    pub layer: LayerId,
    pub node: String,
}

/// A self-contained arrangement of nodes and edges.
///
/// Visibility is not stored here; it is derived from navigation state.
#[derive(Debug, Clone)]
pub struct Layer {
    pub id: LayerId,
    /// `"root"` or `"<owner node id>_sub"`.
    pub name: String,
    /// Owning node, `None` for the root.
    pub parent: Option<LayerParent>,
    /// World-space `(x, z)` anchor, fixed at creation.
    pub origin: Vec2,
    /// World-space height of the layer plane, fixed at creation.
    pub vertical_offset: f32,
    /// Nesting depth, 0 for the root.
    pub depth: usize,
    nodes: HashMap<String, Node>,
    order: Vec<String>,
    edges: Vec<Edge>,
}

impl Layer {
    /// Create the root layer.
    pub fn root() -> Self {
        Self::new(LayerId::ROOT, "root", None, Vec2::ZERO, 0.0, 0)
    }

    pub fn new(
        id: LayerId,
        name: impl Into<String>,
        parent: Option<LayerParent>,
        origin: Vec2,
        vertical_offset: f32,
        depth: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            origin,
            vertical_offset,
            depth,
            nodes: HashMap::new(),
            order: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> &[String] {
        &self.order
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    /// World-space position of a node of this layer.
    pub fn world_position(&self, node: &Node) -> Vec3 {
        Vec3::new(
            self.origin.x + node.position.x,
            self.vertical_offset,
            self.origin.y + node.position.y,
        )
    }

    /// Insert a node, rejecting duplicate ids.
    pub fn insert_node(&mut self, node: Node) -> Result<(), AppError> {
        if self.nodes.contains_key(&node.id) {
            return Err(AppError::DuplicateId {
                layer: self.id,
                id: node.id,
            });
        }
        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Insert an edge. Returns `false` for self-loops and duplicates.
    pub fn insert_edge(&mut self, from: &str, to: &str, weight: f32) -> Result<bool, AppError> {
        if from == to {
            return Ok(false);
        }
        for id in [from, to] {
            if !self.nodes.contains_key(id) {
                return Err(AppError::UnknownNode {
                    layer: self.id,
                    id: id.to_string(),
                });
            }
        }
        if self.has_edge(from, to) {
            return Ok(false);
        }
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            weight: if weight.is_finite() {
                weight.clamp(0.0, 1.0)
            } else {
                DEFAULT_EDGE_WEIGHT
            },
        });
        Ok(true)
    }

    /// Remove a node together with its incident edges.
    pub fn take_node(&mut self, id: &str) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        self.order.retain(|n| n != id);
        self.edges.retain(|e| e.from != id && e.to != id);
        Some(node)
    }
}

/// Generates an id for an interactively created node.
pub fn generate_node_id() -> String {
    format!("n_{}", Ulid::new().to_string().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_with(ids: &[&str]) -> Layer {
        let mut layer = Layer::root();
        for id in ids {
            layer.insert_node(Node::new(*id, *id, 0.0, 0.0)).unwrap();
        }
        layer
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut layer = layer_with(&["a"]);
        let err = layer.insert_node(Node::new("a", "again", 1.0, 1.0));
        assert!(matches!(err, Err(AppError::DuplicateId { .. })));
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.node("a").unwrap().label, "a");
    }

    #[test]
    fn test_edge_insertion_is_idempotent() {
        let mut layer = layer_with(&["a", "b"]);
        assert!(layer.insert_edge("a", "b", 0.5).unwrap());
        assert!(!layer.insert_edge("a", "b", 0.9).unwrap());
        assert_eq!(layer.edges().len(), 1);
        assert_eq!(layer.edges()[0].weight, 0.5);
    }

    #[test]
    fn test_self_loop_ignored() {
        let mut layer = layer_with(&["a"]);
        assert!(!layer.insert_edge("a", "a", 0.5).unwrap());
        assert!(layer.edges().is_empty());
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let mut layer = layer_with(&["a"]);
        let err = layer.insert_edge("a", "ghost", 0.5);
        match err {
            Err(AppError::UnknownNode { id, .. }) => assert_eq!(id, "ghost"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(layer.edges().is_empty());
    }

    #[test]
    fn test_weight_clamped() {
        let mut layer = layer_with(&["a", "b"]);
        layer.insert_edge("a", "b", 3.0).unwrap();
        assert_eq!(layer.edges()[0].weight, 1.0);
    }

    #[test]
    fn test_non_finite_weight_falls_back_to_default() {
        let mut layer = layer_with(&["a", "b", "c"]);
        layer.insert_edge("a", "b", f32::NAN).unwrap();
        layer.insert_edge("b", "c", f32::INFINITY).unwrap();
        for edge in layer.edges() {
            assert_eq!(edge.weight, DEFAULT_EDGE_WEIGHT);
        }
    }

    #[test]
    fn test_take_node_drops_incident_edges() {
        let mut layer = layer_with(&["a", "b", "c"]);
        layer.insert_edge("a", "b", 0.5).unwrap();
        layer.insert_edge("b", "c", 0.5).unwrap();
        layer.insert_edge("a", "c", 0.5).unwrap();

        let removed = layer.take_node("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(layer.edges().len(), 1);
        assert!(layer.has_edge("a", "c"));
        assert_eq!(layer.node_ids(), &["a".to_string(), "c".to_string()]);
        assert!(layer.take_node("b").is_none());
    }

    #[test]
    fn test_nodes_iterate_in_insertion_order() {
        let layer = layer_with(&["z", "a", "m"]);
        let ids: Vec<&str> = layer.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_world_position_uses_layer_anchor() {
        let mut layer = Layer::new(LayerId(3), "n_sub", None, Vec2::new(10.0, -4.0), -20.0, 1);
        layer.insert_node(Node::new("a", "A", 2.0, 1.5)).unwrap();
        let pos = layer.world_position(layer.node("a").unwrap());
        assert_eq!(pos, Vec3::new(12.0, -20.0, -2.5));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_node_id();
        let b = generate_node_id();
        assert!(a.starts_with("n_"));
        assert_ne!(a, b);
    }
}
