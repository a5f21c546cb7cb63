//! Graph model: the arena of layers and their scoped mutations.

use std::collections::HashMap;

use bevy::math::{Vec2, Vec3};
use tracing::{debug, info};

use crate::config::{GraphConfig, LayoutConfig};
use crate::error::AppError;
use crate::models::{Layer, LayerId, LayerParent, Node};

use super::layout::{LayoutEngine, LayoutReport};

/// Result of removing a node.
#[derive(Debug, Clone)]
pub struct Removal {
    pub node: Node,
    /// Sub-layers destroyed along with the node, outermost first.
    pub dropped_layers: Vec<LayerId>,
}

/// Owns every layer. Nodes own their sub-layer through a [`LayerId`] handle.
///
/// Every structural mutation re-runs layout on the mutated layer only and
/// bumps [`GraphModel::revision`].
#[derive(Debug, Clone)]
pub struct GraphModel {
    layers: HashMap<LayerId, Layer>,
    next_layer: u32,
    layout: LayoutEngine,
    layer_separation: f32,
    placeholder_children: Vec<String>,
    revision: u64,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new(&LayoutConfig::default(), &GraphConfig::default())
    }
}

impl GraphModel {
    pub fn new(layout: &LayoutConfig, graph: &GraphConfig) -> Self {
        let mut layers = HashMap::new();
        layers.insert(LayerId::ROOT, Layer::root());
        Self {
            layers,
            next_layer: 1,
            layout: LayoutEngine::new(layout),
            layer_separation: graph.layer_separation,
            placeholder_children: graph.placeholder_children.clone(),
            revision: 0,
        }
    }

    pub fn root(&self) -> LayerId {
        LayerId::ROOT
    }

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Counter bumped by every structural mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer, AppError> {
        self.layers.get_mut(&id).ok_or(AppError::UnknownLayer(id))
    }

    /// All layers, ordered by id.
    pub fn layers(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.layers.values().collect();
        layers.sort_by_key(|l| l.id);
        layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn node(&self, layer: LayerId, id: &str) -> Option<&Node> {
        self.layer(layer)?.node(id)
    }

    /// World-space position of a node.
    pub fn world_position(&self, layer: LayerId, id: &str) -> Option<Vec3> {
        let layer = self.layer(layer)?;
        layer.node(id).map(|node| layer.world_position(node))
    }

    /// Layer ids from the root down to (and including) `layer`.
    pub fn ancestors(&self, layer: LayerId) -> Vec<LayerId> {
        let mut chain = Vec::new();
        let mut cursor = self.layer(layer);
        while let Some(current) = cursor {
            chain.push(current.id);
            cursor = current.parent.as_ref().and_then(|p| self.layer(p.layer));
        }
        chain.reverse();
        chain
    }

    /// Add a node to a layer and re-run its layout.
    pub fn add_node(
        &mut self,
        layer: LayerId,
        id: &str,
        label: &str,
        x: f32,
        z: f32,
    ) -> Result<&Node, AppError> {
        self.layer_mut(layer)?
            .insert_node(Node::new(id, label, x, z))?;
        debug!("Node created: {} \"{}\" in layer {}", id, label, layer);
        self.relayout(layer)?;
        self.node(layer, id).ok_or(AppError::UnknownNode {
            layer,
            id: id.to_string(),
        })
    }

    /// Add an edge. Returns `false` when it was a self-loop or already present.
    pub fn add_edge(
        &mut self,
        layer: LayerId,
        from: &str,
        to: &str,
        weight: f32,
    ) -> Result<bool, AppError> {
        let inserted = self.layer_mut(layer)?.insert_edge(from, to, weight)?;
        if inserted {
            debug!("Edge created: {} -> {} (w: {:.2}) in layer {}", from, to, weight, layer);
            self.relayout(layer)?;
        }
        Ok(inserted)
    }

    /// Remove a node, its incident edges and its whole sub-layer subtree.
    ///
    /// Absent ids are a no-op and return `Ok(None)`.
    pub fn remove_node(&mut self, layer: LayerId, id: &str) -> Result<Option<Removal>, AppError> {
        let Some(node) = self.layer_mut(layer)?.take_node(id) else {
            return Ok(None);
        };

        let mut dropped_layers = Vec::new();
        let mut pending: Vec<LayerId> = node.sub_layer.into_iter().collect();
        while let Some(next) = pending.pop() {
            if let Some(removed) = self.layers.remove(&next) {
                pending.extend(removed.nodes().filter_map(|n| n.sub_layer));
                dropped_layers.push(next);
            }
        }

        info!(
            "Deleted node {} from layer {} ({} sub-layers dropped)",
            id,
            layer,
            dropped_layers.len()
        );
        self.relayout(layer)?;
        Ok(Some(Removal {
            node,
            dropped_layers,
        }))
    }

    /// Change a node's label. Labels do not affect layout.
    pub fn rename_node(&mut self, layer: LayerId, id: &str, label: &str) -> Result<(), AppError> {
        let node = self
            .layer_mut(layer)?
            .node_mut(id)
            .ok_or_else(|| AppError::UnknownNode {
                layer,
                id: id.to_string(),
            })?;
        node.label = label.to_string();
        self.revision += 1;
        Ok(())
    }

    /// Return the node's sub-layer, creating it on first use.
    ///
    /// A new sub-layer is anchored at the node's current world position and
    /// sits one layer separation below its parent.
    pub fn ensure_sub_layer(&mut self, layer: LayerId, id: &str) -> Result<LayerId, AppError> {
        let parent = self.layer(layer).ok_or(AppError::UnknownLayer(layer))?;
        let node = parent.node(id).ok_or_else(|| AppError::UnknownNode {
            layer,
            id: id.to_string(),
        })?;
        if let Some(existing) = node.sub_layer {
            return Ok(existing);
        }

        let world = parent.world_position(node);
        let vertical_offset = parent.vertical_offset - self.layer_separation;
        let depth = parent.depth + 1;

        let sub_id = LayerId(self.next_layer);
        self.next_layer += 1;

        let sub = Layer::new(
            sub_id,
            format!("{id}_sub"),
            Some(LayerParent {
                layer,
                node: id.to_string(),
            }),
            Vec2::new(world.x, world.z),
            vertical_offset,
            depth,
        );
        self.layers.insert(sub_id, sub);
        if let Some(node) = self.layer_mut(layer)?.node_mut(id) {
            node.sub_layer = Some(sub_id);
        }
        self.revision += 1;
        info!("Sublayer created for node: {} ({})", id, sub_id);

        self.seed_placeholders(sub_id, id)?;
        Ok(sub_id)
    }

    fn seed_placeholders(&mut self, sub: LayerId, owner: &str) -> Result<(), AppError> {
        if self.placeholder_children.is_empty() {
            return Ok(());
        }
        let labels = self.placeholder_children.clone();
        let ids: Vec<String> = (0..labels.len())
            .map(|i| format!("{owner}_child_{i}"))
            .collect();

        let target = self.layer_mut(sub)?;
        for (i, (child, label)) in ids.iter().zip(&labels).enumerate() {
            target.insert_node(Node::new(child.as_str(), label.as_str(), i as f32 * 3.0, 0.0))?;
        }
        for pair in ids.windows(2) {
            target.insert_edge(&pair[0], &pair[1], crate::models::DEFAULT_EDGE_WEIGHT)?;
        }
        self.relayout(sub)?;
        Ok(())
    }

    /// Re-run layout on one layer.
    pub fn relayout(&mut self, layer: LayerId) -> Result<LayoutReport, AppError> {
        let engine = self.layout.clone();
        let report = engine.apply(self.layer_mut(layer)?);
        self.revision += 1;
        Ok(report)
    }
}
