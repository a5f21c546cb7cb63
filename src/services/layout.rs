//! Rank-based layered layout.
//!
//! Longest-path layering by iterative relaxation, then each rank is placed on
//! its own column and its nodes are centered around the layer's z axis.

use std::collections::HashMap;

use tracing::warn;

use crate::config::LayoutConfig;
use crate::models::Layer;

/// Outcome of one layout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutReport {
    /// Relaxation passes performed.
    pub passes: usize,
    /// `false` when the pass cap was hit (cyclic edges).
    pub converged: bool,
}

/// Assigns ranks and logical positions to the nodes of one layer.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    rank_spacing: f32,
    node_spacing: f32,
    max_iterations: usize,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            rank_spacing: config.rank_spacing,
            node_spacing: config.node_spacing,
            max_iterations: config.max_iterations,
        }
    }

    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    /// Compute ranks, indexed like `layer.node_ids()`.
    pub fn assign_ranks(&self, layer: &Layer) -> (Vec<u32>, LayoutReport) {
        let index: HashMap<&str, usize> = layer
            .node_ids()
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        // Edges always reference live nodes; the filter only guards stale input.
        let edges: Vec<(usize, usize)> = layer
            .edges()
            .iter()
            .filter_map(|e| Some((*index.get(e.from.as_str())?, *index.get(e.to.as_str())?)))
            .collect();

        let mut ranks = vec![0u32; index.len()];
        let mut passes = 0;
        let mut converged = false;

        while passes < self.max_iterations {
            passes += 1;
            let mut changed = false;
            for &(from, to) in &edges {
                if ranks[to] <= ranks[from] {
                    ranks[to] = ranks[from] + 1;
                    changed = true;
                }
            }
            if !changed {
                converged = true;
                break;
            }
        }

        (ranks, LayoutReport { passes, converged })
    }

    /// Rank the layer and write `rank` and `position` into every node.
    pub fn apply(&self, layer: &mut Layer) -> LayoutReport {
        let (ranks, report) = self.assign_ranks(layer);
        if !report.converged {
            warn!(
                "Layout of layer {} hit the {} pass cap; edges are cyclic, ranks frozen",
                layer.id, self.max_iterations
            );
        }

        // Rank groups keep insertion order
        let mut groups: HashMap<u32, Vec<String>> = HashMap::new();
        for (id, &rank) in layer.node_ids().iter().zip(&ranks) {
            groups.entry(rank).or_default().push(id.clone());
        }

        for (rank, ids) in groups {
            let center = (ids.len() as f32 - 1.0) / 2.0;
            for (index, id) in ids.iter().enumerate() {
                if let Some(node) = layer.node_mut(id) {
                    node.rank = rank;
                    node.position.x = rank as f32 * self.rank_spacing;
                    node.position.y = (index as f32 - center) * self.node_spacing;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    fn layer(ids: &[&str], edges: &[(&str, &str)]) -> Layer {
        let mut layer = Layer::root();
        for id in ids {
            layer.insert_node(Node::new(*id, *id, 0.0, 0.0)).unwrap();
        }
        for (from, to) in edges {
            layer.insert_edge(from, to, 0.5).unwrap();
        }
        layer
    }

    fn rank(layer: &Layer, id: &str) -> u32 {
        layer.node(id).unwrap().rank
    }

    #[test]
    fn test_single_edge_ranks_and_columns() {
        let mut l = layer(&["n1", "n2"], &[("n1", "n2")]);
        let report = LayoutEngine::default().apply(&mut l);

        assert!(report.converged);
        assert_eq!(rank(&l, "n1"), 0);
        assert_eq!(rank(&l, "n2"), 1);
        assert_eq!(l.node("n1").unwrap().position.x, 0.0);
        assert_eq!(l.node("n2").unwrap().position.x, 5.0);
    }

    #[test]
    fn test_edges_point_to_higher_ranks() {
        // Diamond plus a long skip edge
        let mut l = layer(
            &["a", "b", "c", "d", "e"],
            &[("d", "e"), ("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("a", "e")],
        );
        LayoutEngine::default().apply(&mut l);

        for edge in l.edges() {
            assert!(rank(&l, &edge.to) > rank(&l, &edge.from), "{edge:?}");
        }
        assert_eq!(rank(&l, "e"), 3);
    }

    #[test]
    fn test_rank_groups_are_centered() {
        let mut l = layer(
            &["root", "x", "y", "z"],
            &[("root", "x"), ("root", "y"), ("root", "z")],
        );
        LayoutEngine::default().apply(&mut l);

        let zs: Vec<f32> = ["x", "y", "z"]
            .iter()
            .map(|id| l.node(id).unwrap().position.y)
            .collect();
        assert_eq!(zs, vec![-3.0, 0.0, 3.0]);
        assert_eq!(l.node("root").unwrap().position.y, 0.0);

        let sum: f32 = zs.iter().sum();
        assert!(sum.abs() < 1e-6);
    }

    #[test]
    fn test_even_group_is_symmetric() {
        let mut l = layer(&["a", "b"], &[]);
        LayoutEngine::default().apply(&mut l);
        assert_eq!(l.node("a").unwrap().position.y, -1.5);
        assert_eq!(l.node("b").unwrap().position.y, 1.5);
    }

    #[test]
    fn test_cycle_is_bounded() {
        let mut l = layer(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let report = LayoutEngine::default().apply(&mut l);

        assert!(!report.converged);
        assert_eq!(report.passes, 100);
        // Ranks froze at whatever the cap left them
        assert!(rank(&l, "a") > 0 || rank(&l, "b") > 0);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut l = layer(&["a", "b", "c"], &[("a", "c"), ("b", "c")]);
        let engine = LayoutEngine::default();
        engine.apply(&mut l);
        let first: Vec<_> = l.nodes().map(|n| (n.rank, n.position)).collect();
        engine.apply(&mut l);
        let second: Vec<_> = l.nodes().map(|n| (n.rank, n.position)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_spacing() {
        let config = LayoutConfig {
            rank_spacing: 10.0,
            node_spacing: 4.0,
            max_iterations: 100,
        };
        let mut l = layer(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
        LayoutEngine::new(&config).apply(&mut l);
        assert_eq!(l.node("b").unwrap().position, bevy::math::Vec2::new(10.0, -2.0));
        assert_eq!(l.node("c").unwrap().position, bevy::math::Vec2::new(10.0, 2.0));
    }
}
