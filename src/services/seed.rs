//! Populating a graph model from a scene file or a seeded demo.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::AppError;
use crate::models::{LayerId, SceneFile, SceneLayer};

use super::graph::GraphModel;

/// Nodes per rank of the demo graph.
const DEMO_RANKS: [usize; 4] = [3, 4, 3, 2];

/// Children seeded into every demo sub-layer.
const DEMO_SUB_NODES: usize = 2;

/// Load a scene file into the root layer, recursing into node children.
pub fn load_scene(graph: &mut GraphModel, scene: &SceneFile) -> Result<(), AppError> {
    load_layer(graph, LayerId::ROOT, &scene.root)?;
    info!(
        "Scene loaded: {} layers, {} root nodes",
        graph.layer_count(),
        scene.root.nodes.len()
    );
    Ok(())
}

fn load_layer(graph: &mut GraphModel, layer: LayerId, content: &SceneLayer) -> Result<(), AppError> {
    for node in &content.nodes {
        graph.add_node(layer, &node.id, &node.label, node.x, node.z)?;
    }
    for edge in &content.edges {
        graph.add_edge(layer, &edge.from, &edge.to, edge.weight)?;
    }
    // Sub-layers anchor at final positions, so they come after all edges
    for node in &content.nodes {
        if let Some(children) = &node.children {
            let sub = graph.ensure_sub_layer(layer, &node.id)?;
            load_layer(graph, sub, children)?;
        }
    }
    Ok(())
}

/// Build the demo graph: four ranks of nodes with one or two random edges
/// from each node to the next rank, and a small sub-layer under every node.
pub fn seed_demo(graph: &mut GraphModel, seed: u64) -> Result<(), AppError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let root = LayerId::ROOT;

    let mut ranks: Vec<Vec<String>> = Vec::with_capacity(DEMO_RANKS.len());
    let mut index = 0;
    for (rank, &count) in DEMO_RANKS.iter().enumerate() {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let id = format!("root_{index}");
            let z = (i as f32 - (count as f32 - 1.0) / 2.0) * 5.0;
            graph.add_node(root, &id, &format!("Node {index}"), rank as f32 * 10.0, z)?;
            ids.push(id);
            index += 1;
        }
        ranks.push(ids);
    }

    for pair in ranks.windows(2) {
        let (sources, targets) = (&pair[0], &pair[1]);
        for source in sources {
            let fan_out = rng.gen_range(1..=2);
            for target in targets.choose_multiple(&mut rng, fan_out) {
                let weight = rng.gen_range(0.2..=1.0);
                graph.add_edge(root, source, target, weight)?;
            }
        }
    }

    for (i, id) in ranks.iter().flatten().enumerate() {
        let sub = graph.ensure_sub_layer(root, id)?;
        for j in 0..DEMO_SUB_NODES {
            graph.add_node(
                sub,
                &format!("{id}_sub_{j}"),
                &format!("Sub {i}.{j}"),
                5.0,
                (j as f32 - 0.5) * 4.0,
            )?;
        }
    }

    info!("Demo graph seeded (seed {}, {} layers)", seed, graph.layer_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(graph: &GraphModel) -> Vec<(String, String)> {
        graph
            .layer(LayerId::ROOT)
            .unwrap()
            .edges()
            .iter()
            .map(|e| (e.from.clone(), e.to.clone()))
            .collect()
    }

    #[test]
    fn test_demo_is_deterministic() {
        let mut first = GraphModel::default();
        let mut second = GraphModel::default();
        seed_demo(&mut first, 7).unwrap();
        seed_demo(&mut second, 7).unwrap();
        assert_eq!(edges(&first), edges(&second));
    }

    #[test]
    fn test_demo_shape() {
        let mut graph = GraphModel::default();
        seed_demo(&mut graph, 1).unwrap();

        let root = graph.layer(LayerId::ROOT).unwrap();
        assert_eq!(root.len(), 12);
        // One sub-layer per node plus the root
        assert_eq!(graph.layer_count(), 13);
        for node in root.nodes() {
            let sub = graph.layer(node.sub_layer.unwrap()).unwrap();
            assert_eq!(sub.len(), DEMO_SUB_NODES);
        }

        // Every edge runs from one rank to a later one
        for edge in root.edges() {
            let from = root.node(&edge.from).unwrap().rank;
            let to = root.node(&edge.to).unwrap().rank;
            assert!(to > from);
            assert!((0.2..=1.0).contains(&edge.weight));
        }
        let first_rank_out = root.edges().iter().filter(|e| e.from == "root_0").count();
        assert!((1..=2).contains(&first_rank_out));
    }

    #[test]
    fn test_load_scene_nests_layers() {
        let scene: SceneFile = serde_json::from_str(
            r#"{
                "root": {
                    "nodes": [
                        { "id": "ingest", "label": "Ingest",
                          "children": {
                              "nodes": [{ "id": "parse", "label": "Parse" }, { "id": "check", "label": "Check" }],
                              "edges": [{ "from": "parse", "to": "check" }]
                          } },
                        { "id": "store", "label": "Store" }
                    ],
                    "edges": [{ "from": "ingest", "to": "store", "weight": 0.8 }]
                }
            }"#,
        )
        .unwrap();

        let mut graph = GraphModel::default();
        load_scene(&mut graph, &scene).unwrap();

        let sub = graph.node(LayerId::ROOT, "ingest").unwrap().sub_layer.unwrap();
        assert_eq!(graph.node(sub, "check").unwrap().rank, 1);
        assert_eq!(graph.node(LayerId::ROOT, "store").unwrap().rank, 1);
        assert!(graph.node(LayerId::ROOT, "store").unwrap().sub_layer.is_none());
    }

    #[test]
    fn test_load_scene_rejects_dangling_edge() {
        let scene: SceneFile = serde_json::from_str(
            r#"{ "root": { "nodes": [{ "id": "a", "label": "A" }], "edges": [{ "from": "a", "to": "b" }] } }"#,
        )
        .unwrap();
        let mut graph = GraphModel::default();
        let err = load_scene(&mut graph, &scene);
        assert!(matches!(err, Err(AppError::UnknownNode { .. })));
    }
}
