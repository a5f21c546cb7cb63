//! Layout subcommand - print computed ranks and positions of a scene file.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{LayerId, SceneFile};
use crate::services::{load_scene, GraphModel};

/// Compute the layout of every layer in a scene file.
#[derive(Parser)]
pub struct LayoutCommand {
    /// Path to a JSON scene file.
    pub input: PathBuf,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

/// Layout of one layer.
#[derive(Debug, Serialize)]
pub struct LayerLayout {
    pub id: LayerId,
    pub name: String,
    pub depth: usize,
    /// Owning node, absent for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub origin: [f32; 2],
    pub vertical_offset: f32,
    /// `false` when cyclic edges stopped rank relaxation early.
    pub converged: bool,
    pub nodes: Vec<NodeLayout>,
}

#[derive(Debug, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub label: String,
    pub rank: u32,
    pub x: f32,
    pub z: f32,
    pub world: [f32; 3],
}

impl LayoutCommand {
    /// Run the layout command.
    pub fn run(self) -> color_eyre::Result<()> {
        let config = Config::load()?;
        let layers = self.compute(&config)?;
        let output = if self.compact {
            serde_json::to_string(&layers)?
        } else {
            serde_json::to_string_pretty(&layers)?
        };
        println!("{output}");
        Ok(())
    }

    /// Load the scene and collect the layout of every layer.
    pub fn compute(&self, config: &Config) -> Result<Vec<LayerLayout>, AppError> {
        let content = std::fs::read_to_string(&self.input)?;
        let scene: SceneFile = serde_json::from_str(&content)?;

        let mut graph = GraphModel::new(&config.layout, &config.graph);
        load_scene(&mut graph, &scene)?;

        let ids: Vec<LayerId> = graph.layers().iter().map(|l| l.id).collect();
        let mut layers = Vec::with_capacity(ids.len());
        for id in ids {
            let report = graph.relayout(id)?;
            let Some(layer) = graph.layer(id) else {
                continue;
            };
            layers.push(LayerLayout {
                id,
                name: layer.name.clone(),
                depth: layer.depth,
                parent: layer.parent.as_ref().map(|p| p.node.clone()),
                origin: layer.origin.to_array(),
                vertical_offset: layer.vertical_offset,
                converged: report.converged,
                nodes: layer
                    .nodes()
                    .map(|node| NodeLayout {
                        id: node.id.clone(),
                        label: node.label.clone(),
                        rank: node.rank,
                        x: node.position.x,
                        z: node.position.y,
                        world: layer.world_position(node).to_array(),
                    })
                    .collect(),
            });
        }
        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn command_for(json: &str) -> (tempfile::NamedTempFile, LayoutCommand) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let command = LayoutCommand {
            input: file.path().to_path_buf(),
            compact: true,
        };
        (file, command)
    }

    #[test]
    fn test_layout_of_nested_scene() {
        let (_file, command) = command_for(
            r#"{
                "root": {
                    "nodes": [
                        { "id": "n1", "label": "One" },
                        { "id": "n2", "label": "Two", "children": { "nodes": [{ "id": "c", "label": "C" }] } }
                    ],
                    "edges": [{ "from": "n1", "to": "n2" }]
                }
            }"#,
        );
        let layers = command.compute(&Config::default()).unwrap();
        assert_eq!(layers.len(), 2);

        let root = &layers[0];
        assert!(root.converged);
        assert_eq!(root.nodes[1].rank, 1);
        assert_eq!(root.nodes[1].x, 5.0);

        let sub = &layers[1];
        assert_eq!(sub.parent.as_deref(), Some("n2"));
        assert_eq!(sub.origin, [5.0, 0.0]);
        assert_eq!(sub.nodes[0].world, [5.0, -20.0, 0.0]);
    }

    #[test]
    fn test_cyclic_scene_reports_unconverged() {
        let (_file, command) = command_for(
            r#"{ "root": {
                "nodes": [{ "id": "a", "label": "A" }, { "id": "b", "label": "B" }],
                "edges": [{ "from": "a", "to": "b" }, { "from": "b", "to": "a" }]
            } }"#,
        );
        let layers = command.compute(&Config::default()).unwrap();
        assert!(!layers[0].converged);
    }

    #[test]
    fn test_invalid_scene_file() {
        let (_file, command) = command_for("{ not json");
        let err = command.compute(&Config::default());
        assert!(matches!(err, Err(AppError::SceneFile(_))));
    }
}
