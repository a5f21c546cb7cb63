//! Visualize subcommand - open the 3D viewer on a scene file or demo graph.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::config::{Config, DrillMotion};
use crate::error::AppError;
use crate::models::SceneFile;
use crate::services::{load_scene, seed_demo, Scene};
use crate::visualization::run_visualizer;

/// Open the viewer.
#[derive(Parser)]
pub struct VisualizeCommand {
    /// Path to a JSON scene file. Without it a seeded demo graph is shown.
    pub input: Option<PathBuf>,

    /// Seed of the demo graph (overrides `viewer.demo_seed`).
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Camera motion used when drilling into a node.
    #[arg(short, long, value_enum)]
    pub motion: Option<DrillMotion>,
}

impl VisualizeCommand {
    /// Run the visualize command.
    pub fn run(self) -> color_eyre::Result<()> {
        let config = Config::load()?;
        let scene = self.prepare(&config)?;
        run_visualizer(scene, &config.viewer);
        Ok(())
    }

    /// Build the scene the viewer opens on.
    pub fn prepare(&self, config: &Config) -> Result<Scene, AppError> {
        let mut scene = Scene::new(config);

        match &self.input {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                let file: SceneFile = serde_json::from_str(&content)?;
                load_scene(&mut scene.graph, &file)?;
                info!("Loaded scene from {}", path.display());
            }
            None => {
                let seed = self.seed.unwrap_or(config.viewer.demo_seed);
                seed_demo(&mut scene.graph, seed)?;
                info!("Seeded demo graph with seed {seed}");
            }
        }

        if let Some(motion) = self.motion {
            scene.nav.set_drill_motion(motion);
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_prepare_seeds_demo_without_input() {
        let cmd = VisualizeCommand {
            input: None,
            seed: Some(3),
            motion: Some(DrillMotion::Ride),
        };
        let scene = cmd.prepare(&Config::default()).unwrap();

        let root = scene.graph.root();
        assert_eq!(scene.graph.layer(root).map(|l| l.len()), Some(12));
        assert_eq!(scene.nav.drill_motion(), DrillMotion::Ride);
    }

    #[test]
    fn test_prepare_loads_scene_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"root": {{"nodes": [{{"id": "a", "label": "A"}}, {{"id": "b", "label": "B"}}],
                "edges": [{{"from": "a", "to": "b"}}]}}}}"#
        )
        .unwrap();

        let cmd = VisualizeCommand {
            input: Some(file.path().to_path_buf()),
            seed: None,
            motion: None,
        };
        let scene = cmd.prepare(&Config::default()).unwrap();

        let root = scene.graph.root();
        assert_eq!(scene.graph.layer(root).map(|l| l.len()), Some(2));
        assert_eq!(scene.graph.node(root, "b").map(|n| n.rank), Some(1));
    }
}
