//! CLI module for Strata.
//!
//! Subcommands:
//! - `visualize`: Open the 3D viewer on a scene file or the demo graph
//! - `layout`: Print computed ranks and positions of a scene file

mod layout;
mod visualize;

use clap::{Parser, Subcommand};

pub use layout::LayoutCommand;
pub use visualize::VisualizeCommand;

/// Strata - Layered DAG Visualizer
#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Layered DAG visualizer with drill-down navigation")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open the 3D viewer
    Visualize(VisualizeCommand),

    /// Compute the layout of a scene file and print it as JSON
    Layout(LayoutCommand),
}

impl App {
    /// Run the CLI application.
    pub fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Visualize(cmd) => cmd.run(),
            Command::Layout(cmd) => cmd.run(),
        }
    }
}
