//! Strata - Layered DAG Visualizer
//!
//! Directed acyclic graphs arranged on stacked horizontal layers. Any node
//! can own a nested sub-layer, and the camera drills into it and back out.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod visualization;
