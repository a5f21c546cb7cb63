//! ECS resources for the viewer state.
//!
//! Resources are global singleton data - there's only one instance
//! of each resource in the entire app.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::models::LayerId;
use crate::services::{LabelSource, Scene};

// =============================================================================
// Scene
// =============================================================================

/// The simulated scene. Every system goes through it.
#[derive(Resource)]
pub struct SceneRes(pub Scene);

/// Labels for nodes created by double-click.
///
/// The window has no blocking prompt, so new nodes get sequential labels.
#[derive(Resource, Default)]
pub struct SequentialLabels {
    next: usize,
}

impl LabelSource for SequentialLabels {
    fn request_label(&mut self) -> Option<String> {
        self.next += 1;
        Some(format!("New {}", self.next))
    }
}

// =============================================================================
// Rendering State
// =============================================================================

/// What the spawned geometry was built from.
#[derive(Resource, Default)]
pub struct RenderState {
    pub revision: Option<u64>,
    pub visible: Vec<LayerId>,
}

/// Per-layer materials, so each layer can fade on its own.
#[derive(Clone)]
pub struct LayerPalette {
    pub node: Handle<StandardMaterial>,
    pub hover: Handle<StandardMaterial>,
    pub link: Handle<StandardMaterial>,
    pub edge: Handle<StandardMaterial>,
    pub ground: Handle<StandardMaterial>,
    /// Opacity last written into the materials.
    pub opacity: f32,
}

#[derive(Resource, Default)]
pub struct LayerMaterials(pub HashMap<LayerId, LayerPalette>);

/// Shared meshes.
#[derive(Resource)]
pub struct GraphMeshes {
    pub node: Handle<Mesh>,
    pub edge: Handle<Mesh>,
    pub arrow: Handle<Mesh>,
    pub ground: Handle<Mesh>,
}

// =============================================================================
// Interaction State
// =============================================================================

/// Last left click, for double-click detection.
#[derive(Resource, Default)]
pub struct ClickTracker {
    pub last: Option<(f64, Vec2)>,
}

/// Notices waiting to expire, with remaining seconds.
#[derive(Resource, Default)]
pub struct Notices(pub Vec<(String, f32)>);

/// Labels of the breadcrumb buttons currently spawned.
#[derive(Resource, Default)]
pub struct BreadcrumbState {
    pub crumbs: Vec<String>,
}
