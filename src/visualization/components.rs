//! ECS components for the layered graph viewer.
//!
//! Everything tagged [`LayerGeometry`] is rebuilt whenever the graph or the
//! set of visible layers changes.

use bevy::prelude::*;

use crate::models::LayerId;

/// Marker for entities spawned from graph content.
#[derive(Component)]
pub struct LayerGeometry;

/// A node box.
#[derive(Component)]
pub struct GraphNode {
    pub layer: LayerId,
    pub id: String,
}

/// An edge cylinder or its arrowhead.
#[derive(Component)]
pub struct GraphEdge;

/// The ground plane of a layer.
#[derive(Component)]
pub struct LayerGround;

/// Screen-space label following a node.
#[derive(Component)]
pub struct NodeLabel {
    /// World anchor above the node.
    pub anchor: Vec3,
}

/// Text of the status panel.
#[derive(Component)]
pub struct HudText;

/// Container of the breadcrumb buttons.
#[derive(Component)]
pub struct BreadcrumbBar;

/// A breadcrumb button returning to a stack depth.
#[derive(Component)]
pub struct Breadcrumb {
    pub depth: usize,
}

/// Text listing recent notices.
#[derive(Component)]
pub struct NoticeText;
