//! Viewer services: graph model, layout, camera, navigation and input.
//!
//! Each service owns one concern and receives its collaborators explicitly;
//! [`Scene`] wires them together for a renderer.

mod camera;
mod curve;
mod graph;
mod interaction;
mod layout;
mod navigation;
mod scene;
mod seed;

pub use camera::CameraMotionController;
pub use curve::{transition_curve, CatmullRomCurve, MasterPath};
pub use graph::{GraphModel, Removal};
pub use interaction::{
    GroundPlane, InputEvent, InteractionRouter, Key, LabelSource, PickCandidate, RouterContext,
    Viewport, GROUND_HALF_EXTENT, NODE_PICK_RADIUS,
};
pub use layout::{LayoutEngine, LayoutReport};
pub use navigation::{Choreography, NavEntry, NavigationController};
pub use scene::Scene;
pub use seed::{load_scene, seed_demo};
