//! ECS systems for the layered graph viewer.
//!
//! Systems are functions that operate on components and resources each frame.

pub mod input;
pub mod render;
pub mod scene;
pub mod ui;

pub use input::collect_input_system;
pub use render::{
    apply_layer_opacity_system, draw_master_path_system, rebuild_geometry_system,
    update_hover_glow_system,
};
pub use scene::tick_scene_system;
pub use ui::{
    breadcrumb_click_system, update_breadcrumbs_system, update_hud_system, update_labels_system,
    update_notices_system,
};
