//! Visual constants for the layered graph viewer.

use bevy::prelude::*;

// =============================================================================
// Colors
// =============================================================================

/// Background clear color.
pub const COLOR_BACKGROUND: Color = Color::srgb(0.07, 0.07, 0.09);
/// Node box color (Blue).
pub const COLOR_NODE: Color = Color::srgb(0.29, 0.56, 0.85); // #4A90D9
/// Hovered node color (Gold).
pub const COLOR_NODE_HOVER: Color = Color::srgb(1.0, 0.84, 0.0); // #FFD700
/// Link source node color (Green).
pub const COLOR_LINK_SOURCE: Color = Color::srgb(0.36, 0.72, 0.36); // #5CB85C
/// Edge color (Gray).
pub const COLOR_EDGE: Color = Color::srgb(0.7, 0.7, 0.7);
/// Layer ground plane color.
pub const COLOR_GROUND: Color = Color::srgb(0.2, 0.22, 0.3);
/// Master path color while riding (Magenta).
pub const COLOR_MASTER_PATH: Color = Color::srgb(1.0, 0.0, 1.0);
/// Panel background.
pub const COLOR_PANEL: Color = Color::srgba(0.1, 0.1, 0.15, 0.85);

/// Ground plane alpha at full layer opacity.
pub const GROUND_ALPHA: f32 = 0.35;

// =============================================================================
// Sizing
// =============================================================================

/// Node box dimensions (x, y, z).
pub const NODE_SIZE: Vec3 = Vec3::new(1.6, 0.5, 1.0);
/// Edge radius at weight 0.
pub const EDGE_MIN_RADIUS: f32 = 0.03;
/// Extra edge radius at weight 1.
pub const EDGE_WEIGHT_RADIUS: f32 = 0.07;
/// Arrowhead cone radius and height.
pub const ARROW_RADIUS: f32 = 0.15;
pub const ARROW_HEIGHT: f32 = 0.4;

/// Seconds a notice stays on screen.
pub const NOTICE_SECONDS: f32 = 4.0;
/// Pointer slop and window of a double click.
pub const DOUBLE_CLICK_SECONDS: f64 = 0.35;
pub const DOUBLE_CLICK_PIXELS: f32 = 6.0;
/// Pixels of wheel travel per scrolled line.
pub const WHEEL_LINE_PIXELS: f32 = 100.0;

// =============================================================================
// Helpers
// =============================================================================

/// Edge cylinder radius for an edge weight.
pub fn edge_radius(weight: f32) -> f32 {
    EDGE_MIN_RADIUS + EDGE_WEIGHT_RADIUS * weight.clamp(0.0, 1.0)
}
