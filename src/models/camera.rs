//! Camera state shared between the motion controller and its callers.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// Which motion mode currently drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// User controlled orbit, pan and dolly.
    Idle,
    /// Exponential ease toward a fixed destination.
    Transitioning,
    /// Timed flight along a curve through a waypoint.
    Flythrough,
    /// Pinned to the master path at a scroll-driven progress.
    Ride,
}

/// Restorable camera state saved on the navigation stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub target: Vec3,
    pub ride_progress: f32,
}

/// A destination view requested by navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
    /// Optional waypoint the camera should pass through on the way.
    pub via: Option<Vec3>,
}

/// Signal raised when ride input pushes past either end of the master path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideExit {
    /// Scrolled out past progress 0.
    Start,
    /// Scrolled in past progress 1.
    End,
}
