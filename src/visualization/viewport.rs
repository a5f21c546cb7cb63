//! Screen-space queries against the Bevy camera.

use bevy::math::primitives::InfinitePlane3d;
use bevy::prelude::*;

use crate::services::{GroundPlane, PickCandidate, Viewport};

/// A [`Viewport`] backed by the active 3D camera.
pub struct CameraViewport<'a> {
    pub camera: &'a Camera,
    pub transform: &'a GlobalTransform,
}

impl CameraViewport<'_> {
    fn in_front(&self, world: Vec3) -> bool {
        (world - self.transform.translation()).dot(*self.transform.forward()) > 0.0
    }
}

impl Viewport for CameraViewport<'_> {
    fn pick(&self, pointer: Vec2, candidates: &[PickCandidate]) -> Option<String> {
        let ray = self.camera.viewport_to_world(self.transform, pointer).ok()?;

        // Closest candidate whose sphere the ray passes through
        let mut closest: Option<(&PickCandidate, f32)> = None;
        for candidate in candidates {
            let to_center = candidate.center - ray.origin;
            let t = to_center.dot(*ray.direction);
            if t <= 0.0 {
                continue;
            }
            let distance = (ray.get_point(t) - candidate.center).length();
            if distance < candidate.radius && closest.map_or(true, |(_, best)| t < best) {
                closest = Some((candidate, t));
            }
        }
        closest.map(|(candidate, _)| candidate.id.clone())
    }

    fn pick_ground(&self, pointer: Vec2, plane: &GroundPlane) -> Option<Vec3> {
        let ray = self.camera.viewport_to_world(self.transform, pointer).ok()?;
        let t = ray.intersect_plane(plane.center, InfinitePlane3d::new(Vec3::Y))?;
        let point = ray.get_point(t);

        let inside = (point.x - plane.center.x).abs() <= plane.half_extent
            && (point.z - plane.center.z).abs() <= plane.half_extent;
        inside.then_some(point)
    }

    fn project(&self, world: Vec3) -> Option<Vec2> {
        if !self.in_front(world) {
            return None;
        }
        self.camera.world_to_viewport(self.transform, world).ok()
    }
}
