//! Advance the scene and mirror its camera onto the Bevy camera.

use bevy::prelude::*;

use crate::visualization::resources::{Notices, SceneRes, SequentialLabels};
use crate::visualization::viewport::CameraViewport;
use crate::visualization::constants::NOTICE_SECONDS;

/// Run one scene tick with the frame time, then place the camera.
pub fn tick_scene_system(
    time: Res<Time>,
    mut scene: ResMut<SceneRes>,
    mut labels: ResMut<SequentialLabels>,
    mut notices: ResMut<Notices>,
    mut camera_query: Query<(&Camera, &GlobalTransform, &mut Transform), With<Camera3d>>,
) {
    let Ok((camera, global, mut transform)) = camera_query.get_single_mut() else {
        return;
    };
    let scene = &mut scene.0;

    let viewport = CameraViewport {
        camera,
        transform: global,
    };
    scene.tick(time.delta(), &viewport, &mut *labels);

    for message in scene.router.take_notices() {
        notices.0.push((message, NOTICE_SECONDS));
    }

    let position = scene.camera.position();
    let target = scene.camera.target();
    if position.distance_squared(target) > f32::EPSILON {
        *transform = Transform::from_translation(position).looking_at(target, Vec3::Y);
    }
}
