//! Translate window input into scene input events.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::CursorMoved;

use crate::services::{InputEvent, Key};
use crate::visualization::constants::{
    DOUBLE_CLICK_PIXELS, DOUBLE_CLICK_SECONDS, WHEEL_LINE_PIXELS,
};
use crate::visualization::resources::{ClickTracker, SceneRes};

/// Keys that turn a click into a link click (Ctrl, or Cmd on macOS).
const LINK_MODIFIERS: [KeyCode; 4] = [
    KeyCode::ControlLeft,
    KeyCode::ControlRight,
    KeyCode::SuperLeft,
    KeyCode::SuperRight,
];

/// Keys forwarded to the router as press/release pairs.
const ROUTED_KEYS: [(KeyCode, Key); 6] = [
    (KeyCode::KeyW, Key::W),
    (KeyCode::KeyA, Key::A),
    (KeyCode::KeyS, Key::S),
    (KeyCode::KeyD, Key::D),
    (KeyCode::Delete, Key::Delete),
    (KeyCode::Backspace, Key::Backspace),
];

/// Queue pointer, button, wheel and key input for the next scene tick.
///
/// Controls:
/// - Left click: drill into a node (Ctrl/Cmd: link nodes)
/// - Double click on the ground: create a node
/// - Right-click drag: orbit
/// - Scroll wheel: dolly, or move along the path while riding
/// - WASD: pan
/// - Delete/Backspace: delete the hovered node
/// - Escape: navigate up
#[allow(clippy::too_many_arguments)]
pub fn collect_input_system(
    mut scene: ResMut<SceneRes>,
    mut clicks: ResMut<ClickTracker>,
    time: Res<Time>,
    windows: Query<&Window>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut cursor: EventReader<CursorMoved>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll: EventReader<MouseWheel>,
) {
    let scene = &mut scene.0;

    if let Some(moved) = cursor.read().last() {
        scene.push_input(InputEvent::PointerMove {
            position: moved.position,
        });
    }

    let pointer = windows
        .get_single()
        .ok()
        .and_then(|window| window.cursor_position());

    if mouse_button.just_pressed(MouseButton::Left) {
        if let Some(position) = pointer {
            let modifier = keyboard.any_pressed(LINK_MODIFIERS);
            scene.push_input(InputEvent::Click { position, modifier });

            // A second click close in time and space also counts as a double click
            let now = time.elapsed_secs_f64();
            let double = clicks.last.is_some_and(|(at, last)| {
                now - at <= DOUBLE_CLICK_SECONDS && last.distance(position) <= DOUBLE_CLICK_PIXELS
            });
            if double {
                scene.push_input(InputEvent::DoubleClick { position });
                clicks.last = None;
            } else {
                clicks.last = Some((now, position));
            }
        }
    }

    // Orbit on right-click drag
    if mouse_button.pressed(MouseButton::Right) {
        let delta: Vec2 = mouse_motion.read().map(|ev| ev.delta).sum();
        if delta != Vec2::ZERO {
            scene.push_input(InputEvent::OrbitDrag { delta });
        }
    } else {
        mouse_motion.clear();
    }

    // Wheel up zooms in, which is a negative delta for the scene
    for ev in scroll.read() {
        let pixels = match ev.unit {
            MouseScrollUnit::Line => ev.y * WHEEL_LINE_PIXELS,
            MouseScrollUnit::Pixel => ev.y,
        };
        if pixels != 0.0 {
            scene.push_input(InputEvent::Wheel { delta_y: -pixels });
        }
    }

    for (code, key) in ROUTED_KEYS {
        if keyboard.just_pressed(code) {
            scene.push_input(InputEvent::KeyDown(key));
        }
        if keyboard.just_released(code) {
            scene.push_input(InputEvent::KeyUp(key));
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        scene.push_input(InputEvent::NavigateUp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_modifiers_are_ctrl_and_cmd() {
        for code in [KeyCode::ControlRight, KeyCode::SuperLeft] {
            let mut keyboard = ButtonInput::<KeyCode>::default();
            keyboard.press(code);
            assert!(keyboard.any_pressed(LINK_MODIFIERS));
        }

        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ShiftLeft);
        assert!(!keyboard.any_pressed(LINK_MODIFIERS));
    }
}
