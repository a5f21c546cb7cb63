//! UI systems for labels, the status panel, breadcrumbs and notices.

use bevy::prelude::*;
use bevy::ui::Node as UiNode;

use crate::services::{InputEvent, Viewport};
use crate::visualization::components::{Breadcrumb, BreadcrumbBar, HudText, NodeLabel, NoticeText};
use crate::visualization::constants::COLOR_PANEL;
use crate::visualization::resources::{BreadcrumbState, Notices, SceneRes};
use crate::visualization::viewport::CameraViewport;

/// Update label positions by projecting node anchors to screen space.
pub fn update_labels_system(
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut label_query: Query<(&mut UiNode, &mut Visibility, &NodeLabel)>,
) {
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let viewport = CameraViewport {
        camera,
        transform: camera_transform,
    };
    for (mut node_ui, mut visibility, label) in label_query.iter_mut() {
        match viewport.project(label.anchor) {
            Some(screen) => {
                *visibility = Visibility::Visible;
                node_ui.left = Val::Px(screen.x - 30.0); // Center text roughly
                node_ui.top = Val::Px(screen.y - 10.0);
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// Refresh the status panel from the scene metrics.
pub fn update_hud_system(
    scene: Res<SceneRes>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut text_query: Query<&mut Text, With<HudText>>,
) {
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    let metrics = scene.0.metrics(&CameraViewport {
        camera,
        transform: camera_transform,
    });

    **text = format!(
        "Layer: {} ({})\nDepth: {}\nNodes: {}\nCamera: {:?}\nDistance: {:.1}\nRide: {:.0}%\nHovered: {}\nLink from: {}",
        metrics.current_layer,
        metrics.current_layer_id,
        metrics.navigation_path.len().saturating_sub(1),
        metrics.node_count,
        metrics.camera_mode,
        metrics.camera_distance,
        metrics.ride_progress * 100.0,
        metrics.hovered.as_deref().unwrap_or("-"),
        metrics.link_source.as_deref().unwrap_or("-"),
    );
}

/// Respawn the breadcrumb buttons when the navigation path changes.
pub fn update_breadcrumbs_system(
    mut commands: Commands,
    scene: Res<SceneRes>,
    mut state: ResMut<BreadcrumbState>,
    bar_query: Query<Entity, With<BreadcrumbBar>>,
) {
    let crumbs = scene.0.nav.breadcrumbs(&scene.0.graph);
    if crumbs == state.crumbs {
        return;
    }
    let Ok(bar) = bar_query.get_single() else {
        return;
    };

    commands.entity(bar).despawn_descendants();
    commands.entity(bar).with_children(|parent| {
        let last = crumbs.len().saturating_sub(1);
        for (depth, crumb) in crumbs.iter().enumerate() {
            let color = if depth == last {
                Color::srgb(0.95, 0.95, 0.95)
            } else {
                Color::srgb(0.5, 0.7, 1.0)
            };
            parent
                .spawn((
                    Button,
                    bevy::ui::Node {
                        padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(COLOR_PANEL),
                    Breadcrumb { depth },
                ))
                .with_children(|button| {
                    let label = if depth == last {
                        crumb.clone()
                    } else {
                        format!("{crumb} >")
                    };
                    button.spawn((
                        Text::new(label),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(color),
                    ));
                });
        }
    });
    state.crumbs = crumbs;
}

/// Jump back to the depth of a pressed breadcrumb.
pub fn breadcrumb_click_system(
    mut scene: ResMut<SceneRes>,
    buttons: Query<(&Interaction, &Breadcrumb), Changed<Interaction>>,
) {
    for (interaction, crumb) in buttons.iter() {
        if *interaction == Interaction::Pressed && crumb.depth < scene.0.nav.depth() {
            scene
                .0
                .push_input(InputEvent::NavigateToDepth { depth: crumb.depth });
        }
    }
}

/// Show recent notices and expire old ones.
pub fn update_notices_system(
    time: Res<Time>,
    mut notices: ResMut<Notices>,
    mut text_query: Query<&mut Text, With<NoticeText>>,
) {
    let dt = time.delta_secs();
    let before = notices.0.len();
    for (_, remaining) in notices.0.iter_mut() {
        *remaining -= dt;
    }
    notices.0.retain(|(_, remaining)| *remaining > 0.0);

    if !notices.is_changed() && before == notices.0.len() {
        return;
    }
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    **text = notices
        .0
        .iter()
        .map(|(message, _)| message.as_str())
        .collect::<Vec<_>>()
        .join("\n");
}
