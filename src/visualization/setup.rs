//! Scene setup: camera, lighting, shared meshes and the HUD.

use bevy::prelude::*;
use bevy::ui::PositionType;

use crate::visualization::components::{BreadcrumbBar, HudText, NoticeText};
use crate::visualization::constants::{
    ARROW_HEIGHT, ARROW_RADIUS, COLOR_PANEL, NODE_SIZE,
};
use crate::visualization::resources::{GraphMeshes, SceneRes};
use crate::services::GROUND_HALF_EXTENT;

/// Setup the camera, lights, shared meshes and UI panels.
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    scene: Res<SceneRes>,
) {
    // Camera
    let camera = &scene.0.camera;
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(camera.position()).looking_at(camera.target(), Vec3::Y),
    ));

    // Main directional light (sun-like)
    commands.spawn((
        DirectionalLight {
            illuminance: 15000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Secondary fill light from opposite side
    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-8.0, 20.0, -8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Ambient light
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
    });

    commands.insert_resource(GraphMeshes {
        node: meshes.add(Cuboid::new(NODE_SIZE.x, NODE_SIZE.y, NODE_SIZE.z)),
        edge: meshes.add(Cylinder::new(1.0, 1.0)),
        arrow: meshes.add(Cone::new(ARROW_RADIUS, ARROW_HEIGHT)),
        ground: meshes.add(
            Plane3d::default()
                .mesh()
                .size(GROUND_HALF_EXTENT * 2.0, GROUND_HALF_EXTENT * 2.0),
        ),
    });

    // Status panel on the left
    commands
        .spawn((
            bevy::ui::Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                width: Val::Px(300.0),
                padding: UiRect::all(Val::Px(12.0)),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(COLOR_PANEL),
            BorderRadius::all(Val::Px(8.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Strata"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
                HudText,
            ));
        });

    // Breadcrumbs along the top
    commands.spawn((
        bevy::ui::Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(330.0),
            padding: UiRect::all(Val::Px(6.0)),
            flex_direction: FlexDirection::Row,
            column_gap: Val::Px(6.0),
            ..default()
        },
        BackgroundColor(COLOR_PANEL),
        BorderRadius::all(Val::Px(6.0)),
        BreadcrumbBar,
    ));

    // Notices in the bottom right
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.6, 0.4)),
        bevy::ui::Node {
            position_type: PositionType::Absolute,
            right: Val::Px(10.0),
            bottom: Val::Px(50.0),
            ..default()
        },
        NoticeText,
    ));

    // Controls legend at the bottom
    commands
        .spawn((
            bevy::ui::Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(COLOR_PANEL),
            BorderRadius::all(Val::Px(6.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(
                    "Click: drill in | Ctrl/Cmd+click: link | Double-click ground: new node | \
                     Del: delete hovered | Right-drag: orbit | Wheel: zoom/ride | WASD: pan | Esc: up",
                ),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.6)),
            ));
        });
}
