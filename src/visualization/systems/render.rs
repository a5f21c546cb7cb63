//! Graph geometry: rebuilt on structural or visibility change, restyled
//! every frame for opacity and hover.

use bevy::prelude::*;
use bevy::ui::PositionType;
use tracing::debug;

use crate::models::{CameraMode, LayerId};
use crate::visualization::components::{GraphEdge, GraphNode, LayerGeometry, LayerGround, NodeLabel};
use crate::visualization::constants::{
    edge_radius, ARROW_HEIGHT, COLOR_EDGE, COLOR_GROUND, COLOR_LINK_SOURCE, COLOR_MASTER_PATH,
    COLOR_NODE, COLOR_NODE_HOVER, GROUND_ALPHA, NODE_SIZE,
};
use crate::visualization::resources::{
    GraphMeshes, LayerMaterials, LayerPalette, RenderState, SceneRes,
};

/// Master path samples drawn while riding.
const PATH_SAMPLES: usize = 100;

fn layer_material(color: Color, emissive: LinearRgba) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        metallic: 0.3,
        perceptual_roughness: 0.5,
        reflectance: 0.3,
        emissive,
        alpha_mode: AlphaMode::Blend,
        ..default()
    }
}

fn glow(color: Color, strength: f32) -> LinearRgba {
    let [r, g, b] = color.to_srgba().to_f32_array_no_alpha();
    LinearRgba::new(r * strength, g * strength, b * strength, 1.0)
}

fn new_palette(materials: &mut Assets<StandardMaterial>) -> LayerPalette {
    LayerPalette {
        node: materials.add(layer_material(COLOR_NODE, LinearRgba::BLACK)),
        hover: materials.add(layer_material(COLOR_NODE_HOVER, glow(COLOR_NODE_HOVER, 1.5))),
        link: materials.add(layer_material(COLOR_LINK_SOURCE, glow(COLOR_LINK_SOURCE, 1.5))),
        edge: materials.add(layer_material(COLOR_EDGE, LinearRgba::BLACK)),
        ground: materials.add(StandardMaterial {
            base_color: COLOR_GROUND.with_alpha(GROUND_ALPHA),
            perceptual_roughness: 0.9,
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            ..default()
        }),
        // Forces the first opacity pass to write
        opacity: -1.0,
    }
}

/// Despawn and respawn layer geometry when the graph revision or the set of
/// visible layers changed.
pub fn rebuild_geometry_system(
    mut commands: Commands,
    scene: Res<SceneRes>,
    meshes: Res<GraphMeshes>,
    mut state: ResMut<RenderState>,
    mut palettes: ResMut<LayerMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing: Query<Entity, With<LayerGeometry>>,
) {
    let scene = &scene.0;
    let revision = scene.graph.revision();
    let mut visible: Vec<LayerId> = scene
        .graph
        .layers()
        .iter()
        .map(|l| l.id)
        .filter(|id| scene.nav.is_visible(*id))
        .collect();
    visible.sort();

    if state.revision == Some(revision) && state.visible == visible {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn_recursive();
    }
    palettes.0.retain(|id, _| visible.contains(id));

    let label_font = TextFont {
        font_size: 11.0,
        ..default()
    };
    let label_color = TextColor(Color::srgba(0.9, 0.9, 0.9, 0.85));
    let current = scene.nav.current_layer();

    for &id in &visible {
        let Some(layer) = scene.graph.layer(id) else {
            continue;
        };
        let palette = palettes
            .0
            .entry(id)
            .or_insert_with(|| new_palette(&mut materials))
            .clone();

        commands.spawn((
            Mesh3d(meshes.ground.clone()),
            MeshMaterial3d(palette.ground.clone()),
            Transform::from_xyz(layer.origin.x, layer.vertical_offset, layer.origin.y),
            LayerGround,
            LayerGeometry,
        ));

        let lift = Vec3::Y * (NODE_SIZE.y / 2.0);
        for node in layer.nodes() {
            let world = layer.world_position(node) + lift;
            commands.spawn((
                Mesh3d(meshes.node.clone()),
                MeshMaterial3d(palette.node.clone()),
                Transform::from_translation(world),
                GraphNode {
                    layer: id,
                    id: node.id.clone(),
                },
                LayerGeometry,
            ));

            // Previewed layers stay unlabelled
            if id == current {
                commands.spawn((
                    Text::new(node.label.clone()),
                    label_font.clone(),
                    label_color,
                    bevy::ui::Node {
                        position_type: PositionType::Absolute,
                        ..default()
                    },
                    Visibility::Hidden,
                    NodeLabel {
                        anchor: world + Vec3::Y * 0.6,
                    },
                    LayerGeometry,
                ));
            }
        }

        for edge in layer.edges() {
            let (Some(from), Some(to)) = (layer.node(&edge.from), layer.node(&edge.to)) else {
                continue;
            };
            let from_pos = layer.world_position(from) + lift;
            let to_pos = layer.world_position(to) + lift;
            let direction = to_pos - from_pos;
            let length = direction.length();
            if length <= 0.01 {
                continue;
            }
            let dir_norm = direction / length;
            let rotation = Quat::from_rotation_arc(Vec3::Y, dir_norm);
            let radius = edge_radius(edge.weight);

            commands.spawn((
                Mesh3d(meshes.edge.clone()),
                MeshMaterial3d(palette.edge.clone()),
                Transform::from_translation((from_pos + to_pos) / 2.0)
                    .with_rotation(rotation)
                    .with_scale(Vec3::new(radius, length, radius)),
                GraphEdge,
                LayerGeometry,
            ));

            // Arrowhead just short of the target box
            let arrow_pos = to_pos - dir_norm * (NODE_SIZE.x / 2.0 + ARROW_HEIGHT / 2.0);
            commands.spawn((
                Mesh3d(meshes.arrow.clone()),
                MeshMaterial3d(palette.edge.clone()),
                Transform::from_translation(arrow_pos).with_rotation(rotation),
                GraphEdge,
                LayerGeometry,
            ));
        }
    }

    debug!("Rebuilt geometry for layers {:?} (revision {})", visible, revision);
    state.revision = Some(revision);
    state.visible = visible;
}

/// Write each layer's opacity into its materials.
pub fn apply_layer_opacity_system(
    scene: Res<SceneRes>,
    mut palettes: ResMut<LayerMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let nav = &scene.0.nav;
    for (id, palette) in palettes.0.iter_mut() {
        let opacity = nav.layer_opacity(*id);
        if (palette.opacity - opacity).abs() < 0.001 {
            continue;
        }
        palette.opacity = opacity;

        for handle in [&palette.node, &palette.hover, &palette.link, &palette.edge] {
            if let Some(material) = materials.get_mut(handle) {
                material.base_color.set_alpha(opacity);
            }
        }
        if let Some(ground) = materials.get_mut(&palette.ground) {
            ground.base_color.set_alpha(opacity * GROUND_ALPHA);
        }
    }
}

/// Glow the hovered node and the pending link source.
pub fn update_hover_glow_system(
    scene: Res<SceneRes>,
    palettes: Res<LayerMaterials>,
    mut node_query: Query<(&GraphNode, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let scene = &scene.0;
    let current = scene.nav.current_layer();
    let hovered = scene.router.hovered();
    let link_source = scene.router.link_source();

    for (node, mut material) in node_query.iter_mut() {
        let Some(palette) = palettes.0.get(&node.layer) else {
            continue;
        };
        let is_current = node.layer == current;
        let handle = if is_current && link_source == Some(node.id.as_str()) {
            &palette.link
        } else if is_current && hovered == Some(node.id.as_str()) {
            &palette.hover
        } else {
            &palette.node
        };
        if material.0 != *handle {
            *material = MeshMaterial3d(handle.clone());
        }
    }
}

/// Draw the master path while the camera rides it.
pub fn draw_master_path_system(scene: Res<SceneRes>, mut gizmos: Gizmos) {
    let camera = &scene.0.camera;
    if camera.mode() != CameraMode::Ride {
        return;
    }
    gizmos.linestrip(camera.master_path().sample(PATH_SAMPLES), COLOR_MASTER_PATH);
}
