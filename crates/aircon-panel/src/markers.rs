//! Scene entities for registry markers
//!
//! Each registry marker becomes a root entity with a body, an indicator lamp,
//! a floor ring and a label anchor as children. Every child carries a
//! [`DevicePart`] naming its device, so a hit on any part resolves to the same
//! identity without walking the hierarchy.

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use aircon_core::layout::LABEL_OFFSET;
use aircon_core::{Appearance, DeviceId, Marker};
use bevy::prelude::*;

use crate::app::PanelState;

const LAMP_COLOR: LinearRgba = LinearRgba::rgb(0.25, 0.72, 1.0);

/// Root of one marker, placed at the registry position
#[derive(Component)]
pub struct MarkerRoot {
    pub device_id: DeviceId,
}

/// Pickable piece of a marker
#[derive(Component, Debug, Clone)]
pub struct DevicePart {
    pub device_id: DeviceId,
    /// Hit radius around the part's origin
    pub radius: f32,
}

/// The pieces every marker is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Body,
    Lamp,
    Ring,
    Label,
}

/// Each part with its offset from the marker root and its hit radius
pub const MARKER_PARTS: [(PartKind, Vec3, f32); 4] = [
    (PartKind::Body, Vec3::ZERO, 0.5),
    (PartKind::Lamp, Vec3::new(0.3, 0.0, 0.17), 0.12),
    (PartKind::Ring, Vec3::new(0.0, -0.22, 0.0), 0.55),
    (PartKind::Label, Vec3::new(0.0, LABEL_OFFSET, 0.0), 0.3),
];

/// Anchor the egui label is drawn at
#[derive(Component)]
pub struct MarkerLabel {
    pub device_id: DeviceId,
}

/// Per-marker materials, so emphasis never bleeds into other markers
#[derive(Component)]
pub struct MarkerMaterials {
    pub lamp: Handle<StandardMaterial>,
    pub ring: Handle<StandardMaterial>,
}

/// Meshes shared by every marker
#[derive(Resource)]
pub struct MarkerMeshes {
    body: Handle<Mesh>,
    lamp: Handle<Mesh>,
    ring: Handle<Mesh>,
    body_material: Handle<StandardMaterial>,
}

pub struct MarkersPlugin;

impl Plugin for MarkersPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_marker_meshes).add_systems(
            Update,
            (spawn_new_markers, apply_marker_appearance)
                .chain()
                .run_if(resource_changed::<PanelState>),
        );
    }
}

pub fn lamp_emissive(intensity: f32) -> LinearRgba {
    LAMP_COLOR * intensity
}

pub fn ring_color(opacity: f32) -> Color {
    Color::srgb(0.2, 0.62, 1.0).with_alpha(opacity)
}

fn setup_marker_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(MarkerMeshes {
        body: meshes.add(Cuboid::new(0.9, 0.32, 0.32)),
        lamp: meshes.add(Sphere::new(0.07)),
        ring: meshes.add(Annulus::new(0.42, 0.55)),
        body_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.97, 0.98, 1.0),
            metallic: 0.1,
            perceptual_roughness: 0.5,
            ..default()
        }),
    });
}

/// Spawn entities for registry markers that have none yet
fn spawn_new_markers(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    state: Res<PanelState>,
    assets: Option<Res<MarkerMeshes>>,
    roots: Query<&MarkerRoot>,
) {
    let Some(assets) = assets else { return };
    let spawned: HashSet<&DeviceId> = roots.iter().map(|r| &r.device_id).collect();

    for marker in state.0.markers().all() {
        if spawned.contains(marker.id()) {
            continue;
        }
        spawn_marker(&mut commands, &mut materials, &assets, marker);
    }
}

fn spawn_marker(
    commands: &mut Commands,
    materials: &mut Assets<StandardMaterial>,
    assets: &MarkerMeshes,
    marker: &Marker,
) {
    let appearance = marker.appearance();
    let lamp = materials.add(StandardMaterial {
        base_color: Color::srgb(0.6, 0.85, 1.0),
        emissive: lamp_emissive(appearance.lamp_intensity),
        unlit: true,
        ..default()
    });
    let ring = materials.add(StandardMaterial {
        base_color: ring_color(appearance.ring_opacity),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let id = marker.id().clone();
    commands
        .spawn((
            Transform::from_translation(Vec3::from_array(marker.position()))
                .with_scale(Vec3::splat(appearance.scale)),
            Visibility::default(),
            MarkerRoot {
                device_id: id.clone(),
            },
            MarkerMaterials {
                lamp: lamp.clone(),
                ring: ring.clone(),
            },
        ))
        .with_children(|parent| {
            for (kind, offset, radius) in MARKER_PARTS {
                let part = DevicePart {
                    device_id: id.clone(),
                    radius,
                };
                let transform = Transform::from_translation(offset);
                match kind {
                    PartKind::Body => {
                        parent.spawn((
                            Mesh3d(assets.body.clone()),
                            MeshMaterial3d(assets.body_material.clone()),
                            transform,
                            part,
                        ));
                    }
                    PartKind::Lamp => {
                        parent.spawn((
                            Mesh3d(assets.lamp.clone()),
                            MeshMaterial3d(lamp.clone()),
                            transform,
                            part,
                        ));
                    }
                    PartKind::Ring => {
                        parent.spawn((
                            Mesh3d(assets.ring.clone()),
                            MeshMaterial3d(ring.clone()),
                            transform.with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
                            part,
                        ));
                    }
                    PartKind::Label => {
                        parent.spawn((
                            transform,
                            MarkerLabel {
                                device_id: id.clone(),
                            },
                            part,
                        ));
                    }
                }
            }
        });

    tracing::debug!(device = %id, position = ?marker.position(), "Spawned marker");
}

/// Push registry appearances onto marker entities
pub fn apply_marker_appearance(
    state: Res<PanelState>,
    mut roots: Query<(&MarkerRoot, &MarkerMaterials, &mut Transform)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (root, handles, mut transform) in roots.iter_mut() {
        let Some(marker) = state.0.markers().get(&root.device_id) else {
            continue;
        };
        let Appearance {
            lamp_intensity,
            ring_opacity,
            scale,
            ..
        } = marker.appearance();

        transform.scale = Vec3::splat(scale);
        if let Some(material) = materials.get_mut(&handles.lamp) {
            material.emissive = lamp_emissive(lamp_intensity);
        }
        if let Some(material) = materials.get_mut(&handles.ring) {
            material.base_color = ring_color(ring_opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aircon_core::{DeviceRecord, PanelContext, Reading};
    use std::collections::HashMap;

    fn marker_app(ids: &[(&str, i32)]) -> App {
        let mut context = PanelContext::new();
        context.apply_snapshot(
            ids.iter()
                .map(|(id, floor)| DeviceRecord {
                    ac_id: DeviceId::new(*id),
                    floor: Reading::from(*floor),
                    ..Default::default()
                })
                .collect(),
        );

        let mut app = App::new();
        app.init_resource::<Assets<StandardMaterial>>()
            .insert_resource(MarkerMeshes {
                body: Handle::default(),
                lamp: Handle::default(),
                ring: Handle::default(),
                body_material: Handle::default(),
            })
            .insert_resource(PanelState(context))
            .add_systems(Update, spawn_new_markers);
        app
    }

    #[test]
    fn test_spawned_parts_carry_owner_id() {
        let mut app = marker_app(&[("F1-AC1", 1), ("F3-AC2", 3)]);
        app.update();
        let world = app.world_mut();

        let roots: HashMap<Entity, DeviceId> = world
            .query::<(Entity, &MarkerRoot)>()
            .iter(world)
            .map(|(entity, root)| (entity, root.device_id.clone()))
            .collect();
        assert_eq!(roots.len(), 2);

        let mut per_root: HashMap<Entity, usize> = HashMap::new();
        for (part, child_of) in world.query::<(&DevicePart, &ChildOf)>().iter(world) {
            assert_eq!(roots.get(&child_of.parent()), Some(&part.device_id));
            *per_root.entry(child_of.parent()).or_default() += 1;
        }
        assert_eq!(per_root.len(), 2);
        assert!(per_root.values().all(|&n| n == MARKER_PARTS.len()));

        let labels = world.query::<&MarkerLabel>().iter(world).count();
        assert_eq!(labels, 2);
    }

    #[test]
    fn test_markers_spawn_once() {
        let mut app = marker_app(&[("F2-AC1", 2)]);
        app.update();
        app.world_mut().resource_mut::<PanelState>().set_changed();
        app.update();
        let world = app.world_mut();
        assert_eq!(world.query::<&MarkerRoot>().iter(world).count(), 1);
    }

    #[test]
    fn test_active_lamp_is_brighter() {
        let active = lamp_emissive(Appearance::ACTIVE.lamp_intensity);
        let inactive = lamp_emissive(Appearance::INACTIVE.lamp_intensity);
        assert!(active.blue > inactive.blue);
        assert!(active.green > inactive.green);
    }

    #[test]
    fn test_ring_color_carries_opacity() {
        assert!((ring_color(0.28).alpha() - 0.28).abs() < 1e-6);
        assert!((ring_color(Appearance::INACTIVE.ring_opacity).alpha() - 0.16).abs() < 1e-6);
    }
}
