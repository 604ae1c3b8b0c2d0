//! Per-frame scene animation: floor separation, selection pulse, wall fading

use aircon_core::presentation::wall_opacity;
use aircon_core::{FloorSeparation, SelectionPulse};
use bevy::prelude::*;

use crate::app::{PanelState, SceneControls};
use crate::building::{FloorSlab, Roof, Wall};
use crate::camera::MainCamera;
use crate::markers::{apply_marker_appearance, MarkerRoot};

#[derive(Resource, Default)]
pub struct Separation(pub FloorSeparation);

#[derive(Resource, Default)]
pub struct Pulse(pub SelectionPulse);

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Separation>()
            .init_resource::<Pulse>()
            .add_systems(
                Update,
                (
                    ease_floor_separation,
                    pulse_selected_marker.after(apply_marker_appearance),
                    fade_walls,
                ),
            );
    }
}

/// Ease toward the slider value and move the slabs. Markers stay put.
fn ease_floor_separation(
    controls: Res<SceneControls>,
    mut separation: ResMut<Separation>,
    mut slabs: Query<(&FloorSlab, &mut Transform)>,
) {
    separation.0.target = controls.separation;
    separation.0.step();

    let heights = separation.0.slab_heights();
    for (slab, mut transform) in slabs.iter_mut() {
        if let Some(height) = heights.get(slab.index) {
            transform.translation.y = *height;
        }
    }
}

fn pulse_selected_marker(
    state: Res<PanelState>,
    mut pulse: ResMut<Pulse>,
    mut roots: Query<(&MarkerRoot, &mut Transform)>,
) {
    if state.0.selected().is_none() {
        return;
    }
    let scale = pulse.0.step();
    for (root, mut transform) in roots.iter_mut() {
        if state.0.is_selected(&root.device_id) {
            transform.scale = Vec3::splat(scale);
        }
    }
}

/// Fade the wall nearest the camera; hide walls and roof when toggled off
fn fade_walls(
    controls: Res<SceneControls>,
    camera_query: Query<&GlobalTransform, With<MainCamera>>,
    mut walls: Query<(&Wall, &MeshMaterial3d<StandardMaterial>, &mut Visibility), Without<Roof>>,
    mut roof: Query<&mut Visibility, (With<Roof>, Without<Wall>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let visibility = if controls.walls_visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut roof_visibility in roof.iter_mut() {
        roof_visibility.set_if_neq(visibility);
    }

    let camera = camera_query
        .single()
        .ok()
        .map(|t| t.translation().to_array());

    for (wall, material, mut wall_visibility) in walls.iter_mut() {
        wall_visibility.set_if_neq(visibility);
        if !controls.walls_visible {
            continue;
        }
        let opacity = wall_opacity(wall.face, camera);
        if let Some(material) = materials.get_mut(&material.0) {
            if material.base_color.alpha() != opacity {
                material.base_color.set_alpha(opacity);
            }
        }
    }
}
