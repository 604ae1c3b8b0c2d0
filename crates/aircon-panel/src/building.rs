//! Static building geometry: ground, floor slabs, outer walls and roof

use aircon_core::layout::{
    BUILDING_CENTER, BUILDING_DEPTH, BUILDING_HEIGHT, BUILDING_WIDTH, FLOOR_BASE_HEIGHTS,
};
use aircon_core::presentation::WALL_BASE_OPACITY;
use aircon_core::WallFace;
use bevy::prelude::*;

const SLAB_THICKNESS: f32 = 0.12;
const WALL_THICKNESS: f32 = 0.06;
const ROOF_THICKNESS: f32 = 0.1;

/// One of the three floor slabs, moved by floor separation
#[derive(Component)]
pub struct FloorSlab {
    pub index: usize,
}

/// Outer wall; owns its material so it can fade alone
#[derive(Component)]
pub struct Wall {
    pub face: WallFace,
}

#[derive(Component)]
pub struct Roof;

pub struct BuildingPlugin;

impl Plugin for BuildingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_building);
    }
}

/// Center and size of a wall face
fn wall_geometry(face: WallFace) -> (Vec3, Vec3) {
    let center = Vec3::from_array(BUILDING_CENTER);
    let half_w = BUILDING_WIDTH / 2.0;
    let half_d = BUILDING_DEPTH / 2.0;
    match face {
        WallFace::Front => (
            center + Vec3::Z * half_d,
            Vec3::new(BUILDING_WIDTH, BUILDING_HEIGHT, WALL_THICKNESS),
        ),
        WallFace::Back => (
            center - Vec3::Z * half_d,
            Vec3::new(BUILDING_WIDTH, BUILDING_HEIGHT, WALL_THICKNESS),
        ),
        WallFace::Left => (
            center - Vec3::X * half_w,
            Vec3::new(WALL_THICKNESS, BUILDING_HEIGHT, BUILDING_DEPTH),
        ),
        WallFace::Right => (
            center + Vec3::X * half_w,
            Vec3::new(WALL_THICKNESS, BUILDING_HEIGHT, BUILDING_DEPTH),
        ),
    }
}

fn glass(opacity: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgba(0.72, 0.8, 0.9, opacity),
        perceptual_roughness: 0.2,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

fn setup_building(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Key light from the front, fill from behind
    commands.spawn((
        DirectionalLight {
            illuminance: 9000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 2500.0,
            shadows_enabled: false,
            color: Color::srgb(0.9, 0.95, 1.0),
            ..default()
        },
        Transform::from_xyz(-10.0, 8.0, -12.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Ground
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(40.0, 0.1, 40.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.86, 0.89, 0.92),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.05, 0.0),
    ));

    let slab_mesh = meshes.add(Cuboid::new(BUILDING_WIDTH, SLAB_THICKNESS, BUILDING_DEPTH));
    let slab_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.95, 0.96, 0.98, 0.92),
        perceptual_roughness: 0.6,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    for (index, height) in FLOOR_BASE_HEIGHTS.iter().enumerate() {
        commands.spawn((
            Mesh3d(slab_mesh.clone()),
            MeshMaterial3d(slab_material.clone()),
            Transform::from_xyz(0.0, *height, 0.0),
            FloorSlab { index },
        ));
    }

    for face in WallFace::ALL {
        let (center, size) = wall_geometry(face);
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(glass(WALL_BASE_OPACITY))),
            Transform::from_translation(center),
            Wall { face },
        ));
    }

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(BUILDING_WIDTH, ROOF_THICKNESS, BUILDING_DEPTH))),
        MeshMaterial3d(materials.add(glass(WALL_BASE_OPACITY))),
        Transform::from_xyz(
            0.0,
            BUILDING_CENTER[1] + BUILDING_HEIGHT / 2.0 + ROOF_THICKNESS / 2.0,
            0.0,
        ),
        Roof,
    ));
}
