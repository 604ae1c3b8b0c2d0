//! Orbit camera
//!
//! Left drag orbits, right drag pans, the wheel zooms. Selection moves
//! `target_focus`; the orbit target eases toward it every frame.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;

/// Initial eye position
pub const START_EYE: Vec3 = Vec3::new(14.0, 10.0, 18.0);
/// Initial orbit target
pub const START_TARGET: Vec3 = Vec3::new(0.0, 3.4, 0.0);

/// Camera controller settings (Y up)
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub distance: f32,
    pub target_distance: f32, // For smooth zoom
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3, // For smooth re-centering
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::looking_from(START_EYE, START_TARGET)
    }
}

impl CameraSettings {
    /// Orbit parameters that put the eye at `eye` looking at `target`
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(0.01);
        Self {
            distance,
            target_distance: distance,
            azimuth: offset.x.atan2(offset.z),
            elevation: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            target,
            target_focus: target,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.15,
        }
    }

    /// Eye position for the current orbit
    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.elevation.cos();
        self.target
            + Vec3::new(
                horizontal * self.azimuth.sin(),
                self.distance * self.elevation.sin(),
                horizontal * self.azimuth.cos(),
            )
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, update_camera);
    }
}

fn setup_camera(mut commands: Commands, settings: Res<CameraSettings>) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(settings.eye()).looking_at(settings.target, Vec3::Y),
        MainCamera,
    ));
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Check if egui wants the mouse - if so, don't process camera controls
    let egui_wants_pointer = contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.wants_pointer_input());

    let motion = mouse_motion.delta;

    if !egui_wants_pointer {
        if mouse_button.pressed(MouseButton::Left) {
            settings.azimuth -= motion.x * settings.sensitivity;
            settings.elevation =
                (settings.elevation + motion.y * settings.sensitivity).clamp(0.05, 1.5);
        }

        // Pan in the view plane
        if mouse_button.pressed(MouseButton::Right) {
            let right = Vec3::new(settings.azimuth.cos(), 0.0, -settings.azimuth.sin());
            let pan_speed = settings.distance * 0.002;
            settings.target_focus -= right * motion.x * pan_speed;
            settings.target_focus += Vec3::Y * motion.y * pan_speed;
        }

        if mouse_scroll.delta.y != 0.0 {
            let zoom_factor = 1.0 - mouse_scroll.delta.y * settings.zoom_speed * 0.3;
            settings.target_distance = (settings.target_distance * zoom_factor).clamp(4.0, 60.0);
        }
    }

    // Smooth interpolation for zoom and target
    let dt = time.delta_secs();
    let lerp_factor = 1.0 - (-settings.smooth_factor * 60.0 * dt).exp();
    settings.distance += (settings.target_distance - settings.distance) * lerp_factor;
    let target = settings.target + (settings.target_focus - settings.target) * lerp_factor;
    settings.target = target;

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = settings.eye();
        transform.look_at(settings.target, Vec3::Y);
    }
}
