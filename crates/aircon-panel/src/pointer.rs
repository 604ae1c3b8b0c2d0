//! Pointer resolver: screen position to device identity
//!
//! Casts a ray from the main camera through the cursor and tests it against
//! every [`DevicePart`]. The nearest part along the ray wins. Used for both
//! click-to-select and hover tooltips.

use aircon_core::DeviceId;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::app::HoverState;
use crate::camera::MainCamera;
use crate::markers::DevicePart;
use crate::selection::SelectDevice;

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (update_hover, handle_click));
    }
}

/// Distance along the ray to the closest approach of `center`, if the ray
/// passes within `radius` of it in front of the origin
pub fn ray_hit(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_part = center - origin;
    let t = to_part.dot(direction);
    if t < 0.0 {
        return None;
    }
    let closest_point = origin + direction * t;
    ((closest_point - center).length_squared() < radius * radius).then_some(t)
}

/// Device owning the nearest part hit by the ray
pub fn resolve_hit<'a>(
    origin: Vec3,
    direction: Vec3,
    parts: impl IntoIterator<Item = (&'a DevicePart, Vec3)>,
) -> Option<DeviceId> {
    let mut closest: Option<(f32, &DeviceId)> = None;
    for (part, center) in parts {
        let Some(t) = ray_hit(origin, direction, center, part.radius) else {
            continue;
        };
        if closest.is_none_or(|(best, _)| t < best) {
            closest = Some((t, &part.device_id));
        }
    }
    closest.map(|(_, id)| id.clone())
}

/// Resolve a cursor position against the scene
fn resolve_at(
    cursor: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    parts: &Query<(&DevicePart, &GlobalTransform)>,
) -> Option<DeviceId> {
    let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
    resolve_hit(
        ray.origin,
        *ray.direction,
        parts.iter().map(|(part, t)| (part, t.translation())),
    )
}

fn update_hover(
    mut hover: ResMut<HoverState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    parts: Query<(&DevicePart, &GlobalTransform)>,
    mut contexts: bevy_egui::EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.wants_pointer_input());

    let cursor = windows.single().ok().and_then(|w| w.cursor_position());
    let device = match (cursor, camera_query.single()) {
        (Some(pos), Ok((camera, transform))) if !egui_wants_pointer => {
            resolve_at(pos, camera, transform, &parts)
        }
        _ => None,
    };

    if hover.device != device || hover.cursor != cursor {
        hover.device = device;
        hover.cursor = cursor;
    }
}

fn handle_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    parts: Query<(&DevicePart, &GlobalTransform)>,
    mut contexts: bevy_egui::EguiContexts,
    mut select: MessageWriter<SelectDevice>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    // Check if egui wants the pointer
    if contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.wants_pointer_input())
    {
        return;
    }

    let Some(cursor) = windows.single().ok().and_then(|w| w.cursor_position()) else {
        return;
    };
    let Ok((camera, transform)) = camera_query.single() else {
        return;
    };

    if let Some(id) = resolve_at(cursor, camera, transform, &parts) {
        select.write(SelectDevice(id));
    }
}
