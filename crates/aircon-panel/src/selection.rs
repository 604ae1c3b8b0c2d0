//! Selection requests from the scene and the device list

use aircon_core::DeviceId;
use bevy::prelude::*;

use crate::app::PanelState;
use crate::camera::CameraSettings;

/// Request to select a device
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SelectDevice(pub DeviceId);

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SelectDevice>()
            .add_systems(Update, apply_selection);
    }
}

/// Select the device and re-center the camera orbit on its marker
fn apply_selection(
    mut requests: MessageReader<SelectDevice>,
    mut state: ResMut<PanelState>,
    mut camera_settings: ResMut<CameraSettings>,
) {
    for SelectDevice(id) in requests.read() {
        tracing::info!(device = %id, "Selected");
        if let Some(position) = state.0.select(id.clone()) {
            camera_settings.target_focus = Vec3::from_array(position);
        }
    }
}
