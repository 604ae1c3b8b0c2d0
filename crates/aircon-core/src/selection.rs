//! The single selected device

use crate::device::DeviceId;

/// Process-wide selection. Once set it only changes when another device is
/// selected; it survives the device disappearing from the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Option<DeviceId>);

impl Selection {
    pub fn get(&self) -> Option<&DeviceId> {
        self.0.as_ref()
    }

    pub fn set(&mut self, id: DeviceId) {
        self.0 = Some(id);
    }

    pub fn is_selected(&self, id: &DeviceId) -> bool {
        self.0.as_ref() == Some(id)
    }
}
