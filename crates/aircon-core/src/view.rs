//! Display strings for the device list, detail panel and hover tooltip

use crate::device::{DeviceId, DeviceRecord};

/// Contents of the selected-device panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    pub meta: String,
    pub status: String,
    pub current_temp: String,
    pub set_temp: String,
    pub mode: String,
    pub health: String,
    pub service: String,
}

impl DetailView {
    pub fn from_record(record: &DeviceRecord) -> Self {
        Self {
            name: record.ac_id.to_string(),
            meta: format!("Floor {} • {}", record.floor, record.room),
            status: record.status.to_string(),
            current_temp: record.current_temp.to_string(),
            set_temp: record.set_temp.to_string(),
            mode: record.mode.to_string(),
            health: record.health.clone(),
            service: format!(
                "Last service: {} • Snapshot: {}",
                record.last_service, record.timestamp
            ),
        }
    }
}

/// One entry of the device list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: DeviceId,
    pub meta: String,
    pub pill: String,
}

impl ListRow {
    pub fn from_record(record: &DeviceRecord) -> Self {
        Self {
            id: record.ac_id.clone(),
            meta: format!(
                "Floor {} • {} • {} • Set {}°C",
                record.floor, record.room, record.status, record.set_temp
            ),
            pill: format!("{}°C", record.current_temp),
        }
    }
}

/// Hover text; the bare id when the device is not in the current snapshot
pub fn tooltip_text(id: &DeviceId, record: Option<&DeviceRecord>) -> String {
    match record {
        Some(r) => format!(
            "{} • {} • {}°C (set {}°C)",
            id, r.status, r.current_temp, r.set_temp
        ),
        None => id.to_string(),
    }
}
