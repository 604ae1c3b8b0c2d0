//! Wire types shared by the panel client and the backend service

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::device::{DeviceId, DeviceRecord};

/// Identity attached to commands sent from the control panel
pub const DEFAULT_USER: &str = "Admin";

/// Body of `GET /ac`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotResponse {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<DeviceRecord>,
}

/// Keep every object entry, drop entries that are not objects at all
fn lenient_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<DeviceRecord>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut items = Vec::with_capacity(raw.len());
    for entry in raw {
        if !entry.is_object() {
            tracing::warn!(entry = %entry, "Skipping snapshot entry that is not a record");
            continue;
        }
        match serde_json::from_value::<DeviceRecord>(entry) {
            Ok(record) => items.push(record),
            Err(e) => tracing::warn!(error = %e, "Skipping undecodable snapshot entry"),
        }
    }
    Ok(items)
}

/// A command value: numeric for temperatures, text for status and mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for CommandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Body of `POST /command`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default = "default_user")]
    pub user: String,
    pub action: String,
    pub ac_id: DeviceId,
    pub value: CommandValue,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

/// Successful `POST /command` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandApplied {
    #[serde(default)]
    pub ok: bool,
    pub action: String,
    pub ac_id: DeviceId,
    pub new_value: CommandValue,
}

impl CommandApplied {
    /// Acknowledgment line shown in the chat
    pub fn acknowledgment(&self) -> String {
        format!("✅ Applied: {} on {} → {}", self.action, self.ac_id, self.new_value)
    }
}

/// Error body returned by the backend: `{ "detail": ... }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    /// Human-readable detail: strings verbatim, other values as JSON text
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
