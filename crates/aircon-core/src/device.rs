//! Device records as reported by the backend snapshot
//!
//! Records are trusted wire data: every field is decoded leniently so that a
//! malformed entry degrades to empty display values instead of rejecting the
//! whole snapshot.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Error returned when text is not of the form `F<digit>-AC<digit>`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid device id '{0}' (expected F<digit>-AC<digit>)")]
pub struct InvalidDeviceId(pub String);

/// Identity of a climate-control unit, e.g. `F3-AC1`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    /// Wrap an id exactly as received from the backend
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse user-typed text (case-insensitive), normalized to uppercase
    pub fn parse(text: &str) -> Result<Self, InvalidDeviceId> {
        if is_device_id(text) {
            Ok(Self(text.to_ascii_uppercase()))
        } else {
            Err(InvalidDeviceId(text.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Units whose id ends in `AC1` are mounted on the left side of their floor
    pub fn is_left_unit(&self) -> bool {
        self.0.ends_with("AC1")
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Matches `F\d-AC\d`, ignoring ASCII case
pub(crate) fn is_device_id(text: &str) -> bool {
    let b = text.as_bytes();
    b.len() == 6
        && b[0].eq_ignore_ascii_case(&b'F')
        && b[1].is_ascii_digit()
        && b[2] == b'-'
        && b[3].eq_ignore_ascii_case(&b'A')
        && b[4].eq_ignore_ascii_case(&b'C')
        && b[5].is_ascii_digit()
}

/// Power state of a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerStatus {
    On,
    Off,
    /// Anything else the backend reported, kept verbatim for display
    Unknown(String),
}

impl PowerStatus {
    /// Case-insensitive `on`/`off`
    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("on") {
            Some(Self::On)
        } else if text.eq_ignore_ascii_case("off") {
            Some(Self::Off)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for PowerStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PowerStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PowerStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(Self::from_wire(value.as_ref()))
    }
}

impl PowerStatus {
    fn from_wire(value: Option<&Value>) -> Self {
        let raw = value_text(value);
        Self::parse(&raw).unwrap_or(Self::Unknown(raw))
    }
}

/// Operating mode of a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Cooling,
    Heating,
    Fan,
    Unknown(String),
}

impl Mode {
    /// Case-insensitive `cooling`/`heating`/`fan`
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "cooling" => Some(Self::Cooling),
            "heating" => Some(Self::Heating),
            "fan" => Some(Self::Fan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Cooling => "Cooling",
            Self::Heating => "Heating",
            Self::Fan => "Fan",
            Self::Unknown(raw) => raw,
        }
    }

    fn from_wire(value: Option<&Value>) -> Self {
        let raw = value_text(value);
        Self::parse(&raw).unwrap_or(Self::Unknown(raw))
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Mode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(Self::from_wire(value.as_ref()))
    }
}

/// A numeric field kept as received for display, with its parsed value.
///
/// `"22.0"` stays `22.0` and `"N/A"` stays `N/A`; only JSON numbers are
/// rendered, using the shortest form (`22`, `24.5`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    raw: String,
    value: Option<f64>,
}

impl Reading {
    fn from_wire(value: Option<&Value>) -> Self {
        let raw = match value {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if !n.is_i64() && !n.is_u64() => v.to_string(),
                _ => n.to_string(),
            },
            other => value_text(other),
        };
        Self {
            raw,
            value: value_number(value),
        }
    }

    /// Display text exactly as received
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl From<f64> for Reading {
    fn from(v: f64) -> Self {
        Self {
            raw: v.to_string(),
            value: Some(v),
        }
    }
}

impl From<i32> for Reading {
    fn from(v: i32) -> Self {
        Self::from(f64::from(v))
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Some(v) if v.to_string() == self.raw => serializer.serialize_f64(v),
            _ if self.raw.is_empty() => serializer.serialize_none(),
            _ => serializer.serialize_str(&self.raw),
        }
    }
}

/// One unit in a backend snapshot. Replaced wholesale on every poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct DeviceRecord {
    pub ac_id: DeviceId,
    /// Building floor; its integer value decides the vertical placement tier
    pub floor: Reading,
    pub room: String,
    pub status: PowerStatus,
    pub current_temp: Reading,
    pub set_temp: Reading,
    pub mode: Mode,
    pub health: String,
    pub last_service: String,
    /// Snapshot timestamp, opaque display text
    pub timestamp: String,
}

/// Wire shape with every key optional and untyped
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    ac_id: Option<Value>,
    #[serde(default)]
    floor: Option<Value>,
    #[serde(default)]
    room: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    current_temp: Option<Value>,
    #[serde(default)]
    set_temp: Option<Value>,
    #[serde(default)]
    mode: Option<Value>,
    #[serde(default)]
    health: Option<Value>,
    #[serde(default)]
    last_service: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
}

impl From<RawRecord> for DeviceRecord {
    fn from(raw: RawRecord) -> Self {
        DeviceRecord {
            ac_id: DeviceId(value_text(raw.ac_id.as_ref())),
            floor: Reading::from_wire(raw.floor.as_ref()),
            room: value_text(raw.room.as_ref()),
            status: PowerStatus::from_wire(raw.status.as_ref()),
            current_temp: Reading::from_wire(raw.current_temp.as_ref()),
            set_temp: Reading::from_wire(raw.set_temp.as_ref()),
            mode: Mode::from_wire(raw.mode.as_ref()),
            health: value_text(raw.health.as_ref()),
            last_service: value_text(raw.last_service.as_ref()),
            timestamp: value_text(raw.timestamp.as_ref()),
        }
    }
}

impl DeviceRecord {
    /// Floor number when the floor field holds an integer
    pub fn floor_level(&self) -> Option<i32> {
        self.floor
            .value()
            .filter(|f| f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX))
            .map(|f| f as i32)
    }
}

/// Render any JSON scalar as display text; null and missing become empty
fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Accept JSON numbers and numeric strings
fn value_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_device_id_parse_normalizes_case() {
        assert_eq!(DeviceId::parse("f3-ac1").unwrap().as_str(), "F3-AC1");
        assert_eq!(DeviceId::parse("F1-Ac2").unwrap().as_str(), "F1-AC2");
    }

    #[test]
    fn test_device_id_parse_rejects_other_shapes() {
        assert!(DeviceId::parse("F10-AC1").is_err());
        assert!(DeviceId::parse("F1AC1").is_err());
        assert!(DeviceId::parse("G1-AC1").is_err());
        assert!(DeviceId::parse("").is_err());
    }

    #[test]
    fn test_left_unit_rule() {
        assert!(DeviceId::new("F2-AC1").is_left_unit());
        assert!(!DeviceId::new("F2-AC2").is_left_unit());
    }

    #[test]
    fn test_record_from_string_fields() {
        // The reference backend stores every column as text
        let record: DeviceRecord = serde_json::from_value(json!({
            "ac_id": "F1-AC1",
            "floor": "1",
            "room": "Lobby",
            "status": "ON",
            "current_temp": "24.5",
            "set_temp": "22",
            "mode": "Cooling",
            "health": "OK",
            "last_service": "2024-01-10",
            "timestamp": "2024-03-01 10:00:00"
        }))
        .unwrap();

        assert_eq!(record.ac_id.as_str(), "F1-AC1");
        assert_eq!(record.floor_level(), Some(1));
        assert_eq!(record.status, PowerStatus::On);
        assert_eq!(record.current_temp.value(), Some(24.5));
        assert_eq!(record.set_temp.value(), Some(22.0));
        assert_eq!(record.set_temp.as_str(), "22");
        assert_eq!(record.mode, Mode::Cooling);
    }

    #[test]
    fn test_record_missing_fields_degrade_to_empty() {
        let record: DeviceRecord = serde_json::from_value(json!({ "ac_id": "F2-AC2" })).unwrap();
        assert_eq!(record.floor_level(), None);
        assert_eq!(record.room, "");
        assert!(record.current_temp.is_empty());
        assert_eq!(record.current_temp.value(), None);
        assert_eq!(record.status, PowerStatus::Unknown(String::new()));
        assert_eq!(record.mode.as_str(), "");
    }

    #[test]
    fn test_record_unknown_enumerations_kept_verbatim() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "ac_id": "F2-AC2",
            "status": "STANDBY",
            "mode": "Dry",
            "set_temp": "warm"
        }))
        .unwrap();
        assert_eq!(record.status.as_str(), "STANDBY");
        assert_eq!(record.mode.as_str(), "Dry");
        assert_eq!(record.set_temp.value(), None);
        assert_eq!(record.set_temp.as_str(), "warm");
    }

    #[test]
    fn test_readings_keep_wire_text() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "ac_id": "F1-AC1",
            "floor": "Ground",
            "current_temp": 24.5,
            "set_temp": "22.0"
        }))
        .unwrap();
        assert_eq!(record.floor.as_str(), "Ground");
        assert_eq!(record.floor_level(), None);
        assert_eq!(record.current_temp.as_str(), "24.5");
        assert_eq!(record.set_temp.as_str(), "22.0");
        assert_eq!(record.set_temp.value(), Some(22.0));

        let record: DeviceRecord =
            serde_json::from_value(json!({ "ac_id": "F2-AC1", "floor": 2, "set_temp": 21.0 })).unwrap();
        assert_eq!(record.floor.as_str(), "2");
        assert_eq!(record.floor_level(), Some(2));
        assert_eq!(record.set_temp.as_str(), "21");
    }

    #[test]
    fn test_record_serializes_typed_values() {
        let record = DeviceRecord {
            ac_id: DeviceId::new("F3-AC2"),
            floor: Reading::from(3),
            status: PowerStatus::Off,
            set_temp: Reading::from(21.5),
            mode: Mode::Heating,
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["ac_id"], "F3-AC2");
        assert_eq!(value["status"], "OFF");
        assert_eq!(value["mode"], "Heating");
        assert_eq!(value["set_temp"], 21.5);
        assert_eq!(value["floor"], 3.0);
        assert_eq!(value["current_temp"], Value::Null);
    }
}
