//! Free-text command grammar
//!
//! Three fixed productions, tried in priority order, case-insensitive:
//!
//! ```text
//! set  <id> to <number>              -> set_temp
//! turn <on|off> <id>                 -> set_status
//! mode <id> <cooling|heating|fan>    -> set_mode
//! ```
//!
//! `<id>` is `F<digit>-AC<digit>` and `<number>` is `digits[.digits]`.
//! Parsing is pure; nothing here touches the network.

use thiserror::Error;

use crate::api::{CommandRequest, CommandValue};
use crate::device::{DeviceId, Mode, PowerStatus};

/// Shown whenever text does not match any production
pub const USAGE_HINT: &str = "Try: set F3-AC1 to 21 • turn off F1-AC2 • mode F2-AC1 cooling";

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{}", USAGE_HINT)]
pub struct UnrecognizedCommand;

/// What a command asks the unit to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetTemp(f64),
    SetStatus(PowerStatus),
    SetMode(Mode),
}

impl Action {
    /// Backend action name
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetTemp(_) => "set_temp",
            Self::SetStatus(_) => "set_status",
            Self::SetMode(_) => "set_mode",
        }
    }

    pub fn value(&self) -> CommandValue {
        match self {
            Self::SetTemp(t) => CommandValue::Number(*t),
            Self::SetStatus(s) => CommandValue::Text(s.as_str().to_string()),
            Self::SetMode(m) => CommandValue::Text(m.as_str().to_string()),
        }
    }
}

/// A parsed command, ready to dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct CommandIntent {
    pub ac_id: DeviceId,
    pub action: Action,
    /// The text the user typed
    pub note: String,
}

impl CommandIntent {
    pub fn to_request(&self, user: &str) -> CommandRequest {
        CommandRequest {
            user: user.to_string(),
            action: self.action.name().to_string(),
            ac_id: self.ac_id.clone(),
            value: self.action.value(),
            note: Some(self.note.clone()),
        }
    }
}

/// Parse free text into an intent
pub fn parse_command(text: &str) -> Result<CommandIntent, UnrecognizedCommand> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let (ac_id, action) = parse_set_temp(&tokens)
        .or_else(|| parse_turn(&tokens))
        .or_else(|| parse_mode(&tokens))
        .ok_or(UnrecognizedCommand)?;

    Ok(CommandIntent {
        ac_id,
        action,
        note: text.to_string(),
    })
}

/// `set <id> to <number>`
fn parse_set_temp(tokens: &[&str]) -> Option<(DeviceId, Action)> {
    let [verb, id, to, number] = tokens else {
        return None;
    };
    if !verb.eq_ignore_ascii_case("set") || !to.eq_ignore_ascii_case("to") {
        return None;
    }
    let id = DeviceId::parse(id).ok()?;
    let value = parse_decimal(number)?;
    Some((id, Action::SetTemp(value)))
}

/// `turn <on|off> <id>`
fn parse_turn(tokens: &[&str]) -> Option<(DeviceId, Action)> {
    let [verb, state, id] = tokens else {
        return None;
    };
    if !verb.eq_ignore_ascii_case("turn") {
        return None;
    }
    let status = PowerStatus::parse(state)?;
    let id = DeviceId::parse(id).ok()?;
    Some((id, Action::SetStatus(status)))
}

/// `mode <id> <cooling|heating|fan>`
fn parse_mode(tokens: &[&str]) -> Option<(DeviceId, Action)> {
    let [verb, id, mode] = tokens else {
        return None;
    };
    if !verb.eq_ignore_ascii_case("mode") {
        return None;
    }
    let id = DeviceId::parse(id).ok()?;
    let mode = Mode::parse(mode)?;
    Some((id, Action::SetMode(mode)))
}

/// Unsigned decimal: one or more digits, optionally `.` and one or more digits
fn parse_decimal(text: &str) -> Option<f64> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !fraction.map_or(true, digits) {
        return None;
    }
    text.parse().ok()
}
