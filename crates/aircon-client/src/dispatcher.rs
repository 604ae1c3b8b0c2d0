//! Command outcome mapping
//!
//! The backend answers `POST /command` with `{ ok, action, ac_id, new_value }`
//! on success and `{ detail }` on failure. Both are turned into a
//! `Result<CommandApplied, CommandFailure>` here, independent of transport.

use aircon_core::{CommandApplied, ErrorBody};

use crate::error::CommandFailure;

/// Shown when a failure carries no readable detail
pub const GENERIC_FAILURE: &str = "Failed to apply command";

/// Best-effort detail from an error body
pub fn failure_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail_text())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Interpret a completed `POST /command` exchange
pub fn interpret(success: bool, body: &str) -> Result<CommandApplied, CommandFailure> {
    if !success {
        return Err(CommandFailure::new(failure_detail(body)));
    }
    serde_json::from_str::<CommandApplied>(body).map_err(|e| {
        tracing::warn!(error = %e, "Undecodable command response");
        CommandFailure::generic()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aircon_core::{CommandValue, DeviceId};

    #[test]
    fn test_string_detail_is_verbatim() {
        assert_eq!(failure_detail(r#"{"detail":"AC not found"}"#), "AC not found");
    }

    #[test]
    fn test_structured_detail_is_json_text() {
        assert_eq!(
            failure_detail(r#"{"detail":[{"msg":"field required"}]}"#),
            r#"[{"msg":"field required"}]"#
        );
    }

    #[test]
    fn test_missing_or_unparseable_detail_is_generic() {
        assert_eq!(failure_detail("{}"), GENERIC_FAILURE);
        assert_eq!(failure_detail(r#"{"detail":null}"#), GENERIC_FAILURE);
        assert_eq!(failure_detail("<html>502 Bad Gateway</html>"), GENERIC_FAILURE);
        assert_eq!(failure_detail(""), GENERIC_FAILURE);
    }

    #[test]
    fn test_interpret_success() {
        let applied = interpret(
            true,
            r#"{"ok":true,"action":"set_temp","ac_id":"F3-AC1","new_value":21.5}"#,
        )
        .unwrap();
        assert_eq!(applied.ac_id, DeviceId::new("F3-AC1"));
        assert_eq!(applied.new_value, CommandValue::Number(21.5));
        assert_eq!(applied.acknowledgment(), "✅ Applied: set_temp on F3-AC1 → 21.5");
    }

    #[test]
    fn test_interpret_failure() {
        let failure = interpret(
            false,
            r#"{"detail":"Temperature out of allowed range (16–30)"}"#,
        )
        .unwrap_err();
        assert_eq!(failure.bubble(), "Error: Temperature out of allowed range (16–30)");
    }

    #[test]
    fn test_interpret_garbled_success_is_failure() {
        assert_eq!(interpret(true, "not json").unwrap_err(), CommandFailure::generic());
    }
}
