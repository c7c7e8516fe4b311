//! Failure reason extraction

use serde_json::Value;

use crate::utils::json::string_at;

/// Places providers put a failure description, most specific first.
const REASON_POINTERS: &[&str] = &[
    "/fail_reason",
    "/failReason",
    "/failure",
    "/error/message",
    "/error",
    "/message",
    "/output/message",
    "/base_resp/status_msg",
    "/status_msg",
    "/details",
];

pub const DEFAULT_REASON: &str = "generation failed";

/// Reason shown to the caller plus the provider string it came from, when
/// the two differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FailureReason {
    pub reason: String,
    pub raw: Option<String>,
}

pub(crate) fn extract_reason(payload: &Value) -> FailureReason {
    let Some(raw) = string_at(payload, REASON_POINTERS) else {
        return FailureReason {
            reason: DEFAULT_REASON.to_string(),
            raw: None,
        };
    };
    match nested_message(raw) {
        Some(message) => FailureReason {
            reason: message,
            raw: Some(raw.to_string()),
        },
        None => FailureReason {
            reason: raw.to_string(),
            raw: None,
        },
    }
}

/// Some providers serialize a whole error object into the reason string.
fn nested_message(raw: &str) -> Option<String> {
    if !raw.starts_with('{') {
        return None;
    }
    let parsed: Value = serde_json::from_str(raw).ok()?;
    string_at(&parsed, &["/message", "/error/message", "/msg"]).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_json_reason_is_unwrapped() {
        let payload = json!({"fail_reason": "{\"message\":\"quota exceeded\"}"});
        let reason = extract_reason(&payload);
        assert_eq!(reason.reason, "quota exceeded");
        assert_eq!(reason.raw.as_deref(), Some("{\"message\":\"quota exceeded\"}"));
    }

    #[test]
    fn test_nested_error_and_msg_shapes() {
        let payload = json!({"failReason": "{\"error\":{\"message\":\"rate limited\"}}"});
        assert_eq!(extract_reason(&payload).reason, "rate limited");
        let payload = json!({"message": "{\"code\":7,\"msg\":\"bad input\"}"});
        assert_eq!(extract_reason(&payload).reason, "bad input");
    }

    #[test]
    fn test_json_without_message_stays_raw() {
        let payload = json!({"fail_reason": "{\"code\":7}"});
        let reason = extract_reason(&payload);
        assert_eq!(reason.reason, "{\"code\":7}");
        assert_eq!(reason.raw, None);
    }

    #[test]
    fn test_pointer_order() {
        let payload = json!({
            "error": {"message": "from error"},
            "message": "from message",
        });
        assert_eq!(extract_reason(&payload).reason, "from error");
        let payload = json!({"base_resp": {"status_code": 1026, "status_msg": "sensitive content"}});
        assert_eq!(extract_reason(&payload).reason, "sensitive content");
        let payload = json!({"output": {"task_status": "FAILED", "message": "inappropriate"}});
        assert_eq!(extract_reason(&payload).reason, "inappropriate");
    }

    #[test]
    fn test_default_reason() {
        assert_eq!(extract_reason(&json!({"status": "FAILURE"})).reason, DEFAULT_REASON);
        assert_eq!(extract_reason(&json!({"fail_reason": "   "})).reason, DEFAULT_REASON);
        assert_eq!(extract_reason(&Value::Null).reason, DEFAULT_REASON);
    }
}
