//! MiniMaxi Provider
//!
//! Hailuo video generation. MiniMaxi reports outcome twice: an HTTP status
//! and a numeric `base_resp.status_code` inside every body. Both are
//! checked before any task status is trusted.

mod video;

pub use video::MinimaxiVideo;

use serde_json::Value;

use crate::error::{GenerationError, Result};
use crate::types::ProviderId;

/// Default API origin. Endpoint paths include the `/v1` prefix.
pub const DEFAULT_BASE_URL: &str = "https://api.minimaxi.com";

/// Map a non-zero `base_resp.status_code` onto the error taxonomy.
pub(crate) fn check_base_resp(payload: &Value) -> Result<()> {
    let Some(base) = payload.get("base_resp") else {
        return Ok(());
    };
    let code = base.get("status_code").and_then(Value::as_i64).unwrap_or(0);
    if code == 0 {
        return Ok(());
    }
    let message = base
        .get("status_msg")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    let message = format!("status_code {code}: {message}");
    Err(match code {
        1004 | 2049 => GenerationError::invalid_credentials(ProviderId::Minimaxi, message),
        1000 | 1001 | 1002 | 1024 | 1033 | 1039 => {
            GenerationError::unavailable(ProviderId::Minimaxi, message)
        }
        _ => GenerationError::invalid_request(ProviderId::Minimaxi, message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn err_kind(code: i64) -> ErrorKind {
        check_base_resp(&json!({"base_resp": {"status_code": code, "status_msg": "x"}}))
            .unwrap_err()
            .kind()
    }

    #[test]
    fn test_numeric_codes() {
        assert!(check_base_resp(&json!({"base_resp": {"status_code": 0, "status_msg": "success"}})).is_ok());
        assert!(check_base_resp(&json!({"task_id": "1"})).is_ok());
        assert_eq!(err_kind(1004), ErrorKind::InvalidCredentials);
        assert_eq!(err_kind(2049), ErrorKind::InvalidCredentials);
        assert_eq!(err_kind(1002), ErrorKind::ProviderUnavailable);
        assert_eq!(err_kind(1039), ErrorKind::ProviderUnavailable);
        assert_eq!(err_kind(1026), ErrorKind::InvalidRequest);
        assert_eq!(err_kind(2013), ErrorKind::InvalidRequest);
    }
}
