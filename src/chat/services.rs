use serde_json::Value;

use crate::airtable::{as_text, is_set};
use crate::error::{ApiError, UpstreamError};

pub const DEFAULT_USER_ID: &str = "web_user";

const WEBHOOK_TIMEOUT: &str = "n8n timeout - le workflow met trop de temps à répondre";
const WEBHOOK_UNREACHABLE: &str =
    "Impossible de contacter n8n - vérifiez que le workflow est actif";
const WEBHOOK_FAILED: &str = "Failed to send message to n8n";

/// Keys checked, in order, for the bot reply inside an object payload.
const REPLY_KEYS: [&str; 3] = ["response", "message", "text"];

/// Picks the bot reply out of whatever the workflow returned.
///
/// Order: a raw string payload, then the first set key of `response`,
/// `message`, `text`, then the serialized payload itself.
pub fn resolve_reply(payload: &Value) -> String {
    if let Value::String(s) = payload {
        return s.clone();
    }
    REPLY_KEYS
        .iter()
        .find_map(|key| payload.get(*key).filter(|v| is_set(v)))
        .map(as_text)
        .unwrap_or_else(|| payload.to_string())
}

pub fn webhook_error(err: &UpstreamError) -> ApiError {
    let msg = match err {
        UpstreamError::Timeout { .. } => WEBHOOK_TIMEOUT.to_string(),
        UpstreamError::Status { status, status_text, .. } => {
            format!("n8n error: {status} - {status_text}")
        }
        UpstreamError::Unreachable(_) => WEBHOOK_UNREACHABLE.to_string(),
        UpstreamError::InvalidPayload(_) | UpstreamError::Request(_) => WEBHOOK_FAILED.to_string(),
    };
    ApiError::internal(msg, err.details())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_shapes_resolve_in_order() {
        assert_eq!(resolve_reply(&json!("a string")), "a string");
        assert_eq!(resolve_reply(&json!({"response": "r"})), "r");
        assert_eq!(resolve_reply(&json!({"message": "m"})), "m");
        assert_eq!(resolve_reply(&json!({"text": "t"})), "t");
        assert_eq!(resolve_reply(&json!({"other": 1})), r#"{"other":1}"#);
    }

    #[test]
    fn response_beats_message_beats_text() {
        assert_eq!(resolve_reply(&json!({"message": "m", "response": "r", "text": "t"})), "r");
        assert_eq!(resolve_reply(&json!({"text": "t", "message": "m"})), "m");
    }

    #[test]
    fn empty_keys_are_skipped() {
        assert_eq!(resolve_reply(&json!({"response": "", "message": "m"})), "m");
        assert_eq!(resolve_reply(&json!({"response": null, "text": "t"})), "t");
    }

    #[test]
    fn non_string_reply_is_serialized() {
        assert_eq!(resolve_reply(&json!({"response": {"a": 1}})), r#"{"a":1}"#);
        assert_eq!(resolve_reply(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn webhook_errors_are_distinguished() {
        let e = webhook_error(&UpstreamError::Timeout { timeout_secs: 30 });
        assert_eq!(e.error, WEBHOOK_TIMEOUT);

        let e = webhook_error(&UpstreamError::Unreachable("connection refused".into()));
        assert_eq!(e.error, WEBHOOK_UNREACHABLE);

        let e = webhook_error(&UpstreamError::Status {
            status: 404,
            status_text: "Not Found".into(),
            body: json!({"message": "workflow not active"}),
        });
        assert_eq!(e.error, "n8n error: 404 - Not Found");
        assert_eq!(e.details, Some(json!({"message": "workflow not active"})));

        let e = webhook_error(&UpstreamError::InvalidPayload("eof".into()));
        assert_eq!(e.error, WEBHOOK_FAILED);
    }
}
