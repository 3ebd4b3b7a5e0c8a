use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::credentials::StoreError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server rejected request ({status}): {}", truncate_payload(.payload))]
    Rejected { status: StatusCode, payload: Value },

    #[error("Link does not carry a credential")]
    MissingCredential,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Credential storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Maximum length for error payloads in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

fn truncate_payload(payload: &Value) -> String {
    let body = payload.to_string();
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body
    } else {
        let cut = (0..=MAX_ERROR_BODY_LENGTH)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
    }
}

impl SessionError {
    /// Wrap a non-2xx response body. JSON bodies pass through untouched;
    /// anything else is kept as a JSON string.
    pub fn rejected(status: StatusCode, body: &str) -> Self {
        let payload = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
        };
        SessionError::Rejected { status, payload }
    }

    /// Server error payload, for rejected requests.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            SessionError::Rejected { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SessionError::Rejected { status, .. } => Some(*status),
            SessionError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejected_keeps_json_payload() {
        let err = SessionError::rejected(StatusCode::UNPROCESSABLE_ENTITY, r#"{"error":"invalid"}"#);
        assert_eq!(err.payload(), Some(&json!({"error": "invalid"})));
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[test]
    fn test_rejected_non_json_body() {
        let err = SessionError::rejected(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");
        assert_eq!(err.payload(), Some(&json!("<html>Bad Gateway</html>")));

        let err = SessionError::rejected(StatusCode::NOT_FOUND, "");
        assert_eq!(err.payload(), Some(&Value::Null));
    }

    #[test]
    fn test_display_truncates_large_payload() {
        let big = "x".repeat(2000);
        let err = SessionError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            payload: Value::String(big),
        };
        let message = err.to_string();
        assert!(message.contains("truncated"));
        assert!(message.len() < 700);
    }

    #[test]
    fn test_missing_credential_has_no_payload() {
        let err = SessionError::MissingCredential;
        assert!(err.payload().is_none());
        assert!(err.status().is_none());
    }
}
