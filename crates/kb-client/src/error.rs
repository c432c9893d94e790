use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Every way a backend call can fail.
///
/// `Display` is the human-readable message only, so callers can show it as is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("{0}")]
    Network(String),

    /// Non-2xx status; `message` is extracted from the response body.
    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    /// The success body was not valid JSON for the expected shape.
    #[error("{0}")]
    Parse(String),

    /// The request body could not be serialized.
    #[error("{0}")]
    Encode(String),

    /// The body parsed but reported `success: false`.
    #[error("{0}")]
    Application(String),
}

pub type RequestResult<T> = std::result::Result<T, RequestError>;

impl RequestError {
    pub(crate) fn network(err: reqwest::Error) -> Self {
        RequestError::Network(err.to_string())
    }

    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        RequestError::HttpStatus {
            status: status.as_u16(),
            message: extract_error_message(status, body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pick the message for a failed response.
///
/// JSON bodies: `detail`, then `message`, then the generic status line.
/// Non-JSON bodies: the raw text, or the status line when the body is empty.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    let fallback = format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_string();

    match serde_json::from_str::<Value>(body) {
        Ok(value) => ["detail", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(message_text))
            .unwrap_or(fallback),
        Err(_) if !body.is_empty() => body.to_string(),
        Err(_) => fallback,
    }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        // Validation errors come back as structured `detail` arrays
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_wins_over_message() {
        let msg = extract_error_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"db down","message":"ignored"}"#,
        );
        assert_eq!(msg, "db down");
    }

    #[test]
    fn test_message_field_used_without_detail() {
        let msg = extract_error_message(StatusCode::BAD_REQUEST, r#"{"message":"bad query"}"#);
        assert_eq!(msg, "bad query");
    }

    #[test]
    fn test_json_without_known_fields_falls_back_to_status_line() {
        let msg = extract_error_message(StatusCode::NOT_FOUND, r#"{"foo":"bar"}"#);
        assert_eq!(msg, "HTTP 404: Not Found");
    }

    #[test]
    fn test_raw_text_kept_verbatim() {
        let msg = extract_error_message(StatusCode::BAD_GATEWAY, "<html>upstream gone</html>");
        assert_eq!(msg, "<html>upstream gone</html>");
    }

    #[test]
    fn test_empty_body_uses_status_line() {
        let msg = extract_error_message(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(msg, "HTTP 500: Internal Server Error");
    }

    #[test]
    fn test_structured_detail_is_serialized() {
        let msg = extract_error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","query"]}]}"#,
        );
        assert_eq!(msg, r#"[{"loc":["body","query"]}]"#);
    }

    #[test]
    fn test_display_is_message_only() {
        let err = RequestError::from_status(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail":"db down"}"#);
        assert_eq!(err.to_string(), "db down");
        assert_eq!(err.status(), Some(500));
    }
}
