//! Request error type
//!
//! Every call to the KB API fails with an [`ApiError`]. The three variants
//! cover transport failures, non-success HTTP statuses and undecodable
//! bodies; the UI treats all of them as a single "request failed" condition
//! and only shows [`ApiError::message`].

use thiserror::Error;

/// Errors returned by the KB API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, timeout or other transport failure
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON
    #[error("Parse error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Human-readable description used in notifications and inline errors
    ///
    /// Status errors prefer the server's body when it carries a message,
    /// falling back to the status code.
    pub fn message(&self) -> String {
        match self {
            ApiError::Transport(e) => e.to_string(),
            ApiError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    format!("Request failed with status {}", status)
                } else {
                    format!("{} ({})", body, status)
                }
            }
            ApiError::Decode(msg) => format!("Malformed response: {}", msg),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result alias for KB API calls
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_uses_body() {
        let err = ApiError::Status {
            status: 400,
            body: "Invalid config key\n".to_string(),
        };
        assert_eq!(err.message(), "Invalid config key (400)");
    }

    #[test]
    fn test_status_message_without_body() {
        let err = ApiError::Status {
            status: 503,
            body: "  ".to_string(),
        };
        assert_eq!(err.message(), "Request failed with status 503");
    }

    #[test]
    fn test_decode_from_serde_error() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(err.message().starts_with("Malformed response"));
    }

    #[test]
    fn test_display() {
        let err = ApiError::Status {
            status: 404,
            body: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "API error: HTTP 404: missing");
    }
}
