//! Error types for the ScienceDirect API client.
//!
//! This module provides a single error type covering all failure modes
//! when talking to the ScienceDirect API, from transport errors to
//! quota rejections to malformed response bodies.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for ScienceDirect operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all ScienceDirect API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure: connection refused, DNS, timeout.
    /// Never retried automatically; the caller decides.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status} from {path}: {message}")]
    Http {
        /// HTTP status code (>= 400).
        status: u16,
        /// Request path that produced the error.
        path: String,
        /// Human-readable message extracted from the error body.
        message: String,
        /// Raw response body for diagnostics.
        body: Value,
    },

    /// The API answered 2xx but the body was not the JSON we expect.
    /// Never coerced to an empty result set.
    #[error("malformed response: {message}")]
    MalformedResponse {
        /// What failed to decode.
        message: String,
        /// Raw body text, preserved for diagnostics.
        raw: String,
    },

    /// JSON serialization failed while building a request payload.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL construction failed.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid input provided to a client function.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem failure while writing a results artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed while writing a results table.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the API rejected the request for rate-limit
    /// reasons (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Http { status: 429, .. })
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (bad query, bad credentials, malformed input).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Http { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidInput(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Build an [`Error::Http`] from a non-success response body.
    ///
    /// ScienceDirect error bodies carry `service-error` or
    /// `error-response` wrappers depending on the endpoint; fall back
    /// to a generic message when neither is present.
    pub(crate) fn from_status(status: u16, path: &str, body: Value) -> Self {
        let message = body
            .get("service-error")
            .and_then(|e| e.get("status"))
            .and_then(|s| s.get("statusText"))
            .and_then(|t| t.as_str())
            .or_else(|| {
                body.get("error-response")
                    .and_then(|e| e.get("error-message"))
                    .and_then(|m| m.as_str())
            })
            .unwrap_or("unknown API error")
            .to_string();

        Error::Http {
            status,
            path: path.to_string(),
            message,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        let err = Error::Http {
            status: 429,
            path: "/x".into(),
            message: "quota".into(),
            body: Value::Null,
        };
        assert!(err.is_retryable());
        assert!(err.is_rate_limited());
        assert!(!Error::InvalidInput("bad".into()).is_retryable());
    }

    #[test]
    fn test_client_vs_server() {
        let client = Error::Http {
            status: 400,
            path: "/x".into(),
            message: "bad".into(),
            body: Value::Null,
        };
        let server = Error::Http {
            status: 503,
            path: "/x".into(),
            message: "down".into(),
            body: Value::Null,
        };
        assert!(client.is_client_error());
        assert!(!client.is_server_error());
        assert!(server.is_server_error());
        assert!(!server.is_client_error());
    }

    #[test]
    fn test_from_status_service_error() {
        let body = serde_json::json!({
            "service-error": {
                "status": {
                    "statusCode": "AUTHENTICATION_ERROR",
                    "statusText": "Invalid API Key"
                }
            }
        });

        match Error::from_status(401, "/content/search/sciencedirect", body) {
            Error::Http {
                status, message, ..
            } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API Key");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_status_unknown_body() {
        match Error::from_status(500, "/p", Value::String("oops".into())) {
            Error::Http { message, .. } => assert_eq!(message, "unknown API error"),
            other => panic!("expected Http error, got {other:?}"),
        }
    }
}
