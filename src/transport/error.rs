//! Typed errors for transport operations
//!
//! Lets the controller tell a structured service error apart from a dead
//! connection without string matching.

use thiserror::Error;

/// Evaluation transport errors with typed variants
///
/// - `Status` - the service answered with a non-2xx status
/// - `Timeout` - no answer within the configured timeout
/// - `Network` - connection refused, DNS failure, reset, ...
/// - `MalformedEnvelope` - 2xx answer that is not a valid envelope
#[derive(Debug, Error)]
pub enum TransportError {
    /// Non-2xx HTTP status
    ///
    /// `message` holds the `message` field of a JSON error body, if any.
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedEnvelope(String),
}

impl TransportError {
    /// Message the service put in a structured error body, if any
    pub fn service_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Check if resubmitting the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Status { status, .. } => *status == 429 || *status >= 500,
            TransportError::Timeout(_) | TransportError::Network(_) => true,
            TransportError::MalformedEnvelope(_) => false,
        }
    }

    /// Convert HTTP status code and body text into a typed error
    pub fn from_http_status(status: reqwest::StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|message| message.as_str())
                    .map(str::to_string)
            })
            .filter(|message| !message.trim().is_empty());

        TransportError::Status {
            status: status.as_u16(),
            message,
            body,
        }
    }

    /// Convert network/connection errors into a typed error
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Network(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            TransportError::MalformedEnvelope(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}
