//! Transport failure classification.

use thiserror::Error;

use super::ResponseBody;

/// Errors that can occur while performing a request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No response was received (DNS, refused connection, reset, ...)
    #[error("Request to '{url}' failed: {message}")]
    Network { url: String, message: String },

    /// Request exceeded total timeout
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },

    /// The server answered with a non-2xx status
    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: ResponseBody },

    /// The request could not be built (bad URL, bad header)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body, if a response was received.
    pub fn body(&self) -> Option<&ResponseBody> {
        match self {
            TransportError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Stable identifier for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            TransportError::Network { .. } => "network_error",
            TransportError::Timeout { .. } => "request_timeout",
            TransportError::Http { .. } => "http_error",
            TransportError::InvalidRequest(_) => "invalid_request",
        }
    }
}
