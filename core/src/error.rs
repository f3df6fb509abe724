//! Error types for the API client core.
//!
//! # Design
//! Status-code errors are classified in one place (`classify`) and surface as
//! four distinct variants. Each one carries the HTTP status and the raw
//! response body so callers can inspect the server's diagnostic payload.
//! Everything that happens before a response exists (missing credentials,
//! encoding failures, transport failures) has its own variant.

use thiserror::Error;

/// Errors returned by `Namespace::request` and friends.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 401.
    #[error("authentication failed (HTTP {status}): {}", String::from_utf8_lossy(.body))]
    Authentication { status: u16, body: Vec<u8> },

    /// The server returned a 4xx status other than 401.
    #[error("client error (HTTP {status}): {}", String::from_utf8_lossy(.body))]
    Client { status: u16, body: Vec<u8> },

    /// The server returned a 5xx status.
    #[error("server error (HTTP {status}): {}", String::from_utf8_lossy(.body))]
    Server { status: u16, body: Vec<u8> },

    /// The server returned a status that fits no other category.
    #[error("unexpected response (HTTP {status}): {}", String::from_utf8_lossy(.body))]
    Generic { status: u16, body: Vec<u8> },

    /// The active authentication strategy needs a credential that is not configured.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// The request parameters could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A JSON response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The underlying HTTP client failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status for errors produced from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { status, .. }
            | ApiError::Client { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Generic { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body for errors produced from a response.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            ApiError::Authentication { body, .. }
            | ApiError::Client { body, .. }
            | ApiError::Server { body, .. }
            | ApiError::Generic { body, .. } => Some(body),
            _ => None,
        }
    }
}
