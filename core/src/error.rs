//! Error types for the transfer API client core.
//!
//! # Design
//! Callers at the screen level never see these directly: every category is
//! collapsed into `ApiResponse::err` with the `Display` text as the message.
//! The variants exist so the collapse happens in one place and so the FFI
//! layer and tests can still tell the categories apart.

use thiserror::Error;

/// Everything that can go wrong between building a request and decoding its
/// response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, TLS, timeout).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status. `message` is the server's
    /// `error` field, or a generic fallback.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("invalid response: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("invalid request: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::Transport("Network error".to_string());
        }
        Self::Transport(message)
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
