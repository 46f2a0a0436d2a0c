//! Error types for the async client.
//!
//! API calls never return these: their failures arrive inside the
//! `ApiResponse` envelope. `ClientError` covers setup and local persistence.

use thiserror::Error;
use transfer_core::StorageError;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP stack could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
