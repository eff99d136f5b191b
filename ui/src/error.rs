// Error types
use thiserror::Error;

use crate::types::MessageBody;

/// Shown when the server gave no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("network error: {0}")]
    Network(String),
    #[error("could not build request: {0}")]
    Request(String),
}

impl ApiError {
    /// Builds a rejection from a non-success response, keeping the body's
    /// `message` field when the body is JSON and carries one.
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<MessageBody>(body)
            .ok()
            .and_then(|body| body.message);

        ApiError::Rejected { status, message }
    }

    /// Text for the toast. Only a received response can carry a server
    /// message; everything else gets the generic one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("browser storage is unavailable")]
    Unavailable,
    #[error("could not write `{key}` to storage")]
    Write { key: String },
    #[error("could not remove `{key}` from storage")]
    Remove { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not read the selected file: {0}")]
pub struct PhotoReadError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);
