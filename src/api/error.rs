//! Client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FysoError {
    /// Login or tenant selection was rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Non-2xx status or `success: false` on a data call.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FysoError {
    /// Authentication failures abort the item even when failures are captured.
    pub fn is_authentication(&self) -> bool {
        matches!(self, FysoError::Authentication(_))
    }

    /// Remote status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FysoError::Api { status, .. } => Some(*status),
            FysoError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
