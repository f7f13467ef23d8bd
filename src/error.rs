//! Error types shared by the gateway request path and the direct API client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PayopError>;

#[derive(Debug, Error)]
pub enum PayopError {
    /// A required purchase parameter was not set. Raised before any network call.
    #[error("The {0} parameter is required")]
    MissingParameter(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-2xx status.
    #[error("Remote API returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response envelope has no data field")]
    MissingEnvelope,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PayopError {
    /// Numeric code reported in error-shaped records. HTTP status when one is
    /// known, zero otherwise.
    pub fn code(&self) -> u16 {
        match self {
            PayopError::Status { code, .. } => *code,
            PayopError::Http(e) => e.status().map(|s| s.as_u16()).unwrap_or(0),
            _ => 0,
        }
    }
}
