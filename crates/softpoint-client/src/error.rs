//! Softpoint client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoftpointError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Country catalog is empty")]
    EmptyCatalog,
}
