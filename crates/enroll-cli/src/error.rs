//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Softpoint error: {0}")]
    Softpoint(#[from] softpoint_client::SoftpointError),

    #[error("Form error: {0}")]
    Form(#[from] enrollment_form::FormError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
