// Central Error Type for the Application

use crate::domain::DomainError;
use thiserror::Error;

/// Application-level error type
///
/// Delivery failures have no variant here: they never leave the
/// notification dispatcher (see `port::DeliveryError`).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// True for errors the caller can fix by changing the request
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

// Every domain rule violation is bad input from the caller
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Store(String)
