// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Display name must not be empty")]
    EmptyDisplayName,

    #[error("Display name too long: {len} characters (max {max})")]
    DisplayNameTooLong { len: usize, max: usize },

    #[error("Invalid contact address: {0}")]
    InvalidContactAddress(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
