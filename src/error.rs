use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::token::TokenError;
use crate::storage::StorageError;

/// Unified error type for the identity service
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum IdentityError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate value for {field}")]
    Duplicate { field: String },

    #[error("No user with that username: {0}")]
    UnknownUser(String),

    #[error("No account with that email: {0}")]
    UnknownEmail(String),

    #[error("Incorrect password")]
    InvalidCredential,

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Update failed: {0}")]
    UpdateFailed(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, IdentityError>;

impl IdentityError {
    /// Create a new validation error
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new storage error
    pub fn storage<T: Into<String>>(msg: T) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new config error
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new not found error
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new dispatch error
    pub fn dispatch<T: Into<String>>(msg: T) -> Self {
        Self::Dispatch(msg.into())
    }

    /// Create a new internal error
    pub fn internal<T: Into<String>>(msg: T) -> Self {
        Self::Internal(msg.into())
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            IdentityError::Validation(_) => "validation",
            IdentityError::Duplicate { .. } => "validation",
            IdentityError::UnknownUser(_) => "lookup",
            IdentityError::UnknownEmail(_) => "lookup",
            IdentityError::InvalidCredential => "credential",
            IdentityError::RoleNotFound(_) => "role",
            IdentityError::NotFound(_) => "not_found",
            IdentityError::UpdateFailed(_) => "update",
            IdentityError::Token(_) => "token",
            IdentityError::Dispatch(_) => "dispatch",
            IdentityError::Storage(_) => "storage",
            IdentityError::Config(_) => "config",
            IdentityError::Timeout(_) => "timeout",
            IdentityError::Internal(_) => "internal",
        }
    }

    /// Check if the caller may retry the operation as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, IdentityError::Timeout(_) | IdentityError::Dispatch(_))
    }
}

// Storage errors map onto the caller-facing taxonomy: unique violations
// surface as field-level duplicates, schema rejections as validation.
impl From<StorageError> for IdentityError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { field } => IdentityError::Duplicate { field },
            StorageError::Validation(msg) => IdentityError::Validation(msg),
            StorageError::NotFound(msg) => IdentityError::NotFound(msg),
            StorageError::Timeout(msg) => IdentityError::Timeout(msg),
            _ => IdentityError::Storage(err.to_string()),
        }
    }
}

impl From<std::io::Error> for IdentityError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => IdentityError::NotFound(err.to_string()),
            std::io::ErrorKind::TimedOut => IdentityError::Timeout(err.to_string()),
            _ => IdentityError::Storage(format!("I/O error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for IdentityError {
    fn from(err: serde_json::Error) -> Self {
        IdentityError::Internal(format!("JSON error: {}", err))
    }
}
