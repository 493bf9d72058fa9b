//! Session Error Types
//!
//! This module provides session-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific error variants
#[derive(Debug, Error)]
pub enum SessionError {
    /// Profile lookup exceeded its time bound
    #[error("Profile lookup timed out")]
    LookupTimeout,

    /// A concurrent resolution already inserted this profile row
    #[error("Profile already exists")]
    DuplicateProfile,

    /// The auth service rejected the request; the message is passed
    /// through unchanged
    #[error("{0}")]
    Credentials(String),

    /// Patch validation error
    #[error("Profile validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other failure reported by the remote store
    #[error("Boundary error: {0}")]
    Boundary(String),
}

impl SessionError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::LookupTimeout => ErrorKind::RequestTimeout,
            SessionError::DuplicateProfile => ErrorKind::Conflict,
            SessionError::Credentials(_) => ErrorKind::Unauthorized,
            SessionError::Validation(_) => ErrorKind::BadRequest,
            SessionError::Database(e) => classify_sqlx(e).kind(),
            SessionError::Boundary(_) => ErrorKind::ServiceUnavailable,
        }
    }

    /// Convert into AppError
    ///
    /// Database errors go through the kernel conversion, so constraint
    /// violations keep their error-code class and their source chain.
    pub fn into_app_error(self) -> AppError {
        match self {
            SessionError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}
