//! Content Error Types
//!
//! This module provides content-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::ids::PostId;

/// Content-specific result type alias
pub type ContentResult<T> = Result<T, ContentError>;

/// Content-specific error variants
#[derive(Debug, Error)]
pub enum ContentError {
    /// The requested post does not exist
    #[error("Post {0} not found")]
    PostNotFound(PostId),

    /// Draft or patch validation error
    #[error("Content validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other failure reported by the remote store
    #[error("Boundary error: {0}")]
    Boundary(String),
}

impl ContentError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::PostNotFound(_) => ErrorKind::NotFound,
            ContentError::Validation(_) => ErrorKind::BadRequest,
            ContentError::Database(e) => classify_sqlx(e).kind(),
            ContentError::Boundary(_) => ErrorKind::ServiceUnavailable,
        }
    }

    /// Convert into AppError
    ///
    /// Database errors go through the kernel conversion, so constraint
    /// violations keep their error-code class and their source chain.
    pub fn into_app_error(self) -> AppError {
        match self {
            ContentError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}
