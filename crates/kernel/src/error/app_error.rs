//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Unified application error type
///
/// The standard error type used across the project. Errors are built
/// with a small builder API.
///
/// ## Fields
/// * `kind` - error classification (maps to an HTTP status code)
/// * `message` - user-facing error message
/// * `action` - what the user should do about it (optional)
/// * `source` - the originating error (optional, for debugging)
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// // Simple error
/// let err = AppError::new(ErrorKind::NotFound, "Post not found");
///
/// // Detailed error
/// let err = AppError::new(ErrorKind::BadRequest, "Invalid email format")
///     .with_action("Please enter a valid email address");
/// ```
pub struct AppError {
    /// Error classification
    kind: ErrorKind,
    /// User-facing message
    message: Cow<'static, str>,
    /// What the user should do about it
    action: Option<Cow<'static, str>>,
    /// Originating error (for debugging)
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// Application result type alias
///
/// Shorthand for `Result<T, AppError>`.
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::{AppError, AppResult}, kind::ErrorKind};
///
/// fn find_post(id: i64) -> AppResult<String> {
///     if id == 0 {
///         return Err(AppError::not_found("Post not found"));
///     }
///     Ok("First post".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new error
    ///
    /// ## Arguments
    /// * `kind` - error classification
    /// * `message` - user-facing message
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::{app_error::AppError, kind::ErrorKind};
    /// let err = AppError::new(ErrorKind::BadRequest, "Invalid input");
    /// ```
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            source: None,
        }
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 400 Bad Request error
    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// 401 Unauthorized error
    #[inline]
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// 403 Forbidden error
    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// 404 Not Found error
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 408 Request Timeout error
    #[inline]
    pub fn request_timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::RequestTimeout, message)
    }

    /// 409 Conflict error
    #[inline]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// 500 Internal Server Error
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// 503 Service Unavailable error
    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the user-facing action
    ///
    /// ## Arguments
    /// * `action` - what the user should do about it
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::{app_error::AppError, kind::ErrorKind};
    /// let err = AppError::not_found("Post not found")
    ///     .with_action("Please refresh the list");
    /// ```
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the originating error (for debugging)
    ///
    /// ## Arguments
    /// * `source` - the originating error
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::{app_error::{AppError, AppResult}, kind::ErrorKind};
    /// use std::io;
    ///
    /// fn read_config() -> AppResult<()> {
    ///     std::fs::read_to_string("config.json")
    ///         .map_err(|e| AppError::internal("Failed to read config").with_source(e))?;
    ///     Ok(())
    /// }
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Error classification
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// User-facing message
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// User-facing action
    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Whether this is a server-side error
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// Whether this is a client-side error
    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

// ============================================================================
// Result extension traits
// ============================================================================

/// Extension trait for converting `Result<T, E>` into `AppResult<T>`
pub trait ResultExt<T, E> {
    /// Wrap the error in an `AppError` with the given kind and message
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|e| AppError::new(kind, message).with_source(e))
    }
}

/// Extension trait for converting `Option<T>` into `AppResult<T>`
pub trait OptionExt<T> {
    /// Return an `AppError` when `None`
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>;

    /// Return 404 Not Found when `None`
    fn ok_or_not_found(self, message: impl Into<Cow<'static, str>>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T> {
        self.ok_or_else(|| AppError::new(kind, message))
    }

    fn ok_or_not_found(self, message: impl Into<Cow<'static, str>>) -> AppResult<T> {
        self.ok_or_app_err(ErrorKind::NotFound, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::NotFound, "Post not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Post not found");
        assert!(err.action().is_none());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(AppError::bad_request("test").status_code(), 400);
        assert_eq!(AppError::unauthorized("test").status_code(), 401);
        assert_eq!(AppError::forbidden("test").status_code(), 403);
        assert_eq!(AppError::not_found("test").status_code(), 404);
        assert_eq!(AppError::request_timeout("test").status_code(), 408);
        assert_eq!(AppError::conflict("test").status_code(), 409);
        assert_eq!(AppError::internal("test").status_code(), 500);
        assert_eq!(AppError::service_unavailable("test").status_code(), 503);
    }

    #[test]
    fn test_with_action() {
        let err = AppError::not_found("Post not found").with_action("Please refresh the list");
        assert_eq!(err.action(), Some("Please refresh the list"));
    }

    #[test]
    fn test_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AppError::internal("Failed to read file").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display() {
        let err = AppError::not_found("Post not found");
        assert_eq!(err.to_string(), "[Not Found] Post not found");

        let err_with_action =
            AppError::bad_request("Invalid email").with_action("Enter valid email");
        assert!(err_with_action.to_string().contains("Action:"));
    }

    #[test]
    fn test_is_server_error() {
        assert!(!AppError::not_found("test").is_server_error());
        assert!(AppError::internal("test").is_server_error());
    }

    #[test]
    fn test_result_ext() {
        let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "not found",
        ));
        let app_result = result.map_app_err(ErrorKind::NotFound, "Resource not found");
        assert!(app_result.is_err());
        assert_eq!(app_result.unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_not_found("Item not found");
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status_code(), 404);

        let some: Option<i32> = Some(42);
        let result = some.ok_or_not_found("Item not found");
        assert_eq!(result.unwrap(), 42);
    }
}
