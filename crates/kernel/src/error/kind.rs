//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that maps to HTTP status codes.

use serde::Serialize;

/// Error classification
///
/// The remote store speaks HTTP, so failures are classified along the
/// status codes it reports. Each variant maps to an RFC 7231/9110
/// status code.
///
/// ## Notes
/// * `non_exhaustive` - more variants may be added later
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.status_code(), 404);
/// assert_eq!(kind.as_str(), "Not Found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Bad Request: malformed or rejected input
    BadRequest,
    /// 401 - Unauthorized: credentials missing or rejected
    Unauthorized,
    /// 403 - Forbidden: no access rights
    Forbidden,
    /// 404 - Not Found: resource does not exist
    NotFound,
    /// 408 - Request Timeout: the operation exceeded its time bound
    RequestTimeout,
    /// 409 - Conflict: conflicts with current state
    Conflict,
    /// 500 - Internal Server Error
    InternalServerError,
    /// 503 - Service Unavailable: store unreachable or exhausted
    ServiceUnavailable,
}

impl ErrorKind {
    /// HTTP status code for this kind
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::BadRequest.status_code(), 400);
    /// assert_eq!(ErrorKind::NotFound.status_code(), 404);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::RequestTimeout => 408,
            ErrorKind::Conflict => 409,
            ErrorKind::InternalServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// User-facing string representation
    ///
    /// ## Returns
    /// The standard reason phrase for the HTTP status
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::BadRequest.as_str(), "Bad Request");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::RequestTimeout => "Request Timeout",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Whether this is a server-side error
    ///
    /// 5xx kinds return `true`. These should be logged.
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Whether this is a client-side error
    ///
    /// 4xx kinds return `true`.
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::BadRequest.status_code(), 400);
        assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::RequestTimeout.status_code(), 408);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::InternalServerError.status_code(), 500);
        assert_eq!(ErrorKind::ServiceUnavailable.status_code(), 503);
    }

    #[test]
    fn test_is_server_error() {
        assert!(!ErrorKind::BadRequest.is_server_error());
        assert!(!ErrorKind::NotFound.is_server_error());
        assert!(ErrorKind::InternalServerError.is_server_error());
        assert!(ErrorKind::ServiceUnavailable.is_server_error());
    }

    #[test]
    fn test_is_client_error() {
        assert!(ErrorKind::BadRequest.is_client_error());
        assert!(ErrorKind::NotFound.is_client_error());
        assert!(!ErrorKind::InternalServerError.is_client_error());
    }
}
