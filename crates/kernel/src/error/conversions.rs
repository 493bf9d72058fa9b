//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            std::io::ErrorKind::TimedOut => ErrorKind::RequestTimeout,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        classify_sqlx(&err).with_source(err)
    }
}

/// Classification half of the sqlx conversion
///
/// Borrowing callers (domain `kind()` implementations) share this table
/// with [`From<sqlx::Error>`], which additionally attaches the source.
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> AppError {
    match err {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::PoolTimedOut => {
            AppError::service_unavailable("Database connection pool exhausted")
        }
        sqlx::Error::Database(db_err) => {
            // PostgreSQL specific error codes
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    // Class 23 — Integrity Constraint Violation
                    "23000" => AppError::conflict("Integrity constraint violation"),
                    "23502" => AppError::bad_request("Required field is null"),
                    "23503" => AppError::conflict("Foreign key violation"),
                    "23505" => AppError::conflict("Duplicate key value"),
                    "23514" => AppError::bad_request("Check constraint violation"),
                    // Class 42 — Syntax Error or Access Rule Violation
                    "42501" => AppError::forbidden("Insufficient privilege"),
                    // Class 53 — Insufficient Resources
                    "53000" | "53100" | "53200" | "53300" => {
                        AppError::service_unavailable("Database resource exhausted")
                    }
                    // Class 57 — Operator Intervention
                    "57000" | "57014" | "57P01" | "57P02" | "57P03" => {
                        AppError::service_unavailable("Database unavailable")
                    }
                    _ => AppError::internal("Database error"),
                }
            } else {
                AppError::internal("Database error")
            }
        }
        sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error"),
        sqlx::Error::Protocol(_) => AppError::internal("Database protocol error"),
        sqlx::Error::Tls(_) => AppError::internal("Database TLS error"),
        _ => AppError::internal("Database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_io_timeout_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::RequestTimeout);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }
}

#[cfg(all(test, feature = "sqlx"))]
mod sqlx_tests {
    use std::borrow::Cow;
    use std::error::Error;

    use super::*;

    /// Stand-in for a driver error carrying a PostgreSQL error code
    #[derive(Debug)]
    struct CodedDbError {
        code: &'static str,
    }

    impl std::fmt::Display for CodedDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "database error {}", self.code)
        }
    }

    impl Error for CodedDbError {}

    impl sqlx::error::DatabaseError for CodedDbError {
        fn message(&self) -> &str {
            "database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.code {
                "23505" => sqlx::error::ErrorKind::UniqueViolation,
                "23503" => sqlx::error::ErrorKind::ForeignKeyViolation,
                "23502" => sqlx::error::ErrorKind::NotNullViolation,
                "23514" => sqlx::error::ErrorKind::CheckViolation,
                _ => sqlx::error::ErrorKind::Other,
            }
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(CodedDbError { code }))
    }

    #[test]
    fn test_duplicate_key_maps_to_conflict() {
        let app_err: AppError = db_error("23505").into();
        assert_eq!(app_err.kind(), ErrorKind::Conflict);
        assert_eq!(app_err.status_code(), 409);
        assert!(app_err.source().is_some());
    }

    #[test]
    fn test_constraint_codes_map_to_client_kinds() {
        let cases = [
            ("23000", ErrorKind::Conflict),
            ("23502", ErrorKind::BadRequest),
            ("23503", ErrorKind::Conflict),
            ("23514", ErrorKind::BadRequest),
            ("42501", ErrorKind::Forbidden),
        ];
        for (code, expected) in cases {
            let app_err: AppError = db_error(code).into();
            assert_eq!(app_err.kind(), expected, "kind mismatch for code {code}");
        }
    }

    #[test]
    fn test_resource_codes_map_to_service_unavailable() {
        for code in ["53300", "57014"] {
            let app_err: AppError = db_error(code).into();
            assert_eq!(app_err.kind(), ErrorKind::ServiceUnavailable);
        }
    }

    #[test]
    fn test_unknown_code_maps_to_internal() {
        let app_err: AppError = db_error("42P01").into();
        assert_eq!(app_err.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_classify_borrows_without_consuming() {
        let err = sqlx::Error::PoolTimedOut;
        assert_eq!(classify_sqlx(&err).kind(), ErrorKind::ServiceUnavailable);
        // still usable afterwards
        let app_err: AppError = err.into();
        assert_eq!(app_err.kind(), ErrorKind::ServiceUnavailable);
    }
}
