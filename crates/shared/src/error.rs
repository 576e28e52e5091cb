//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Cross-cutting errors shared by the outer layers.
///
/// The ledger has its own taxonomy in `remit-core`; this enum covers
/// what is left: auth failures, request validation, uniqueness
/// conflicts, and infrastructure trouble.
#[derive(Debug, Error)]
pub enum AppError {
    /// The caller could not be authenticated.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request body or parameters failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request conflicts with existing state (e.g. a taken username).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The database misbehaved.
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else that should never happen.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status code this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// A stable machine-readable code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation("x".into()), 400, "VALIDATION_ERROR")]
    #[case(AppError::Unauthorized("x".into()), 401, "UNAUTHORIZED")]
    #[case(AppError::NotFound("x".into()), 404, "NOT_FOUND")]
    #[case(AppError::Conflict("x".into()), 409, "CONFLICT")]
    #[case(AppError::Database("x".into()), 500, "DATABASE_ERROR")]
    #[case(AppError::Internal("x".into()), 500, "INTERNAL_ERROR")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_display_includes_context() {
        let err = AppError::Conflict("username 'alice' is taken".into());
        assert_eq!(err.to_string(), "Conflict: username 'alice' is taken");
    }
}
