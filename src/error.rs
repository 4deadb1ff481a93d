use thiserror::Error;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the sqlx library.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Malformed or out-of-range input, including business-rule violations
    /// such as insufficient stock or an empty cart.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A not found error (resource does not exist).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A forbidden error (user lacks the required role).
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// A conflict error (unique field already taken).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An authentication error (missing/invalid token, bad credentials).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Sqlx(_) | Error::Migrate(_) | Error::Internal(_) | Error::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error code included in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Authentication(_) => "AUTHENTICATION_FAILED",
            Error::Forbidden(_) => "FORBIDDEN",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Conflict(_) => "CONFLICT",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Sqlx(_) | Error::Migrate(_) | Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Returns the violated constraint name when `error` is a unique violation.
pub fn unique_violation(error: &sqlx::Error) -> Option<&str> {
    match error {
        sqlx::Error::Database(db) if db.is_unique_violation() => db.constraint(),
        _ => None,
    }
}

/// Returns the violated constraint name when `error` is a foreign key violation.
pub fn foreign_key_violation(error: &sqlx::Error) -> Option<&str> {
    match error {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => db.constraint(),
        _ => None,
    }
}

/// True when `error` is Postgres `numeric_value_out_of_range` (22003),
/// e.g. an INTEGER column overflowing.
pub fn out_of_range(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.code().as_deref() == Some("22003"))
}

/// Malformed request bodies are reported as validation failures (400)
/// rather than axum's default 422.
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

/// Convert custom Error to HTTP response
///
/// Maps each variant to its status code and returns a JSON body with an
/// error message and error code. Server-side failures are logged and replaced
/// with a generic message so database details never reach the client.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Error::Validation(msg)
            | Error::NotFound(msg)
            | Error::Forbidden(msg)
            | Error::Conflict(msg)
            | Error::Authentication(msg) => msg.clone(),
            Error::Sqlx(_) | Error::Migrate(_) => {
                tracing::error!(error = %self, "Database error while handling request");
                "Database error".to_string()
            }
            Error::Internal(_) => {
                tracing::error!(error = %self, "Internal error while handling request");
                "Internal server error".to_string()
            }
            Error::Config(_) => {
                tracing::error!(error = %self, "Configuration error while handling request");
                "Configuration error".to_string()
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": self.code(),
        });

        (status, Json(body)).into_response()
    }
}
