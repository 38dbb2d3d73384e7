//! # Error Types
//!
//! Typed failures for the three request handlers and their mapping onto HTTP
//! status codes. Store-level failures are kept apart from business-rule
//! failures so the caller can tell a missing user from a broken connection.

use thiserror::Error;

/// PostgreSQL SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL SQLSTATE for `numeric_value_out_of_range`
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GamifyError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Method not allowed")]
    UnsupportedMethod(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Database(String),
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Internal(String),
}

impl GamifyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod(method.into())
    }

    /// HTTP status code the failure is reported with
    pub fn status_code(&self) -> u16 {
        match self {
            GamifyError::Validation(_) => 400,
            GamifyError::NotFound(_) => 404,
            GamifyError::UnsupportedMethod(_) => 405,
            GamifyError::Conflict(_) => 409,
            GamifyError::Database(_)
            | GamifyError::Configuration(_)
            | GamifyError::Internal(_) => 500,
        }
    }

    /// Whether the failure is the caller's fault rather than ours
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<sqlx::Error> for GamifyError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) | Some(FOREIGN_KEY_VIOLATION) => {
                    return GamifyError::Conflict(db_err.message().to_string());
                }
                Some(NUMERIC_VALUE_OUT_OF_RANGE) => {
                    return GamifyError::Validation(db_err.message().to_string());
                }
                _ => {}
            }
        }
        GamifyError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for GamifyError {
    fn from(err: serde_json::Error) -> Self {
        GamifyError::Validation(format!("Invalid request body: {err}"))
    }
}

impl From<config::ConfigError> for GamifyError {
    fn from(err: config::ConfigError) -> Self {
        GamifyError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GamifyError>;
