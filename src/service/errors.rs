//! Error taxonomy for the entity services.
//!
//! Backend failures arrive as raw `ClientError`s (Postgres/PostgREST code
//! plus message) and are classified per entity into `ServiceError` with the
//! display strings the panels surface. Validation errors never reach the
//! backing service.

use thiserror::Error;

/// Raw failure reported by the backing service client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: Option<String>,
    pub message: String,
}

impl ClientError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Failure with no backend code (transport errors, decode errors)
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

/// Backend error codes the services classify.
pub mod backend_codes {
    /// PostgREST: a `.single()`-style request matched zero rows
    pub const NO_ROWS: &str = "PGRST116";
    /// Postgres: unique constraint violation
    pub const UNIQUE_VIOLATION: &str = "23505";
    /// Postgres: foreign key constraint violation
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
}

/// Classified service failure. The display string is the user-facing
/// message; callers only ever observe it via `to_string()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Local validation failure; the backing store was never reached
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    ForeignKeyViolation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Unknown(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Per-entity display strings for classified backend failures.
#[derive(Debug, Clone, Copy)]
pub struct EntityErrorLabels {
    pub not_found: &'static str,
    pub duplicate: &'static str,
    pub foreign_key: &'static str,
}

/// Map a raw backend failure to the entity's display strings. Unrecognized
/// codes pass the backend message through unmodified, falling back to a
/// generic message naming the operation.
pub fn classify_backend_error(
    error: ClientError,
    operation: &str,
    labels: &EntityErrorLabels,
) -> ServiceError {
    tracing::error!(
        code = error.code.as_deref(),
        message = %error.message,
        operation = %operation,
        "backend error"
    );

    match error.code.as_deref() {
        Some(backend_codes::NO_ROWS) => ServiceError::NotFound(labels.not_found.to_string()),
        Some(backend_codes::UNIQUE_VIOLATION) => {
            ServiceError::Duplicate(labels.duplicate.to_string())
        }
        Some(backend_codes::FOREIGN_KEY_VIOLATION) => {
            ServiceError::ForeignKeyViolation(labels.foreign_key.to_string())
        }
        _ if !error.message.is_empty() => ServiceError::Unknown(error.message),
        _ => ServiceError::Unknown(format!("Erro inesperado ao {operation}")),
    }
}
