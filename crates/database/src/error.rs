use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Failure taxonomy shared by every service operation. The server crate
/// maps each variant onto one HTTP status code.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    /// A referential precondition failed, e.g. recording attendance for a
    /// course the student is not assigned to.
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidInput(String),

    /// Uniqueness violation (batch name, user email).
    #[error("{0}")]
    Conflict(String),

    #[error("Database connection unavailable. Please try again later.")]
    StoreUnavailable(#[source] DbErr),

    #[error("database error: {0}")]
    Store(#[source] DbErr),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(entity.to_string())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::StoreUnavailable(err),
            other => Self::Store(other),
        }
    }
}

/// Maps a unique-index violation from an insert/update onto `Conflict`,
/// leaving every other database failure on the normal path.
pub fn on_unique_violation(err: DbErr, message: &str) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::conflict(message),
        _ => ServiceError::from(err),
    }
}
