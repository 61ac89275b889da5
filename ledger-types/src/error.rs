//! Error types for the ledger/FX service.

use crate::domain::AccountId;
use crate::ports::FxError;

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
}

/// Store-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes in the inbound adapter.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(DomainError::Validation(msg)) => AppError::BadRequest(msg),
            StoreError::Domain(DomainError::AccountNotFound(id)) => {
                AppError::NotFound(format!("Account not found: {id}"))
            }
            StoreError::NotFound => AppError::NotFound("Resource not found".into()),
            StoreError::Database(e) => AppError::Internal(e),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::from(StoreError::Domain(err))
    }
}

impl From<FxError> for AppError {
    fn from(err: FxError) -> Self {
        match err {
            // Missing credential is a deployment problem, not the caller's.
            FxError::Configuration(msg) => AppError::Internal(msg),
            FxError::Remote { .. } | FxError::Timeout { .. } | FxError::Transport(_) => {
                AppError::Upstream(err.to_string())
            }
        }
    }
}
