//! Unified error types for the Evently planner
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic and repository errors
//! - `AppError`: Application layer errors (wraps domain errors for callers)
//!
//! Attribute resolution and vote tallying are total and never produce errors;
//! only the services that load and store events and polls do.

use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Application layer errors - returned by services
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short machine-readable kind, used when reporting errors to tool callers
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Domain(DomainError::NotFound(_)) | AppError::NotFound(_) => "not_found",
            AppError::Domain(DomainError::AlreadyExists(_)) => "already_exists",
            AppError::Domain(DomainError::Validation(_)) | AppError::BadRequest(_) => "invalid",
            AppError::Domain(DomainError::Conflict(_)) => "conflict",
            AppError::Domain(DomainError::Internal(_)) | AppError::Internal(_) => "internal",
        }
    }
}
