//! Service error type with structural classification.
//!
//! Rule engines tag every failure with an [`ErrorKind`] so the HTTP layer can
//! choose a status code without inspecting message text.

use thiserror::Error;

use crate::db::StoreError;

/// The kind of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range request field
    Validation,
    /// No row matches the addressed id
    NotFound,
    /// Breed is not listed in the breed registry
    InvalidBreed,
    /// The breed registry could not be consulted
    RegistryUnavailable,
    /// Targets cannot be added to a completed mission
    AssignmentAlreadyComplete,
    /// Completed targets cannot be deleted
    CannotDeleteCompleted,
    /// Any other domain rule rejection
    BusinessRule,
    /// Operation blocked by a linked record
    Conflict,
    /// Persistence failure
    Store,
}

/// Error returned by the cat and mission services.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BusinessRule, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::new(ErrorKind::Store, err.to_string())
    }
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
