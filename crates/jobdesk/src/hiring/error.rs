use serde::Serialize;

use super::authz::Action;

/// A single field-level validation failure, recoverable by re-submitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error taxonomy for every hiring operation.
///
/// `Validation` and `Denied` are caller mistakes; `DuplicateApplication` and
/// `InvalidTransition` are conflicts that may prompt a state refresh;
/// `Dependency` wraps collaborator failures and is never retried here.
#[derive(Debug, thiserror::Error)]
pub enum HiringError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0:?} is not permitted for this actor")]
    Denied(Action),
    #[error("an application for this job by this applicant already exists")]
    DuplicateApplication,
    #[error("{entity} status cannot change from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("collaborator failure: {0}")]
    Dependency(String),
}

impl HiringError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<super::store::StoreError> for HiringError {
    fn from(value: super::store::StoreError) -> Self {
        match value {
            super::store::StoreError::Conflict => Self::DuplicateApplication,
            super::store::StoreError::NotFound => Self::NotFound("record"),
            super::store::StoreError::Unavailable(reason) => Self::Dependency(reason),
        }
    }
}

impl From<super::artifacts::BlobError> for HiringError {
    fn from(value: super::artifacts::BlobError) -> Self {
        Self::Dependency(value.to_string())
    }
}
