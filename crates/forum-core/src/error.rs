//! Domain-level error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain errors - business logic failures of the post lifecycle.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Storage failure: {0}")]
    Storage(#[source] RepoError),
}

impl DomainError {
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }

    pub fn post_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity_type: "post",
            id: id.to_string(),
        }
    }

    pub fn reason(&self) -> FailureReason {
        match self {
            DomainError::Validation(_) => FailureReason::MissingFields,
            DomainError::NotFound { .. } => FailureReason::NotFound,
            DomainError::Unauthorized => FailureReason::Unauthorized,
            DomainError::Storage(_) => FailureReason::Failed,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Machine-readable failure code reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    MissingFields,
    Unauthorized,
    NotFound,
    Failed,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::MissingFields => "missing-fields",
            FailureReason::Unauthorized => "unauthorized",
            FailureReason::NotFound => "not-found",
            FailureReason::Failed => "failed",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform failure result: a reason code plus a human-readable message.
///
/// Storage failures never carry their cause here; it is logged where it happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub reason: FailureReason,
    pub message: String,
}

impl From<DomainError> for Failure {
    fn from(err: DomainError) -> Self {
        let reason = err.reason();
        let message = match err {
            DomainError::Storage(_) => "The operation failed. Please try again later.".to_string(),
            other => other.to_string(),
        };
        Self { reason, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failures_hide_their_cause() {
        let failure = Failure::from(DomainError::Storage(RepoError::Query(
            "relation \"posts\" does not exist".to_string(),
        )));

        assert_eq!(failure.reason, FailureReason::Failed);
        assert!(!failure.message.contains("posts"));
    }

    #[test]
    fn reasons_render_kebab_case() {
        assert_eq!(FailureReason::MissingFields.to_string(), "missing-fields");
        assert_eq!(
            serde_json::to_string(&FailureReason::NotFound).unwrap(),
            "\"not-found\""
        );
    }

    #[test]
    fn validation_lists_missing_fields() {
        let failure = Failure::from(DomainError::missing_fields(&["title", "content"]));
        assert_eq!(failure.reason, FailureReason::MissingFields);
        assert_eq!(failure.message, "Validation failed: Missing required fields: title, content");
    }
}
