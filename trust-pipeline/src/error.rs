//! Error types for the contribution pipeline.

use trust_agent::AgentError;
use trust_core::{ContributionStatus, ValidationError};

/// Storage-layer failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Table or collection does not exist
    #[error("Storage schema missing: {0}")]
    SchemaMissing(String),

    /// Referenced row does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Foreign key or uniqueness violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Storage refused the operation
    #[error("Storage permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage error: {0}")]
    Unknown(String),
}

/// Failures of an external collaborator (notifier, blacklist, identity, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("Collaborator rejected the call: {0}")]
    Rejected(String),
}

/// Errors that abort a request and are returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// Bad input, no I/O attempted
    #[error("Invalid submission: {0}")]
    Validation(#[from] ValidationError),

    /// Caller identity missing or blank
    #[error("Caller identity could not be resolved")]
    InvalidIdentity,

    /// Ban or permission failure
    #[error("Access denied: {reason}")]
    AccessDenied { reason: String },

    /// Unsafe content on the guest path
    #[error("Rejected by moderation: {reason}")]
    ModerationRejected { reason: String },

    /// The store write (or read) failed
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// Status change not allowed from the current status
    #[error("Cannot move contribution from {from} to {to}")]
    InvalidTransition {
        from: ContributionStatus,
        to: ContributionStatus,
    },
}

impl SubmissionError {
    pub(crate) fn access_denied(reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionError::Validation(_) => "validation_error",
            SubmissionError::InvalidIdentity => "invalid_identity",
            SubmissionError::AccessDenied { .. } => "access_denied",
            SubmissionError::ModerationRejected { .. } => "moderation_rejected",
            SubmissionError::Persistence(StoreError::SchemaMissing(_)) => "persistence_schema_missing",
            SubmissionError::Persistence(StoreError::NotFound(_)) => "persistence_not_found",
            SubmissionError::Persistence(StoreError::ConstraintViolation(_)) => {
                "persistence_constraint"
            }
            SubmissionError::Persistence(StoreError::PermissionDenied(_)) => {
                "persistence_permission_denied"
            }
            SubmissionError::Persistence(StoreError::Unknown(_)) => "persistence_unknown",
            SubmissionError::InvalidTransition { .. } => "invalid_transition",
        }
    }
}

/// Failure inside a post-commit effect. Logged, never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum SideEffectError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Every notification in a fan-out failed
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, SubmissionError>;
