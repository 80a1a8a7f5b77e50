//! Shared types for the moderation agents.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::backend::traits::LlmError;

/// Errors from the classifier and summarizer.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Backend call failed
    #[error("Backend error: {0}")]
    Backend(#[from] LlmError),

    /// Backend answered, but not with a usable verdict
    #[error("Malformed verdict: {0}")]
    MalformedVerdict(String),
}

/// How sure the classifier is about a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

/// Outcome of a safety classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SafetyVerdict {
    pub is_safe: bool,
    pub confidence: Confidence,
    pub reason: String,
}

impl SafetyVerdict {
    pub fn safe(confidence: Confidence) -> Self {
        Self {
            is_safe: true,
            confidence,
            reason: String::new(),
        }
    }

    pub fn unsafe_because(reason: impl Into<String>) -> Self {
        Self {
            is_safe: false,
            confidence: Confidence::High,
            reason: reason.into(),
        }
    }
}
