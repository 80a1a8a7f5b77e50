//! Backend contract for the moderation agents.
//!
//! Both agents make single-turn calls: a fixed instruction plus the text
//! under review. Requests are shaped for exactly that.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from an LLM backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Backend could not be reached or built
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Non-success HTTP status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited by backend")]
    RateLimited,

    /// The provider refused to answer
    #[error("Content filtered: {reason}")]
    ContentFiltered { reason: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// An LLM that answers single-turn prompts.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Model identifier, for logs.
    fn id(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// One instruction, one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub instruction: String,
    pub input: String,
    pub max_tokens: u32,
    /// Clamped to 0.0..=2.0
    pub temperature: f32,
    /// Ask the backend for a JSON object
    pub json_output: bool,
}

impl CompletionRequest {
    pub fn new(instruction: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            input: input.into(),
            max_tokens: 256,
            temperature: 0.0,
            json_output: false,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// What the backend answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    /// Generation stopped at the token limit
    pub truncated: bool,
}

impl CompletionResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            truncated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("be brief", "hello")
            .with_temperature(5.0)
            .with_max_tokens(64)
            .json();

        assert_eq!(request.instruction, "be brief");
        assert_eq!(request.input, "hello");
        assert_eq!(request.temperature, 2.0);
        assert_eq!(request.max_tokens, 64);
        assert!(request.json_output);
    }

    #[test]
    fn test_defaults_are_deterministic() {
        let request = CompletionRequest::new("classify", "text");
        assert_eq!(request.temperature, 0.0);
        assert!(!request.json_output);
    }
}
