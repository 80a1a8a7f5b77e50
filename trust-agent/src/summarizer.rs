//! Insight summaries for expert contributions.

use async_trait::async_trait;
use std::sync::Arc;

use crate::backend::traits::{CompletionRequest, LlmBackend};
use crate::types::AgentError;

const SUMMARY_SYSTEM_PROMPT: &str = "Summarize the expert comment below as one short, neutral \
sentence a reader can scan. Do not add claims the comment does not make. \
Reply with the sentence only.";

/// External summarizer. `Ok(None)` means nothing worth storing.
#[async_trait]
pub trait InsightSummarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<Option<String>, AgentError>;
}

/// Summarizer backed by an LLM.
pub struct LlmInsightSummarizer {
    backend: Arc<dyn LlmBackend>,
    max_tokens: u32,
}

impl LlmInsightSummarizer {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            max_tokens: 120,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl InsightSummarizer for LlmInsightSummarizer {
    async fn summarize(&self, text: &str) -> Result<Option<String>, AgentError> {
        let request = CompletionRequest::new(SUMMARY_SYSTEM_PROMPT, text)
            .with_max_tokens(self.max_tokens)
            .with_temperature(0.3);

        let completion = self.backend.complete(request).await?;
        let summary = completion.content.trim();

        Ok((!summary.is_empty()).then(|| summary.to_string()))
    }
}
