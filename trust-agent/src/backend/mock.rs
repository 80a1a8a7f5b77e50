//! Canned backend for tests.

use async_trait::async_trait;
use std::sync::Mutex;

use super::traits::*;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail,
}

/// Returns a fixed reply and records every request it sees.
#[derive(Debug)]
pub struct MockBackend {
    model: String,
    reply: Reply,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl MockBackend {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reply: Reply::Text(r#"{"is_safe": true, "confidence": "high"}"#.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, content: impl Into<String>) -> Self {
        self.reply = Reply::Text(content.into());
        self
    }

    /// Every call fails with `RequestFailed`.
    pub fn with_failure(mut self) -> Self {
        self.reply = Reply::Fail;
        self
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    /// Input text of the most recent request.
    pub fn last_prompt(&self) -> Option<String> {
        self.seen
            .lock()
            .ok()
            .and_then(|seen| seen.last().map(|request| request.input.clone()))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock-guard")
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request);
        }

        match &self.reply {
            Reply::Text(content) => Ok(CompletionResponse::text(content.clone())),
            Reply::Fail => Err(LlmError::RequestFailed(format!("{} refused the call", self.model))),
        }
    }
}
