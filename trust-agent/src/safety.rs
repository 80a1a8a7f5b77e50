//! Safety classification for unauthenticated submissions.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::backend::traits::{CompletionRequest, LlmBackend};
use crate::types::{AgentError, Confidence, SafetyVerdict};

const SAFETY_SYSTEM_PROMPT: &str = "You review community comments on a wellness catalog. \
Decide whether the comment is safe to publish: no harassment, hate, spam, sexual content, \
or dangerous medical advice. Answer with a JSON object: \
{\"is_safe\": boolean, \"confidence\": \"high\" | \"low\", \"reason\": string}. \
Use \"low\" confidence when you are unsure.";

/// External moderation check.
#[async_trait]
pub trait SafetyClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SafetyVerdict, AgentError>;
}

/// Classifier backed by an LLM returning a JSON verdict.
pub struct LlmSafetyClassifier {
    backend: Arc<dyn LlmBackend>,
}

impl LlmSafetyClassifier {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(alias = "isSafe")]
    is_safe: bool,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

#[async_trait]
impl SafetyClassifier for LlmSafetyClassifier {
    async fn classify(&self, text: &str) -> Result<SafetyVerdict, AgentError> {
        let request = CompletionRequest::new(SAFETY_SYSTEM_PROMPT, text)
            .with_max_tokens(256)
            .json();

        let completion = self.backend.complete(request).await?;
        let verdict = parse_verdict(&completion.content)?;

        debug!(
            backend = %self.backend.id(),
            is_safe = verdict.is_safe,
            confidence = ?verdict.confidence,
            "Safety verdict"
        );

        Ok(verdict)
    }
}

/// Parse a JSON verdict, tolerating markdown code fences.
pub fn parse_verdict(content: &str) -> Result<SafetyVerdict, AgentError> {
    let body = strip_code_fence(content);
    let raw: RawVerdict =
        serde_json::from_str(body).map_err(|e| AgentError::MalformedVerdict(e.to_string()))?;

    // anything other than an explicit "high" is treated as low confidence
    let confidence = match raw.confidence.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("high") => Confidence::High,
        _ => Confidence::Low,
    };

    Ok(SafetyVerdict {
        is_safe: raw.is_safe,
        confidence,
        reason: raw.reason.unwrap_or_default(),
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
