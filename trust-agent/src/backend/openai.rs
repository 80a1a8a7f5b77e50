//! Chat-completions backend for any OpenAI-compatible server.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use super::traits::*;

/// Where the moderation model lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL including the API version, e.g. `http://localhost:8000/v1`
    pub base_url: String,
    pub model: String,
    /// Sent as a bearer token when set
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/v1".to_string(),
            model: "llama-guard".to_string(),
            api_key: None,
            request_timeout_ms: 10_000,
        }
    }
}

pub struct OpenAiBackend {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenAiBackend {
    pub fn from_config(config: &BackendConfig) -> Result<Self, LlmError> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| LlmError::Unavailable(format!("invalid api key: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| LlmError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }

    fn body(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.instruction },
                { "role": "user", "content": request.input },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "stream": false,
        });
        if request.json_output {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.body(&request))
            .send()
            .await
            .map_err(|e| LlmError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(LlmError::RateLimited),
            status if !status.is_success() => {
                let detail = response.text().await.unwrap_or_default();
                return Err(LlmError::RequestFailed(format!("{}: {}", status, detail)));
            }
            _ => {}
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;
        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError("empty choices".to_string()))?;

        match choice.finish_reason.as_deref() {
            Some("content_filter") => Err(LlmError::ContentFiltered {
                reason: format!("{} declined to answer", self.model),
            }),
            finish => Ok(CompletionResponse {
                content: choice.message.content.unwrap_or_default(),
                truncated: finish == Some("length"),
            }),
        }
    }
}
