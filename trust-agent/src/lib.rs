//! Trust Agent - AI collaborators for the contribution pipeline
//!
//! Provides the model-backed checks the pipeline calls out to:
//! - Trait-based LLM backends (OpenAI-compatible, mock)
//! - Safety classification of guest submissions
//! - Insight summaries of expert contributions
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │ LlmSafetyClassifier  │   │ LlmInsightSummarizer │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            └────────────┬─────────────┘
//!                         ▼
//!                  ┌─────────────┐
//!                  │ LlmBackend  │
//!                  │ (OpenAI/    │
//!                  │  Mock)      │
//!                  └─────────────┘
//! ```

pub mod backend;
pub mod safety;
pub mod summarizer;
pub mod types;

// Re-export main types for convenience
pub use backend::traits::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};
pub use backend::{BackendConfig, MockBackend, OpenAiBackend};
pub use safety::{LlmSafetyClassifier, SafetyClassifier};
pub use summarizer::{InsightSummarizer, LlmInsightSummarizer};
pub use types::*;
