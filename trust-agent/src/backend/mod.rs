//! Model backends behind the safety classifier and the insight summarizer.

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockBackend;
pub use openai::{BackendConfig, OpenAiBackend};
pub use traits::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};
