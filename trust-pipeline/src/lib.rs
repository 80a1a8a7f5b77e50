//! Trust Pipeline - Community contribution submission and fan-out
//!
//! Takes a contribution from a member or a guest through validation and
//! moderation gates into a single store write, then runs best-effort
//! post-commit effects:
//!
//! - **Gates**: ban check, official-response check, blacklist flagging,
//!   guest safety classification
//! - **Store**: one atomic insert with every derived field resolved
//! - **Effects**: insight summary, summons resolution and reputation,
//!   auto-citation, expert-reply notifications, aggregate recomputation
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   ┌─────────┐   ┌───────┐   ┌──────────────────────┐
//! │ Validator │──▶│  Gates  │──▶│ Store │──▶│  EffectOrchestrator  │
//! └───────────┘   └─────────┘   └───────┘   │ insight · reputation │
//!                                            │ citation · fan-out   │
//!                                            │ aggregate            │
//!                                            └──────────────────────┘
//! ```
//!
//! Effect failures are logged and reported in [`SubmissionReceipt::effects`];
//! they never turn a stored contribution into a failed submission.

pub mod collaborators;
pub mod config;
pub mod effects;
pub mod error;
pub mod gates;
pub mod memory;
pub mod ports;
pub mod request;
pub mod response;
pub mod service;
pub mod telemetry;

// Re-export main types
pub use config::PipelineConfig;
pub use effects::{EffectOrchestrator, EffectOutcome, EffectReport, EffectStatus, SideEffect};
pub use error::{CollaboratorError, Result, SideEffectError, StoreError, SubmissionError};
pub use memory::InMemoryStore;
pub use request::{ContributionDraft, GuestContributionDraft};
pub use response::{ContributorStanding, ReviewDecision, SubmissionReceipt, SubmissionResponse};
pub use service::{ContributionPipeline, PipelineDeps};
