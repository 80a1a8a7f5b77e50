//! Post-commit side effects.
//!
//! Effects run after the contribution row is durable. Each one is isolated:
//! it runs on its own task under a timeout, and its failure (error, panic or
//! timeout) is logged and reported but never reaches the submitter.

pub mod aggregate;
pub mod citation;
pub mod fanout;
pub mod insight;
pub mod reputation;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use trust_core::{Contribution, ContributorProfile};

use crate::error::{SideEffectError, StoreError};
use crate::ports::ProfileStore;

pub use aggregate::AggregateEffect;
pub use citation::CitationEffect;
pub use fanout::{FanoutReport, NotificationFanout};
pub use insight::InsightEffect;
pub use reputation::ReputationEffect;

/// What an effect did when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    Applied { detail: String },
    Skipped { reason: String },
}

impl EffectOutcome {
    pub fn applied(detail: impl Into<String>) -> Self {
        Self::Applied {
            detail: detail.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectStatus {
    Applied,
    Skipped,
    Failed,
    TimedOut,
}

/// Result of one effect run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectReport {
    pub effect: String,
    pub status: EffectStatus,
    pub detail: Option<String>,
    pub duration_ms: u64,
}

/// A step that runs after a contribution is stored.
#[async_trait]
pub trait SideEffect: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(&self, contribution: &Contribution) -> Result<EffectOutcome, SideEffectError>;
}

/// Boxed future returned by [`FnEffect`] closures.
pub type EffectFuture = Pin<Box<dyn Future<Output = Result<EffectOutcome, SideEffectError>> + Send>>;

/// Adapts a closure into a [`SideEffect`].
pub struct FnEffect<F> {
    name: &'static str,
    f: F,
}

impl<F> FnEffect<F>
where
    F: Fn(Contribution) -> EffectFuture + Send + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

#[async_trait]
impl<F> SideEffect for FnEffect<F>
where
    F: Fn(Contribution) -> EffectFuture + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    async fn apply(&self, contribution: &Contribution) -> Result<EffectOutcome, SideEffectError> {
        (self.f)(contribution.clone()).await
    }
}

/// Runs effects in order, each isolated from the others.
pub struct EffectOrchestrator {
    effects: Vec<Arc<dyn SideEffect>>,
    timeout: Duration,
}

impl EffectOrchestrator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            effects: Vec::new(),
            timeout,
        }
    }

    /// Append an effect; effects run in the order they were added.
    pub fn with_effect(mut self, effect: Arc<dyn SideEffect>) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Run every effect against a stored contribution.
    pub async fn run(&self, contribution: &Contribution) -> Vec<EffectReport> {
        let mut reports = Vec::with_capacity(self.effects.len());
        for effect in &self.effects {
            reports.push(self.run_one(Arc::clone(effect), contribution).await);
        }
        reports
    }

    async fn run_one(&self, effect: Arc<dyn SideEffect>, contribution: &Contribution) -> EffectReport {
        let start = Instant::now();
        let name = effect.name();
        let row = contribution.clone();

        let mut handle = tokio::spawn(async move { effect.apply(&row).await });

        let (status, detail) = match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(Ok(Ok(EffectOutcome::Applied { detail }))) => {
                debug!(effect = name, contribution_id = %contribution.id, "Effect applied");
                (EffectStatus::Applied, Some(detail))
            }
            Ok(Ok(Ok(EffectOutcome::Skipped { reason }))) => {
                debug!(effect = name, contribution_id = %contribution.id, reason = %reason, "Effect skipped");
                (EffectStatus::Skipped, Some(reason))
            }
            Ok(Ok(Err(e))) => {
                warn!(effect = name, contribution_id = %contribution.id, error = %e, "Effect failed");
                (EffectStatus::Failed, Some(e.to_string()))
            }
            Ok(Err(join_error)) => {
                error!(effect = name, contribution_id = %contribution.id, error = %join_error, "Effect task aborted");
                (EffectStatus::Failed, Some(join_error.to_string()))
            }
            Err(_) => {
                handle.abort();
                warn!(
                    effect = name,
                    contribution_id = %contribution.id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Effect timed out"
                );
                (EffectStatus::TimedOut, None)
            }
        };

        EffectReport {
            effect: name.to_string(),
            status,
            detail,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// The author's current profile, or a fresh one when none is stored yet.
pub(crate) async fn author_profile(
    profiles: &dyn ProfileStore,
    author_id: &str,
) -> Result<ContributorProfile, StoreError> {
    Ok(profiles
        .profile(author_id)
        .await?
        .unwrap_or_else(|| ContributorProfile::new(author_id)))
}
