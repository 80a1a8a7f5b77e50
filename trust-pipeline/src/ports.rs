//! Storage and collaborator interfaces the pipeline depends on.
//!
//! Every trait here is an implementation-agnostic contract. The pipeline
//! holds them as `Arc<dyn Trait>` and never assumes a backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trust_core::{
    BlacklistMatch, CitationRecord, Contribution, ContributionStatus, ContributorProfile,
    NewContribution, SignalType, SummonsRequest,
};

use crate::error::{CollaboratorError, StoreError};

// ============================================================================
// Storage
// ============================================================================

/// Contribution rows.
#[async_trait]
pub trait ContributionStore: Send + Sync {
    /// Persist a fully-formed row in one write, returning it with its id.
    async fn insert(&self, row: NewContribution) -> Result<Contribution, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Contribution>, StoreError>;

    async fn set_insight_summary(&self, id: &str, summary: &str) -> Result<(), StoreError>;

    /// Move `id` from `from` to `to`. `Ok(None)` when the row is no longer in `from`.
    async fn transition_status(
        &self,
        id: &str,
        from: ContributionStatus,
        to: ContributionStatus,
    ) -> Result<Option<Contribution>, StoreError>;

    /// Increment the flag count and mark the row flagged.
    async fn record_flag(&self, id: &str) -> Result<Contribution, StoreError>;

    /// All rows for a target, oldest first.
    async fn list_for_target(&self, target_entity_id: &str) -> Result<Vec<Contribution>, StoreError>;
}

/// Contributor profiles and the reputation ledger.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, identity_id: &str) -> Result<Option<ContributorProfile>, StoreError>;

    /// Add `points` to the score (creating the profile if needed); returns the new score.
    async fn award_points(&self, identity_id: &str, points: u64) -> Result<u64, StoreError>;
}

/// Summons requests.
#[async_trait]
pub trait SummonsStore: Send + Sync {
    /// Oldest unresolved summons for a target.
    async fn open_summons_for(&self, target_entity_id: &str)
        -> Result<Option<SummonsRequest>, StoreError>;

    /// Mark resolved only if still open. `true` when this call resolved it.
    async fn resolve_if_open(&self, summons_id: &str) -> Result<bool, StoreError>;
}

/// Signal records (read-only here).
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Distinct users holding a signal of `signal_type` on a contribution.
    async fn signalers(
        &self,
        contribution_id: &str,
        signal_type: SignalType,
    ) -> Result<Vec<String>, StoreError>;
}

/// Citation records.
#[async_trait]
pub trait CitationStore: Send + Sync {
    /// Insert once per contribution; a second insert is a constraint violation.
    async fn insert_citation(&self, record: CitationRecord) -> Result<(), StoreError>;

    async fn citation_for(&self, contribution_id: &str) -> Result<Option<CitationRecord>, StoreError>;
}

// ============================================================================
// Collaborators
// ============================================================================

/// Ban lookup for an explicit caller identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn is_banned(&self, identity_id: &str) -> Result<bool, CollaboratorError>;
}

/// Entry queued for moderator review after a blacklist hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub contribution_id: String,
    pub kind: String,
    pub text: String,
    pub target_entity_id: String,
    pub author_id: Option<String>,
    pub matched_keywords: Vec<String>,
    pub queued_at: DateTime<Utc>,
}

/// Keyword blacklist and its review queue.
#[async_trait]
pub trait BlacklistHandler: Send + Sync {
    async fn scan(&self, text: &str) -> Result<Vec<BlacklistMatch>, CollaboratorError>;

    async fn queue_for_review(&self, item: ReviewItem) -> Result<(), CollaboratorError>;
}

/// A single in-app notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: String,
    pub link: String,
}

/// Per-recipient notification delivery.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn notify(
        &self,
        recipient_id: &str,
        notification: &Notification,
    ) -> Result<(), CollaboratorError>;
}

/// Recomputes an entity's aggregate rating.
#[async_trait]
pub trait AggregateRecomputer: Send + Sync {
    async fn recompute_aggregate(&self, target_entity_id: &str) -> Result<(), CollaboratorError>;
}

/// Cache / view refresh after a successful write.
#[async_trait]
pub trait PathInvalidator: Send + Sync {
    async fn invalidate(&self, target_entity_id: &str) -> Result<(), CollaboratorError>;
}
