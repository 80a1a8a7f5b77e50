//! In-memory implementations of the storage ports.
//!
//! Backs tests and single-process deployments. Conditional updates
//! (summons resolution, status transitions) happen under one write lock,
//! so they hold under concurrent callers.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use trust_core::{
    CitationRecord, Contribution, ContributionStatus, ContributorProfile, NewContribution,
    SignalRecord, SignalType, SummonsRequest,
};

use crate::error::{CollaboratorError, StoreError};
use crate::ports::{
    CitationStore, ContributionStore, IdentityProvider, ProfileStore, SignalStore, SummonsStore,
};

#[derive(Default)]
struct ContributionTable {
    rows: HashMap<String, Contribution>,
    /// Insertion order, for oldest-first listing
    order: Vec<String>,
}

/// One store implementing every storage port.
#[derive(Default)]
pub struct InMemoryStore {
    contributions: Arc<RwLock<ContributionTable>>,
    profiles: DashMap<String, ContributorProfile>,
    summons: Arc<RwLock<Vec<SummonsRequest>>>,
    signals: Arc<RwLock<Vec<SignalRecord>>>,
    citations: Arc<RwLock<HashMap<String, CitationRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile.
    pub fn put_profile(&self, profile: ContributorProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    /// Register a summons request.
    pub async fn open_summons(&self, summons: SummonsRequest) {
        self.summons.write().await.push(summons);
    }

    /// Look up a summons by id.
    pub async fn summons(&self, summons_id: &str) -> Option<SummonsRequest> {
        self.summons
            .read()
            .await
            .iter()
            .find(|s| s.id == summons_id)
            .cloned()
    }

    /// Record a signal.
    pub async fn add_signal(&self, signal: SignalRecord) {
        self.signals.write().await.push(signal);
    }

    /// Number of stored contributions.
    pub async fn contribution_count(&self) -> usize {
        self.contributions.read().await.rows.len()
    }
}

#[async_trait]
impl ContributionStore for InMemoryStore {
    async fn insert(&self, row: NewContribution) -> Result<Contribution, StoreError> {
        let mut table = self.contributions.write().await;

        if let Some(parent_id) = &row.parent_id {
            let parent = table.rows.get(parent_id).ok_or_else(|| {
                StoreError::ConstraintViolation(format!(
                    "parent contribution {} does not exist",
                    parent_id
                ))
            })?;
            if parent.target_entity_id != row.target_entity_id {
                return Err(StoreError::ConstraintViolation(format!(
                    "parent contribution {} belongs to another entity",
                    parent_id
                )));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let contribution = row.into_contribution(id.clone(), Utc::now());
        table.rows.insert(id.clone(), contribution.clone());
        table.order.push(id);

        Ok(contribution)
    }

    async fn get(&self, id: &str) -> Result<Option<Contribution>, StoreError> {
        Ok(self.contributions.read().await.rows.get(id).cloned())
    }

    async fn set_insight_summary(&self, id: &str, summary: &str) -> Result<(), StoreError> {
        let mut table = self.contributions.write().await;
        let row = table
            .rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("contribution {}", id)))?;
        row.insight_summary = Some(summary.to_string());
        Ok(())
    }

    async fn transition_status(
        &self,
        id: &str,
        from: ContributionStatus,
        to: ContributionStatus,
    ) -> Result<Option<Contribution>, StoreError> {
        let mut table = self.contributions.write().await;
        let row = table
            .rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("contribution {}", id)))?;
        if row.status != from {
            return Ok(None);
        }
        row.status = to;
        Ok(Some(row.clone()))
    }

    async fn record_flag(&self, id: &str) -> Result<Contribution, StoreError> {
        let mut table = self.contributions.write().await;
        let row = table
            .rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("contribution {}", id)))?;
        row.flag_count = row.flag_count.saturating_add(1);
        row.is_flagged = true;
        Ok(row.clone())
    }

    async fn list_for_target(&self, target_entity_id: &str) -> Result<Vec<Contribution>, StoreError> {
        let table = self.contributions.read().await;
        Ok(table
            .order
            .iter()
            .filter_map(|id| table.rows.get(id))
            .filter(|row| row.target_entity_id == target_entity_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn profile(&self, identity_id: &str) -> Result<Option<ContributorProfile>, StoreError> {
        Ok(self.profiles.get(identity_id).map(|p| p.clone()))
    }

    async fn award_points(&self, identity_id: &str, points: u64) -> Result<u64, StoreError> {
        let mut profile = self
            .profiles
            .entry(identity_id.to_string())
            .or_insert_with(|| ContributorProfile::new(identity_id));
        profile.contributor_score = profile.contributor_score.saturating_add(points);
        Ok(profile.contributor_score)
    }
}

#[async_trait]
impl SummonsStore for InMemoryStore {
    async fn open_summons_for(
        &self,
        target_entity_id: &str,
    ) -> Result<Option<SummonsRequest>, StoreError> {
        Ok(self
            .summons
            .read()
            .await
            .iter()
            .find(|s| s.target_entity_id == target_entity_id && !s.is_resolved)
            .cloned())
    }

    async fn resolve_if_open(&self, summons_id: &str) -> Result<bool, StoreError> {
        let mut summons = self.summons.write().await;
        let request = summons
            .iter_mut()
            .find(|s| s.id == summons_id)
            .ok_or_else(|| StoreError::NotFound(format!("summons {}", summons_id)))?;
        if request.is_resolved {
            return Ok(false);
        }
        request.is_resolved = true;
        Ok(true)
    }
}

#[async_trait]
impl SignalStore for InMemoryStore {
    async fn signalers(
        &self,
        contribution_id: &str,
        signal_type: SignalType,
    ) -> Result<Vec<String>, StoreError> {
        let signals = self.signals.read().await;
        let mut users: Vec<String> = Vec::new();
        for signal in signals
            .iter()
            .filter(|s| s.contribution_id == contribution_id && s.signal_type == signal_type)
        {
            if !users.contains(&signal.user_id) {
                users.push(signal.user_id.clone());
            }
        }
        Ok(users)
    }
}

#[async_trait]
impl CitationStore for InMemoryStore {
    async fn insert_citation(&self, record: CitationRecord) -> Result<(), StoreError> {
        let mut citations = self.citations.write().await;
        if citations.contains_key(&record.contribution_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "citation for contribution {} already exists",
                record.contribution_id
            )));
        }
        citations.insert(record.contribution_id.clone(), record);
        Ok(())
    }

    async fn citation_for(&self, contribution_id: &str) -> Result<Option<CitationRecord>, StoreError> {
        Ok(self.citations.read().await.get(contribution_id).cloned())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryStore {
    async fn is_banned(&self, identity_id: &str) -> Result<bool, CollaboratorError> {
        Ok(self
            .profiles
            .get(identity_id)
            .map(|p| p.is_banned)
            .unwrap_or(false))
    }
}
