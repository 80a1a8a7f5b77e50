//! Contribution pipeline service.
//!
//! Two entry points, one per caller class:
//!
//! - [`ContributionPipeline::submit_authenticated`]: ban gate, official-response
//!   gate and blacklist scan. No safety classifier: members are trusted more
//!   than anonymous callers, and that asymmetry is deliberate.
//! - [`ContributionPipeline::submit_guest`]: stricter validation and the safety
//!   classifier, whose verdict decides whether and how the row is stored.
//!
//! Both end in one store write followed by the post-commit effects, whose
//! failures never change the caller's result.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use trust_agent::{InsightSummarizer, SafetyClassifier};
use trust_core::{
    resolve_post_kind, validate_content, validate_target, Authorship, BlacklistMatch, CallerClass,
    CallerContext, ChakraTable, Contribution, ContributionStatus, NewContribution, RawContent,
    RoleClassifier,
};

use crate::collaborators::{
    KeywordBlacklistHandler, LoggingAggregateRecomputer, LoggingNotifier, LoggingPathInvalidator,
};
use crate::config::PipelineConfig;
use crate::effects::{
    author_profile, AggregateEffect, CitationEffect, EffectOrchestrator, InsightEffect,
    NotificationFanout, ReputationEffect,
};
use crate::error::{Result, StoreError, SubmissionError};
use crate::gates;
use crate::memory::InMemoryStore;
use crate::ports::{
    AggregateRecomputer, BlacklistHandler, CitationStore, ContributionStore, IdentityProvider,
    NotificationSender, PathInvalidator, ProfileStore, ReviewItem, SignalStore, SummonsStore,
};
use crate::request::{ContributionDraft, GuestContributionDraft};
use crate::response::{ContributorStanding, ReviewDecision, SubmissionReceipt};

/// Everything the pipeline calls out to.
#[derive(Clone)]
pub struct PipelineDeps {
    pub contributions: Arc<dyn ContributionStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub summons: Arc<dyn SummonsStore>,
    pub signals: Arc<dyn SignalStore>,
    pub citations: Arc<dyn CitationStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub blacklist: Arc<dyn BlacklistHandler>,
    pub classifier: Arc<dyn SafetyClassifier>,
    pub summarizer: Arc<dyn InsightSummarizer>,
    pub notifier: Arc<dyn NotificationSender>,
    pub aggregates: Arc<dyn AggregateRecomputer>,
    pub paths: Arc<dyn PathInvalidator>,
}

impl PipelineDeps {
    /// All storage on one [`InMemoryStore`], log-only collaborators, and the
    /// keyword list from `config`.
    pub fn in_memory(
        store: Arc<InMemoryStore>,
        classifier: Arc<dyn SafetyClassifier>,
        summarizer: Arc<dyn InsightSummarizer>,
        config: &PipelineConfig,
    ) -> Self {
        let keywords = trust_core::KeywordList::new(config.blacklist.keywords.iter());
        Self {
            contributions: store.clone(),
            profiles: store.clone(),
            summons: store.clone(),
            signals: store.clone(),
            citations: store.clone(),
            identity: store,
            blacklist: Arc::new(KeywordBlacklistHandler::new(keywords)),
            classifier,
            summarizer,
            notifier: Arc::new(LoggingNotifier),
            aggregates: Arc::new(LoggingAggregateRecomputer),
            paths: Arc::new(LoggingPathInvalidator),
        }
    }
}

/// Validates, gates, stores and fans out community contributions.
pub struct ContributionPipeline {
    config: PipelineConfig,
    roles: RoleClassifier,
    chakra: ChakraTable,
    deps: PipelineDeps,
    effects: EffectOrchestrator,
}

impl ContributionPipeline {
    pub fn new(config: PipelineConfig, deps: PipelineDeps) -> Self {
        let roles = config.reputation.roles();
        if config.fanout_settings().fanout_timeout_ms < config.notifications.fanout_timeout_ms {
            warn!(
                fanout_timeout_ms = config.notifications.fanout_timeout_ms,
                effect_timeout_ms = config.effects.effect_timeout_ms,
                "Fan-out timeout exceeds the effect timeout, clamping"
            );
        }
        let effects = Self::standard_effects(&config, &roles, &deps);
        Self {
            config,
            roles,
            chakra: ChakraTable::standard(),
            deps,
            effects,
        }
    }

    /// Replace the tier table used by [`standing`](Self::standing).
    pub fn with_chakra_table(mut self, chakra: ChakraTable) -> Self {
        self.chakra = chakra;
        self
    }

    /// Insight, reputation, citation, fan-out, aggregate; in that order.
    fn standard_effects(
        config: &PipelineConfig,
        roles: &RoleClassifier,
        deps: &PipelineDeps,
    ) -> EffectOrchestrator {
        EffectOrchestrator::new(config.effects.effect_timeout())
            .with_effect(Arc::new(InsightEffect::new(
                Arc::clone(&deps.summarizer),
                Arc::clone(&deps.contributions),
                Arc::clone(&deps.profiles),
                roles.clone(),
                config.effects.insight_min_chars,
            )))
            .with_effect(Arc::new(ReputationEffect::new(
                Arc::clone(&deps.summons),
                Arc::clone(&deps.profiles),
                config.reputation.base_award,
                config.reputation.summons_bonus,
            )))
            .with_effect(Arc::new(CitationEffect::new(
                Arc::clone(&deps.citations),
                Arc::clone(&deps.profiles),
                roles.clone(),
            )))
            .with_effect(Arc::new(NotificationFanout::new(
                Arc::clone(&deps.signals),
                Arc::clone(&deps.profiles),
                Arc::clone(&deps.notifier),
                roles.clone(),
                config.fanout_settings(),
            )))
            .with_effect(Arc::new(AggregateEffect::new(Arc::clone(&deps.aggregates))))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Submit a contribution as an authenticated member.
    pub async fn submit_authenticated(
        &self,
        caller: &CallerContext,
        draft: ContributionDraft,
    ) -> Result<SubmissionReceipt> {
        let identity_id = caller
            .resolved_identity()
            .ok_or(SubmissionError::InvalidIdentity)?
            .to_string();

        let target_entity_id = validate_target(&draft.target_entity_id)?;
        let validated = validate_content(
            RawContent {
                content: &draft.content,
                star_rating: draft.star_rating,
                guest_name: None,
            },
            CallerClass::Authenticated,
            &self.config.validation,
        )?;
        let post_kind = resolve_post_kind(draft.post_type, draft.pillar_of_truth.as_deref())?;

        gates::ensure_not_banned(self.deps.identity.as_ref(), &identity_id).await?;

        if draft.is_official_response {
            let profile = author_profile(self.deps.profiles.as_ref(), &identity_id).await?;
            gates::ensure_official_allowed(&self.roles, &profile, true)?;
        }

        let matches = gates::scan_blacklist(self.deps.blacklist.as_ref(), &validated.content).await;
        let (flag_count, is_flagged) = gates::flag_fields(&matches);

        let row = NewContribution {
            target_entity_id,
            authorship: Authorship::Member {
                author_id: identity_id,
            },
            content: validated.content,
            parent_id: draft.parent_id.clone(),
            post_kind,
            star_rating: validated.star_rating,
            is_official_response: draft.is_official_response,
            flag_count,
            is_flagged,
            status: ContributionStatus::Approved,
            source_metadata: draft.source_metadata(Utc::now()),
        };

        let stored = self.persist(row).await?;
        if !matches.is_empty() {
            self.queue_for_review(&stored, &matches).await;
        }

        Ok(self.finish(stored).await)
    }

    /// Submit a contribution as a named guest.
    pub async fn submit_guest(&self, draft: GuestContributionDraft) -> Result<SubmissionReceipt> {
        let GuestContributionDraft {
            guest_name,
            contribution: draft,
        } = draft;

        let target_entity_id = validate_target(&draft.target_entity_id)?;
        let validated = validate_content(
            RawContent {
                content: &draft.content,
                star_rating: draft.star_rating,
                guest_name: Some(&guest_name),
            },
            CallerClass::Guest,
            &self.config.validation,
        )?;
        let post_kind = resolve_post_kind(draft.post_type, draft.pillar_of_truth.as_deref())?;

        if draft.is_official_response {
            return Err(SubmissionError::access_denied(
                "guests cannot post official responses",
            ));
        }

        let verdict = match self.deps.classifier.classify(&validated.content).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(target_entity_id = %target_entity_id, error = %e, "Safety classifier failed, rejecting guest submission");
                return Err(SubmissionError::ModerationRejected {
                    reason: "safety review unavailable".to_string(),
                });
            }
        };
        let status = gates::moderation_status(&verdict).inspect_err(|_| {
            info!(target_entity_id = %target_entity_id, reason = %verdict.reason, "Guest submission rejected by moderation");
        })?;

        let row = NewContribution {
            target_entity_id,
            authorship: Authorship::Guest {
                guest_name: validated.guest_name.unwrap_or(guest_name),
            },
            content: validated.content,
            parent_id: draft.parent_id.clone(),
            post_kind,
            star_rating: validated.star_rating,
            is_official_response: false,
            flag_count: 0,
            is_flagged: false,
            status,
            source_metadata: draft.source_metadata(Utc::now()),
        };

        let stored = self.persist(row).await?;
        Ok(self.finish(stored).await)
    }

    /// Approve or reject a contribution held for review.
    pub async fn review_pending(
        &self,
        contribution_id: &str,
        decision: ReviewDecision,
    ) -> Result<Contribution> {
        let to = decision.target_status();
        let current = self
            .deps
            .contributions
            .get(contribution_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("contribution {}", contribution_id)))?;

        if current.status != ContributionStatus::PendingReview {
            return Err(SubmissionError::InvalidTransition {
                from: current.status,
                to,
            });
        }

        let updated = self
            .deps
            .contributions
            .transition_status(contribution_id, ContributionStatus::PendingReview, to)
            .await?;

        let Some(updated) = updated else {
            // Another reviewer got there first
            let from = self
                .deps
                .contributions
                .get(contribution_id)
                .await?
                .map(|c| c.status)
                .unwrap_or(current.status);
            return Err(SubmissionError::InvalidTransition { from, to });
        };

        info!(contribution_id = %contribution_id, status = %updated.status, "Review decision applied");
        if updated.status.is_public() {
            if updated.star_rating.is_some() {
                self.recompute_aggregate(&updated.target_entity_id).await;
            }
            self.invalidate(&updated.target_entity_id).await;
        }
        Ok(updated)
    }

    /// Record a community flag from an authenticated member.
    pub async fn flag_contribution(
        &self,
        caller: &CallerContext,
        contribution_id: &str,
    ) -> Result<Contribution> {
        let identity_id = caller
            .resolved_identity()
            .ok_or(SubmissionError::InvalidIdentity)?;
        gates::ensure_not_banned(self.deps.identity.as_ref(), identity_id).await?;

        let flagged = self.deps.contributions.record_flag(contribution_id).await?;
        info!(
            contribution_id = %contribution_id,
            flagged_by = %identity_id,
            flag_count = flagged.flag_count,
            "Contribution flagged"
        );
        Ok(flagged)
    }

    /// Approved contributions for a target, oldest first.
    pub async fn visible_contributions(&self, target_entity_id: &str) -> Result<Vec<Contribution>> {
        Ok(self
            .deps
            .contributions
            .list_for_target(target_entity_id)
            .await?
            .into_iter()
            .filter(|c| c.status.is_public())
            .collect())
    }

    /// Score, roles and tier for an identity, computed from the current profile.
    pub async fn standing(&self, identity_id: &str) -> Result<ContributorStanding> {
        let profile = author_profile(self.deps.profiles.as_ref(), identity_id).await?;
        Ok(ContributorStanding {
            identity_id: profile.id.clone(),
            contributor_score: profile.contributor_score,
            is_expert: self.roles.is_expert(&profile),
            is_official_responder: self.roles.is_official_responder(&profile),
            badge_type: profile.badge_type.clone(),
            tier: self.chakra.progress(profile.contributor_score),
        })
    }

    async fn persist(&self, row: NewContribution) -> Result<Contribution> {
        match self.deps.contributions.insert(row).await {
            Ok(stored) => {
                debug!(contribution_id = %stored.id, status = %stored.status, "Contribution stored");
                Ok(stored)
            }
            Err(e) => {
                error!(error = %e, "Failed to store contribution");
                Err(SubmissionError::Persistence(e))
            }
        }
    }

    async fn queue_for_review(&self, stored: &Contribution, matches: &[BlacklistMatch]) {
        let item = ReviewItem {
            contribution_id: stored.id.clone(),
            kind: "contribution".to_string(),
            text: stored.content.clone(),
            target_entity_id: stored.target_entity_id.clone(),
            author_id: stored.author_id().map(str::to_string),
            matched_keywords: matches.iter().map(|m| m.keyword.clone()).collect(),
            queued_at: Utc::now(),
        };
        if let Err(e) = self.deps.blacklist.queue_for_review(item).await {
            warn!(contribution_id = %stored.id, error = %e, "Failed to queue flagged contribution for review");
        }
    }

    /// A rating held for review only counts once it is public.
    async fn recompute_aggregate(&self, target_entity_id: &str) {
        if let Err(e) = self.deps.aggregates.recompute_aggregate(target_entity_id).await {
            warn!(target_entity_id = %target_entity_id, error = %e, "Aggregate recompute after approval failed");
        }
    }

    async fn invalidate(&self, target_entity_id: &str) {
        if let Err(e) = self.deps.paths.invalidate(target_entity_id).await {
            warn!(target_entity_id = %target_entity_id, error = %e, "Path invalidation failed");
        }
    }

    /// Post-commit work shared by both entry points.
    async fn finish(&self, stored: Contribution) -> SubmissionReceipt {
        let effects = self.effects.run(&stored).await;
        self.invalidate(&stored.target_entity_id).await;

        info!(
            contribution_id = %stored.id,
            target_entity_id = %stored.target_entity_id,
            status = %stored.status,
            guest = stored.authorship.is_guest(),
            flagged = stored.is_flagged,
            "Contribution accepted"
        );

        SubmissionReceipt {
            contribution_id: stored.id,
            status: stored.status,
            effects,
        }
    }
}
