//! Insight summaries for expert contributions.

use async_trait::async_trait;
use std::sync::Arc;

use trust_agent::InsightSummarizer;
use trust_core::{Contribution, RoleClassifier};

use super::{author_profile, EffectOutcome, SideEffect};
use crate::error::SideEffectError;
use crate::ports::{ContributionStore, ProfileStore};

/// Attaches a generated summary to long contributions by experts.
pub struct InsightEffect {
    summarizer: Arc<dyn InsightSummarizer>,
    contributions: Arc<dyn ContributionStore>,
    profiles: Arc<dyn ProfileStore>,
    roles: RoleClassifier,
    min_chars: usize,
}

impl InsightEffect {
    pub fn new(
        summarizer: Arc<dyn InsightSummarizer>,
        contributions: Arc<dyn ContributionStore>,
        profiles: Arc<dyn ProfileStore>,
        roles: RoleClassifier,
        min_chars: usize,
    ) -> Self {
        Self {
            summarizer,
            contributions,
            profiles,
            roles,
            min_chars,
        }
    }
}

#[async_trait]
impl SideEffect for InsightEffect {
    fn name(&self) -> &'static str {
        "insight"
    }

    async fn apply(&self, contribution: &Contribution) -> Result<EffectOutcome, SideEffectError> {
        let Some(author_id) = contribution.author_id() else {
            return Ok(EffectOutcome::skipped("guest contribution"));
        };

        if contribution.content.chars().count() < self.min_chars {
            return Ok(EffectOutcome::skipped("content too short"));
        }

        let profile = author_profile(self.profiles.as_ref(), author_id).await?;
        if !self.roles.is_expert(&profile) {
            return Ok(EffectOutcome::skipped("author is not an expert"));
        }

        match self.summarizer.summarize(&contribution.content).await? {
            Some(summary) => {
                self.contributions
                    .set_insight_summary(&contribution.id, &summary)
                    .await?;
                Ok(EffectOutcome::applied("summary stored"))
            }
            None => Ok(EffectOutcome::skipped("empty summary")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use trust_agent::{LlmInsightSummarizer, MockBackend};
    use trust_core::{Authorship, ContributionStatus, ContributorProfile, NewContribution, PostKind};

    fn row(author: &str, content: &str) -> NewContribution {
        NewContribution {
            target_entity_id: "herb-1".to_string(),
            authorship: Authorship::Member {
                author_id: author.to_string(),
            },
            content: content.to_string(),
            parent_id: None,
            post_kind: PostKind::CommunityExperience,
            star_rating: None,
            is_official_response: false,
            flag_count: 0,
            is_flagged: false,
            status: ContributionStatus::Approved,
            source_metadata: None,
        }
    }

    fn effect(store: &Arc<InMemoryStore>, backend: Arc<MockBackend>) -> InsightEffect {
        InsightEffect::new(
            Arc::new(LlmInsightSummarizer::new(backend)),
            store.clone(),
            store.clone(),
            RoleClassifier::default(),
            50,
        )
    }

    #[tokio::test]
    async fn test_expert_long_content_gets_summary() {
        let store = Arc::new(InMemoryStore::new());
        store.put_profile(ContributorProfile::new("expert").with_score(150));
        let backend = Arc::new(MockBackend::new("mock").with_response("Ginger eases nausea."));

        let long = "Ginger root, taken as a tea before travel, reliably eases my motion sickness.";
        let stored = store.insert(row("expert", long)).await.unwrap();

        let outcome = effect(&store, backend).apply(&stored).await.unwrap();
        assert_eq!(outcome, EffectOutcome::applied("summary stored"));

        let reloaded = store.get(&stored.id).await.unwrap().unwrap();
        assert_eq!(reloaded.insight_summary.as_deref(), Some("Ginger eases nausea."));
    }

    #[tokio::test]
    async fn test_short_or_non_expert_is_skipped() {
        let store = Arc::new(InMemoryStore::new());
        store.put_profile(ContributorProfile::new("expert").verified());
        let backend = Arc::new(MockBackend::new("mock").with_response("summary"));

        let short = store.insert(row("expert", "Works for me.")).await.unwrap();
        let outcome = effect(&store, backend.clone()).apply(&short).await.unwrap();
        assert!(matches!(outcome, EffectOutcome::Skipped { .. }));

        let long = "A long enough account of how peppermint oil helped with tension headaches.";
        let novice = store.insert(row("novice", long)).await.unwrap();
        let outcome = effect(&store, backend.clone()).apply(&novice).await.unwrap();
        assert!(matches!(outcome, EffectOutcome::Skipped { .. }));

        assert_eq!(backend.call_count(), 0);
    }
}
