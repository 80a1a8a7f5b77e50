use async_trait::async_trait;
use std::sync::Arc;

use trust_core::{citation_title, CitationRecord, Contribution, RoleClassifier};

use super::{author_profile, EffectOutcome, SideEffect};
use crate::error::SideEffectError;
use crate::ports::{CitationStore, ProfileStore};

/// Records a citation when an expert attaches a source link.
pub struct CitationEffect {
    citations: Arc<dyn CitationStore>,
    profiles: Arc<dyn ProfileStore>,
    roles: RoleClassifier,
}

impl CitationEffect {
    pub fn new(
        citations: Arc<dyn CitationStore>,
        profiles: Arc<dyn ProfileStore>,
        roles: RoleClassifier,
    ) -> Self {
        Self {
            citations,
            profiles,
            roles,
        }
    }
}

#[async_trait]
impl SideEffect for CitationEffect {
    fn name(&self) -> &'static str {
        "citation"
    }

    async fn apply(&self, contribution: &Contribution) -> Result<EffectOutcome, SideEffectError> {
        let Some(source) = &contribution.source_metadata else {
            return Ok(EffectOutcome::skipped("no source link"));
        };
        let Some(author_id) = contribution.author_id() else {
            return Ok(EffectOutcome::skipped("guest contribution"));
        };

        // Role is read again here; it may have changed since the submission gate.
        let profile = author_profile(self.profiles.as_ref(), author_id).await?;
        if !self.roles.is_expert(&profile) {
            return Ok(EffectOutcome::skipped("author is not an expert"));
        }

        let record = CitationRecord {
            contribution_id: contribution.id.clone(),
            resource_title: citation_title(&source.url),
            resource_url: source.url.clone(),
        };
        let title = record.resource_title.clone();
        self.citations.insert_citation(record).await?;

        Ok(EffectOutcome::applied(title))
    }
}
