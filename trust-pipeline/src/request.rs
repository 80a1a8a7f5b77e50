//! Submission inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trust_core::{PostType, SourceMetadata};

/// Raw contribution fields as sent by a caller.
///
/// Nothing here is trusted: the pipeline trims, validates and derives the
/// stored row from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDraft {
    pub target_entity_id: String,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub post_type: PostType,
    #[serde(default)]
    pub pillar_of_truth: Option<String>,
    /// Kept wide so out-of-range values reach validation instead of failing decode
    #[serde(default)]
    pub star_rating: Option<i64>,
    #[serde(default)]
    pub is_official_response: bool,
    #[serde(default)]
    pub source_link: Option<String>,
}

impl ContributionDraft {
    pub fn new(target_entity_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target_entity_id: target_entity_id.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_rating(mut self, rating: i64) -> Self {
        self.star_rating = Some(rating);
        self
    }

    pub fn with_source(mut self, link: impl Into<String>) -> Self {
        self.source_link = Some(link.into());
        self
    }

    pub fn official(mut self) -> Self {
        self.is_official_response = true;
        self
    }

    pub fn verified_insight(mut self, pillar_of_truth: impl Into<String>) -> Self {
        self.post_type = PostType::VerifiedInsight;
        self.pillar_of_truth = Some(pillar_of_truth.into());
        self
    }

    /// Source metadata stamped at `now`; blank links count as absent.
    pub(crate) fn source_metadata(&self, now: DateTime<Utc>) -> Option<SourceMetadata> {
        self.source_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .map(|link| SourceMetadata {
                url: link.to_string(),
                added_at: now,
            })
    }
}

/// A submission from an unauthenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestContributionDraft {
    pub guest_name: String,
    #[serde(flatten)]
    pub contribution: ContributionDraft,
}

impl GuestContributionDraft {
    pub fn new(guest_name: impl Into<String>, contribution: ContributionDraft) -> Self {
        Self {
            guest_name: guest_name.into(),
            contribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_decodes_with_defaults() {
        let json = r#"{"targetEntityId":"herb-1","content":"Calming","starRating":9}"#;
        let draft: ContributionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.post_type, PostType::CommunityExperience);
        assert_eq!(draft.star_rating, Some(9));
        assert!(!draft.is_official_response);
    }

    #[test]
    fn test_guest_draft_is_flat() {
        let json = r#"{"guestName":"Ana","targetEntityId":"herb-1","content":"Lovely tea, very calming"}"#;
        let draft: GuestContributionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.guest_name, "Ana");
        assert_eq!(draft.contribution.target_entity_id, "herb-1");
    }

    #[test]
    fn test_blank_source_is_absent() {
        let now = Utc::now();
        assert!(ContributionDraft::new("t", "c").with_source("   ").source_metadata(now).is_none());
        let meta = ContributionDraft::new("t", "c")
            .with_source(" https://example.com ")
            .source_metadata(now)
            .unwrap();
        assert_eq!(meta.url, "https://example.com");
    }
}
