//! Core types for community contributions.
//!
//! The invariants of a contribution row are carried by the types:
//! a row is authored either by a member or by a named guest (never both),
//! and a pillar of truth exists only on verified insights.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Badge that grants official-response rights without the verified flag.
pub const TRUSTED_VOICE_BADGE: &str = "Trusted Voice";

/// Score at which a contributor counts as an expert.
pub const EXPERT_SCORE_THRESHOLD: u64 = 100;

/// Who wrote a contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Authorship {
    /// An authenticated contributor
    Member {
        #[serde(rename = "authorId")]
        author_id: String,
    },
    /// An unauthenticated submitter identified only by a display name
    Guest {
        #[serde(rename = "guestName")]
        guest_name: String,
    },
}

impl Authorship {
    /// Author id, `None` for guests.
    pub fn author_id(&self) -> Option<&str> {
        match self {
            Authorship::Member { author_id } => Some(author_id),
            Authorship::Guest { .. } => None,
        }
    }

    /// Guest display name, `None` for members.
    pub fn guest_name(&self) -> Option<&str> {
        match self {
            Authorship::Member { .. } => None,
            Authorship::Guest { guest_name } => Some(guest_name),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Authorship::Guest { .. })
    }
}

/// Kind of post, with the pillar attached where it is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "postType", rename_all = "snake_case")]
pub enum PostKind {
    /// Evidence-backed insight anchored to a pillar of truth
    VerifiedInsight {
        #[serde(rename = "pillarOfTruth")]
        pillar_of_truth: String,
    },
    /// Personal experience report
    CommunityExperience,
}

impl PostKind {
    pub fn post_type(&self) -> PostType {
        match self {
            PostKind::VerifiedInsight { .. } => PostType::VerifiedInsight,
            PostKind::CommunityExperience => PostType::CommunityExperience,
        }
    }

    pub fn pillar_of_truth(&self) -> Option<&str> {
        match self {
            PostKind::VerifiedInsight { pillar_of_truth } => Some(pillar_of_truth),
            PostKind::CommunityExperience => None,
        }
    }
}

/// Discriminant of [`PostKind`] as submitted by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    VerifiedInsight,
    CommunityExperience,
}

impl Default for PostType {
    fn default() -> Self {
        Self::CommunityExperience
    }
}

/// Moderation status of a persisted contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    /// Publicly visible
    Approved,
    /// Persisted but hidden until a moderator decides
    PendingReview,
    /// Hidden permanently
    Rejected,
}

impl ContributionStatus {
    /// Whether public read paths may show the row.
    pub fn is_public(&self) -> bool {
        matches!(self, ContributionStatus::Approved)
    }
}

impl fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContributionStatus::Approved => write!(f, "approved"),
            ContributionStatus::PendingReview => write!(f, "pending_review"),
            ContributionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Source link attached at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub url: String,
    pub added_at: DateTime<Utc>,
}

/// A contribution with every pre-persistence field resolved, awaiting an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub target_entity_id: String,
    pub authorship: Authorship,
    pub content: String,
    pub parent_id: Option<String>,
    pub post_kind: PostKind,
    pub star_rating: Option<u8>,
    pub is_official_response: bool,
    pub flag_count: u32,
    pub is_flagged: bool,
    pub status: ContributionStatus,
    pub source_metadata: Option<SourceMetadata>,
}

impl NewContribution {
    /// Assign an id and creation time, producing the stored row.
    pub fn into_contribution(self, id: impl Into<String>, created_at: DateTime<Utc>) -> Contribution {
        Contribution {
            id: id.into(),
            target_entity_id: self.target_entity_id,
            authorship: self.authorship,
            content: self.content,
            parent_id: self.parent_id,
            post_kind: self.post_kind,
            star_rating: self.star_rating,
            is_official_response: self.is_official_response,
            flag_count: self.flag_count,
            is_flagged: self.is_flagged,
            status: self.status,
            insight_summary: None,
            source_metadata: self.source_metadata,
            created_at,
        }
    }
}

/// A persisted comment or review attached to a catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    /// Opaque id assigned by the store
    pub id: String,
    /// Catalog entity this contribution is attached to
    pub target_entity_id: String,
    #[serde(flatten)]
    pub authorship: Authorship,
    /// Trimmed content
    pub content: String,
    /// Contribution this one replies to
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub post_kind: PostKind,
    /// Rating in 1..=5
    pub star_rating: Option<u8>,
    pub is_official_response: bool,
    pub flag_count: u32,
    pub is_flagged: bool,
    pub status: ContributionStatus,
    /// Written after persistence by the insight effect
    pub insight_summary: Option<String>,
    pub source_metadata: Option<SourceMetadata>,
    pub created_at: DateTime<Utc>,
}

impl Contribution {
    pub fn author_id(&self) -> Option<&str> {
        self.authorship.author_id()
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Reputation-bearing profile of an authenticated contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ContributorProfile {
    pub id: String,
    pub contributor_score: u64,
    pub is_verified_expert: bool,
    pub badge_type: Option<String>,
    pub is_banned: bool,
}

impl ContributorProfile {
    /// A fresh profile with no score, badge or flags.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            contributor_score: 0,
            is_verified_expert: false,
            badge_type: None,
            is_banned: false,
        }
    }

    pub fn with_score(mut self, score: u64) -> Self {
        self.contributor_score = score;
        self
    }

    pub fn verified(mut self) -> Self {
        self.is_verified_expert = true;
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge_type = Some(badge.into());
        self
    }

    pub fn banned(mut self) -> Self {
        self.is_banned = true;
        self
    }
}

/// Open request for expert input on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SummonsRequest {
    pub id: String,
    pub target_entity_id: String,
    pub is_resolved: bool,
}

impl SummonsRequest {
    pub fn open(id: impl Into<String>, target_entity_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target_entity_id: target_entity_id.into(),
            is_resolved: false,
        }
    }
}

/// Kind of interest a user declared on a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    RaiseHand,
}

/// A user's declared interest in a contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SignalRecord {
    pub user_id: String,
    pub contribution_id: String,
    pub signal_type: SignalType,
}

impl SignalRecord {
    pub fn raise_hand(user_id: impl Into<String>, contribution_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            contribution_id: contribution_id.into(),
            signal_type: SignalType::RaiseHand,
        }
    }
}

/// Evidence link derived from an expert's source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CitationRecord {
    pub contribution_id: String,
    pub resource_title: String,
    pub resource_url: String,
}

/// Caller identity, passed explicitly into every entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerContext {
    pub identity_id: Option<String>,
}

impl CallerContext {
    pub fn authenticated(identity_id: impl Into<String>) -> Self {
        Self {
            identity_id: Some(identity_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The identity, if present and non-blank.
    pub fn resolved_identity(&self) -> Option<&str> {
        self.identity_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
