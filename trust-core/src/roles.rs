//! Derived contributor roles.
//!
//! Every gate that needs a role evaluates the author's profile at the moment
//! of the check through this classifier. Callers share the logic, never a
//! cached result.

use serde::{Deserialize, Serialize};

use crate::types::{ContributorProfile, EXPERT_SCORE_THRESHOLD, TRUSTED_VOICE_BADGE};

/// Thresholds that turn a profile into a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClassifier {
    /// Score at which a contributor counts as an expert
    pub expert_score_threshold: u64,
    /// Badge that grants official-response rights
    pub official_badge: String,
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self {
            expert_score_threshold: EXPERT_SCORE_THRESHOLD,
            official_badge: TRUSTED_VOICE_BADGE.to_string(),
        }
    }
}

impl RoleClassifier {
    /// Verified experts, or anyone whose score reached the threshold.
    pub fn is_expert(&self, profile: &ContributorProfile) -> bool {
        profile.is_verified_expert || profile.contributor_score >= self.expert_score_threshold
    }

    /// Narrower than [`is_expert`](Self::is_expert): score alone never qualifies.
    pub fn is_official_responder(&self, profile: &ContributorProfile) -> bool {
        profile.is_verified_expert || profile.badge_type.as_deref() == Some(self.official_badge.as_str())
    }
}
