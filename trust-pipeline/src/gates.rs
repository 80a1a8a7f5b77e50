//! Pre-persistence gates.
//!
//! Each gate either lets the submission through or aborts it before any row
//! is written. The blacklist scan is the exception: it never aborts, it only
//! decides the flag fields baked into the row.

use tracing::{debug, warn};

use trust_agent::{Confidence, SafetyVerdict};
use trust_core::{BlacklistMatch, ContributionStatus, ContributorProfile, RoleClassifier};

use crate::error::{Result, SubmissionError};
use crate::ports::{BlacklistHandler, IdentityProvider};

/// Reason returned to banned callers.
pub const BANNED_REASON: &str = "Laboratory access restricted";

/// Reject banned identities. A failed lookup is treated as a refusal.
pub async fn ensure_not_banned(identity: &dyn IdentityProvider, identity_id: &str) -> Result<()> {
    match identity.is_banned(identity_id).await {
        Ok(false) => Ok(()),
        Ok(true) => {
            warn!(identity_id = %identity_id, "Banned identity attempted to contribute");
            Err(SubmissionError::access_denied(BANNED_REASON))
        }
        Err(e) => {
            warn!(identity_id = %identity_id, error = %e, "Ban lookup failed, refusing");
            Err(SubmissionError::access_denied("identity check unavailable"))
        }
    }
}

/// Only verified experts and badge holders may mark a post official.
pub fn ensure_official_allowed(
    roles: &RoleClassifier,
    profile: &ContributorProfile,
    requested: bool,
) -> Result<()> {
    if requested && !roles.is_official_responder(profile) {
        return Err(SubmissionError::access_denied(format!(
            "official responses require a verified expert or the {} badge",
            roles.official_badge
        )));
    }
    Ok(())
}

/// Scan content; a failing scanner counts as no matches.
pub async fn scan_blacklist(handler: &dyn BlacklistHandler, content: &str) -> Vec<BlacklistMatch> {
    match handler.scan(content).await {
        Ok(matches) => {
            if !matches.is_empty() {
                debug!(matches = matches.len(), "Blacklist keywords matched");
            }
            matches
        }
        Err(e) => {
            warn!(error = %e, "Blacklist scan failed, continuing unflagged");
            Vec::new()
        }
    }
}

/// Flag fields for the stored row: one flag no matter how many keywords hit.
pub fn flag_fields(matches: &[BlacklistMatch]) -> (u32, bool) {
    if matches.is_empty() {
        (0, false)
    } else {
        (1, true)
    }
}

/// Map a guest safety verdict to the status the row is stored with.
pub fn moderation_status(verdict: &SafetyVerdict) -> Result<ContributionStatus> {
    if !verdict.is_safe {
        let reason = if verdict.reason.trim().is_empty() {
            "content failed safety review".to_string()
        } else {
            verdict.reason.clone()
        };
        return Err(SubmissionError::ModerationRejected { reason });
    }
    Ok(match verdict.confidence {
        Confidence::High => ContributionStatus::Approved,
        Confidence::Low => ContributionStatus::PendingReview,
    })
}
