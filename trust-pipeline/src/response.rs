//! Submission results and read models.

use serde::{Deserialize, Serialize};

use trust_core::{ContributionStatus, TierProgress};

use crate::effects::EffectReport;
use crate::error::SubmissionError;

/// A persisted submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub contribution_id: String,
    pub status: ContributionStatus,
    /// Post-commit effect results; for logs and tests, not for callers
    #[serde(skip)]
    pub effects: Vec<EffectReport>,
}

impl SubmissionReceipt {
    pub fn effect(&self, name: &str) -> Option<&EffectReport> {
        self.effects.iter().find(|report| report.effect == name)
    }
}

/// Error body of a failed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Wire shape of a submission result: `{success, contributionId?, error?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContributionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl From<Result<SubmissionReceipt, SubmissionError>> for SubmissionResponse {
    fn from(result: Result<SubmissionReceipt, SubmissionError>) -> Self {
        match result {
            Ok(receipt) => Self {
                success: true,
                contribution_id: Some(receipt.contribution_id),
                status: Some(receipt.status),
                error: None,
            },
            Err(error) => Self {
                success: false,
                contribution_id: None,
                status: None,
                error: Some(ErrorBody {
                    code: error.code().to_string(),
                    message: error.to_string(),
                }),
            },
        }
    }
}

/// Moderator decision on a pending contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(self) -> ContributionStatus {
        match self {
            ReviewDecision::Approve => ContributionStatus::Approved,
            ReviewDecision::Reject => ContributionStatus::Rejected,
        }
    }
}

/// A contributor's reputation as of now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorStanding {
    pub identity_id: String,
    pub contributor_score: u64,
    pub is_expert: bool,
    pub is_official_responder: bool,
    pub badge_type: Option<String>,
    pub tier: TierProgress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_success_shape() {
        let receipt = SubmissionReceipt {
            contribution_id: "c-1".to_string(),
            status: ContributionStatus::Approved,
            effects: Vec::new(),
        };
        let json = serde_json::to_value(SubmissionResponse::from(Ok(receipt))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "contributionId": "c-1", "status": "approved"})
        );
    }

    #[test]
    fn test_failure_shape() {
        let response = SubmissionResponse::from(Err(SubmissionError::Persistence(
            StoreError::PermissionDenied("rls".to_string()),
        )));
        assert!(!response.success);
        assert!(response.contribution_id.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, "persistence_permission_denied");
    }
}
