//! Review, flagging and read-side integration tests

mod common;

use common::*;
use trust_core::{CallerContext, ChakraTable, ChakraTier, ContributionStatus, ContributorProfile};
use trust_pipeline::{
    ContributionDraft, GuestContributionDraft, ReviewDecision, StoreError, SubmissionError,
};

async fn pending_guest_post(h: &Harness, content: &str) -> String {
    h.pipeline
        .submit_guest(GuestContributionDraft::new(
            "Ana",
            ContributionDraft::new("herb-1", content),
        ))
        .await
        .expect("Low-confidence guest post should be stored")
        .contribution_id
}

// =============================================================================
// Review
// =============================================================================

#[tokio::test]
async fn test_pending_post_can_be_approved_once() {
    let h = Harness::with_classifier(MockSafetyClassifier::safe_low());
    let id = pending_guest_post(&h, "Lovely tea, very calming").await;
    let invalidations_before = h.paths.invalidated.lock().await.len();

    let approved = h
        .pipeline
        .review_pending(&id, ReviewDecision::Approve)
        .await
        .unwrap();
    assert_eq!(approved.status, ContributionStatus::Approved);
    assert_eq!(h.paths.invalidated.lock().await.len(), invalidations_before + 1);

    let again = h.pipeline.review_pending(&id, ReviewDecision::Reject).await;
    assert_eq!(
        again,
        Err(SubmissionError::InvalidTransition {
            from: ContributionStatus::Approved,
            to: ContributionStatus::Rejected,
        })
    );
}

#[tokio::test]
async fn test_rejected_post_stays_hidden() {
    let h = Harness::with_classifier(MockSafetyClassifier::safe_low());
    let id = pending_guest_post(&h, "Lovely tea, very calming").await;

    let rejected = h
        .pipeline
        .review_pending(&id, ReviewDecision::Reject)
        .await
        .unwrap();
    assert_eq!(rejected.status, ContributionStatus::Rejected);
    assert!(h.pipeline.visible_contributions("herb-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_approving_rated_post_recomputes_aggregate() {
    let h = Harness::with_classifier(MockSafetyClassifier::safe_low());
    let rated = h
        .pipeline
        .submit_guest(GuestContributionDraft::new(
            "Ana",
            ContributionDraft::new("herb-1", "Lovely tea, very calming").with_rating(5),
        ))
        .await
        .expect("Low-confidence guest post should be stored")
        .contribution_id;
    let unrated = pending_guest_post(&h, "Bitter but it helped").await;
    assert_eq!(h.aggregates.targets.lock().await.len(), 1);

    h.pipeline
        .review_pending(&unrated, ReviewDecision::Approve)
        .await
        .unwrap();
    assert_eq!(h.aggregates.targets.lock().await.len(), 1);

    h.pipeline
        .review_pending(&rated, ReviewDecision::Approve)
        .await
        .unwrap();
    assert_eq!(
        *h.aggregates.targets.lock().await,
        vec!["herb-1".to_string(), "herb-1".to_string()]
    );
}

#[tokio::test]
async fn test_rejecting_rated_post_leaves_aggregate_alone() {
    let h = Harness::with_classifier(MockSafetyClassifier::safe_low());
    let receipt = h
        .pipeline
        .submit_guest(GuestContributionDraft::new(
            "Ana",
            ContributionDraft::new("herb-1", "Lovely tea, very calming").with_rating(1),
        ))
        .await
        .unwrap();

    h.pipeline
        .review_pending(&receipt.contribution_id, ReviewDecision::Reject)
        .await
        .unwrap();
    assert_eq!(h.aggregates.targets.lock().await.len(), 1);
}

#[tokio::test]
async fn test_review_of_unknown_post() {
    let h = Harness::new();
    let result = h.pipeline.review_pending("missing", ReviewDecision::Approve).await;
    assert!(matches!(
        result,
        Err(SubmissionError::Persistence(StoreError::NotFound(_)))
    ));
}

// =============================================================================
// Read path
// =============================================================================

#[tokio::test]
async fn test_visible_contributions_hide_pending_rows() {
    let h = Harness::with_classifier(MockSafetyClassifier::safe_low());
    let member = h.member(ContributorProfile::new("user-1"));

    let first = h
        .pipeline
        .submit_authenticated(&member, ContributionDraft::new("herb-1", "First!"))
        .await
        .unwrap();
    let pending = pending_guest_post(&h, "Lovely tea, very calming").await;
    let second = h
        .pipeline
        .submit_authenticated(&member, ContributionDraft::new("herb-1", "Second."))
        .await
        .unwrap();
    h.pipeline
        .submit_authenticated(&member, ContributionDraft::new("herb-2", "Elsewhere"))
        .await
        .unwrap();

    let visible: Vec<String> = h
        .pipeline
        .visible_contributions("herb-1")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(visible, vec![first.contribution_id.clone(), second.contribution_id.clone()]);

    h.pipeline
        .review_pending(&pending, ReviewDecision::Approve)
        .await
        .unwrap();
    let visible = h.pipeline.visible_contributions("herb-1").await.unwrap();
    assert_eq!(visible.len(), 3);
    assert_eq!(visible[1].id, pending);
}

// =============================================================================
// Flagging
// =============================================================================

#[tokio::test]
async fn test_members_can_flag() {
    let h = Harness::new();
    let author = h.member(ContributorProfile::new("author"));
    let reader = h.member(ContributorProfile::new("reader"));
    let other = h.member(ContributorProfile::new("other"));

    let receipt = h
        .pipeline
        .submit_authenticated(&author, ContributionDraft::new("herb-1", "Questionable dosing advice"))
        .await
        .unwrap();

    let once = h
        .pipeline
        .flag_contribution(&reader, &receipt.contribution_id)
        .await
        .unwrap();
    assert!(once.is_flagged);
    assert_eq!(once.flag_count, 1);

    let twice = h
        .pipeline
        .flag_contribution(&other, &receipt.contribution_id)
        .await
        .unwrap();
    assert_eq!(twice.flag_count, 2);
}

#[tokio::test]
async fn test_flagging_requires_an_unbanned_identity() {
    let h = Harness::new();
    let author = h.member(ContributorProfile::new("author"));
    let troll = h.member(ContributorProfile::new("troll").banned());

    let receipt = h
        .pipeline
        .submit_authenticated(&author, ContributionDraft::new("herb-1", "Perfectly fine"))
        .await
        .unwrap();

    let anonymous = h
        .pipeline
        .flag_contribution(&CallerContext::anonymous(), &receipt.contribution_id)
        .await;
    assert_eq!(anonymous, Err(SubmissionError::InvalidIdentity));

    let banned = h.pipeline.flag_contribution(&troll, &receipt.contribution_id).await;
    assert!(matches!(banned, Err(SubmissionError::AccessDenied { .. })));

    let missing = h.pipeline.flag_contribution(&author, "missing").await;
    assert!(matches!(
        missing,
        Err(SubmissionError::Persistence(StoreError::NotFound(_)))
    ));
}

// =============================================================================
// Standing
// =============================================================================

#[tokio::test]
async fn test_standing_tracks_score() {
    let h = Harness::new();
    let caller = h.member(ContributorProfile::new("user-1").with_score(95));

    let before = h.pipeline.standing("user-1").await.unwrap();
    assert!(!before.is_expert);
    assert_eq!(before.tier.current.name, "Solar Plexus");
    assert_eq!(before.tier.next.as_ref().map(|t| t.name.as_str()), Some("Heart"));

    h.pipeline
        .submit_authenticated(&caller, ContributionDraft::new("herb-1", "Crossing the line"))
        .await
        .unwrap();

    let after = h.pipeline.standing("user-1").await.unwrap();
    assert_eq!(after.contributor_score, 100);
    assert!(after.is_expert);
    assert!(!after.is_official_responder);
}

#[tokio::test]
async fn test_standing_for_unknown_identity_is_fresh() {
    let h = Harness::new();
    let standing = h.pipeline.standing("newcomer").await.unwrap();
    assert_eq!(standing.contributor_score, 0);
    assert_eq!(standing.tier.current.name, "Root");
    assert!(!standing.tier.is_complete());
}

#[tokio::test]
async fn test_custom_tier_table() {
    let table = ChakraTable::new(vec![ChakraTier::new(0, "Seed"), ChakraTier::new(10, "Sprout")])
        .expect("Ascending table should be valid");

    let h = Harness::new();
    h.member(ContributorProfile::new("user-1").with_score(12).with_badge("Trusted Voice"));
    let Harness { pipeline, .. } = h;
    let pipeline = pipeline.with_chakra_table(table);

    let standing = pipeline.standing("user-1").await.unwrap();
    assert_eq!(standing.tier.current.name, "Sprout");
    assert!(standing.tier.is_complete());
    assert_eq!(standing.tier.percent, 100.0);
    assert!(standing.is_official_responder);
    assert_eq!(standing.badge_type.as_deref(), Some("Trusted Voice"));
}
