//! Shared fakes and a wired-up pipeline for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use trust_agent::{AgentError, Confidence, InsightSummarizer, LlmError, SafetyClassifier, SafetyVerdict};
use trust_core::{
    CallerContext, Contribution, ContributionStatus, ContributorProfile, KeywordList,
    NewContribution,
};
use trust_pipeline::collaborators::KeywordBlacklistHandler;
use trust_pipeline::ports::{AggregateRecomputer, ContributionStore, Notification, NotificationSender, PathInvalidator};
use trust_pipeline::{
    CollaboratorError, ContributionPipeline, InMemoryStore, PipelineConfig, PipelineDeps, StoreError,
};

// =============================================================================
// Agents
// =============================================================================

/// Safety classifier returning a fixed verdict and counting calls.
pub struct MockSafetyClassifier {
    verdict: Option<SafetyVerdict>,
    calls: AtomicUsize,
}

impl MockSafetyClassifier {
    pub fn safe_high() -> Self {
        Self::returning(SafetyVerdict::safe(Confidence::High))
    }

    pub fn safe_low() -> Self {
        Self::returning(SafetyVerdict::safe(Confidence::Low))
    }

    pub fn unsafe_because(reason: &str) -> Self {
        Self::returning(SafetyVerdict::unsafe_because(reason))
    }

    pub fn failing() -> Self {
        Self {
            verdict: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn returning(verdict: SafetyVerdict) -> Self {
        Self {
            verdict: Some(verdict),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SafetyClassifier for MockSafetyClassifier {
    async fn classify(&self, _text: &str) -> Result<SafetyVerdict, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict
            .clone()
            .ok_or_else(|| AgentError::Backend(LlmError::Unavailable("classifier offline".into())))
    }
}

/// Summarizer with a canned answer.
pub struct StaticSummarizer {
    summary: Option<String>,
    fail: bool,
}

impl StaticSummarizer {
    pub fn returning(summary: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            summary: None,
            fail: true,
        }
    }
}

#[async_trait]
impl InsightSummarizer for StaticSummarizer {
    async fn summarize(&self, _text: &str) -> Result<Option<String>, AgentError> {
        if self.fail {
            return Err(AgentError::Backend(LlmError::RequestFailed("summarizer exploded".into())));
        }
        Ok(self.summary.clone())
    }
}

// =============================================================================
// Collaborators
// =============================================================================

/// Records every delivery attempt; fails for listed recipients (or everyone).
#[derive(Default)]
pub struct RecordingNotifier {
    pub attempts: Mutex<Vec<String>>,
    pub delivered: Mutex<Vec<(String, Notification)>>,
    failing: Vec<String>,
    fail_all: bool,
}

impl RecordingNotifier {
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            failing: recipients.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing_all() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    pub async fn delivered_to(&self) -> Vec<String> {
        let mut recipients: Vec<String> =
            self.delivered.lock().await.iter().map(|(r, _)| r.clone()).collect();
        recipients.sort();
        recipients
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn notify(
        &self,
        recipient_id: &str,
        notification: &Notification,
    ) -> Result<(), CollaboratorError> {
        self.attempts.lock().await.push(recipient_id.to_string());
        if self.fail_all || self.failing.iter().any(|r| r == recipient_id) {
            return Err(CollaboratorError::Unavailable(format!("inbox for {} offline", recipient_id)));
        }
        self.delivered
            .lock()
            .await
            .push((recipient_id.to_string(), notification.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAggregates {
    pub targets: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingAggregates {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl AggregateRecomputer for RecordingAggregates {
    async fn recompute_aggregate(&self, target_entity_id: &str) -> Result<(), CollaboratorError> {
        self.targets.lock().await.push(target_entity_id.to_string());
        if self.fail {
            return Err(CollaboratorError::Rejected("ratings view locked".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPaths {
    pub invalidated: Mutex<Vec<String>>,
}

#[async_trait]
impl PathInvalidator for RecordingPaths {
    async fn invalidate(&self, target_entity_id: &str) -> Result<(), CollaboratorError> {
        self.invalidated.lock().await.push(target_entity_id.to_string());
        Ok(())
    }
}

/// Contribution store whose writes always fail.
pub struct BrokenStore(pub StoreError);

#[async_trait]
impl ContributionStore for BrokenStore {
    async fn insert(&self, _row: NewContribution) -> Result<Contribution, StoreError> {
        Err(self.0.clone())
    }

    async fn get(&self, _id: &str) -> Result<Option<Contribution>, StoreError> {
        Ok(None)
    }

    async fn set_insight_summary(&self, _id: &str, _summary: &str) -> Result<(), StoreError> {
        Err(self.0.clone())
    }

    async fn transition_status(
        &self,
        _id: &str,
        _from: ContributionStatus,
        _to: ContributionStatus,
    ) -> Result<Option<Contribution>, StoreError> {
        Err(self.0.clone())
    }

    async fn record_flag(&self, _id: &str) -> Result<Contribution, StoreError> {
        Err(self.0.clone())
    }

    async fn list_for_target(&self, _target: &str) -> Result<Vec<Contribution>, StoreError> {
        Err(self.0.clone())
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub classifier: Arc<MockSafetyClassifier>,
    pub notifier: Arc<RecordingNotifier>,
    pub aggregates: Arc<RecordingAggregates>,
    pub paths: Arc<RecordingPaths>,
    pub blacklist: Arc<KeywordBlacklistHandler>,
    pub pipeline: ContributionPipeline,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_parts(
            MockSafetyClassifier::safe_high(),
            StaticSummarizer::returning("A concise expert insight."),
            RecordingNotifier::default(),
            RecordingAggregates::default(),
        )
    }

    pub fn with_classifier(classifier: MockSafetyClassifier) -> Self {
        Self::with_parts(
            classifier,
            StaticSummarizer::returning("A concise expert insight."),
            RecordingNotifier::default(),
            RecordingAggregates::default(),
        )
    }

    pub fn with_parts(
        classifier: MockSafetyClassifier,
        summarizer: StaticSummarizer,
        notifier: RecordingNotifier,
        aggregates: RecordingAggregates,
    ) -> Self {
        let config = PipelineConfig::default();
        let store = Arc::new(InMemoryStore::new());
        let classifier = Arc::new(classifier);
        let notifier = Arc::new(notifier);
        let aggregates = Arc::new(aggregates);
        let paths = Arc::new(RecordingPaths::default());
        let blacklist = Arc::new(KeywordBlacklistHandler::new(KeywordList::new(
            config.blacklist.keywords.iter(),
        )));

        let deps = PipelineDeps {
            blacklist: blacklist.clone(),
            notifier: notifier.clone(),
            aggregates: aggregates.clone(),
            paths: paths.clone(),
            ..PipelineDeps::in_memory(store.clone(), classifier.clone(), Arc::new(summarizer), &config)
        };

        Self {
            store,
            classifier,
            notifier,
            aggregates,
            paths,
            blacklist,
            pipeline: ContributionPipeline::new(config, deps),
        }
    }

    /// Seed a profile and return a caller context for it.
    pub fn member(&self, profile: ContributorProfile) -> CallerContext {
        let caller = CallerContext::authenticated(profile.id.clone());
        self.store.put_profile(profile);
        caller
    }

    pub async fn score(&self, identity_id: &str) -> u64 {
        use trust_pipeline::ports::ProfileStore;
        self.store
            .profile(identity_id)
            .await
            .expect("Profile read should succeed")
            .map(|p| p.contributor_score)
            .unwrap_or(0)
    }
}

/// Content long enough to trigger insight generation.
pub const LONG_CONTENT: &str =
    "Ashwagandha taken in the evening for six weeks noticeably lowered my cortisol readings.";
