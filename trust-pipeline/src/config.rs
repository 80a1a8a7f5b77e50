//! Configuration for the contribution pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use trust_core::{RoleClassifier, ValidationLimits, EXPERT_SCORE_THRESHOLD, TRUSTED_VOICE_BADGE};

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Content and name bounds
    pub validation: ValidationLimits,
    /// Reputation awards and role thresholds
    pub reputation: ReputationConfig,
    /// Post-commit effect settings
    pub effects: EffectsConfig,
    /// Expert reply fan-out
    pub notifications: NotificationConfig,
    /// Auto-flag keywords
    pub blacklist: BlacklistConfig,
    /// General settings
    pub general: GeneralConfig,
}

impl PipelineConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Fan-out settings with the deadline held below the effect timeout.
    ///
    /// The fan-out must reach its own deadline and detach stragglers before
    /// the orchestrator aborts the effect, which would cancel them instead.
    pub fn fanout_settings(&self) -> NotificationConfig {
        let ceiling = self.effects.effect_timeout_ms.saturating_mul(9) / 10;
        let mut notifications = self.notifications.clone();
        notifications.fanout_timeout_ms = notifications.fanout_timeout_ms.min(ceiling);
        notifications
    }
}

/// Reputation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    /// Points for a contribution with no open summons
    pub base_award: u64,
    /// Points for resolving an open summons
    pub summons_bonus: u64,
    /// Score at which a contributor counts as an expert
    pub expert_score_threshold: u64,
    /// Badge that grants official-response rights
    pub official_badge: String,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            base_award: 5,
            summons_bonus: 20,
            expert_score_threshold: EXPERT_SCORE_THRESHOLD,
            official_badge: TRUSTED_VOICE_BADGE.to_string(),
        }
    }
}

impl ReputationConfig {
    pub fn roles(&self) -> RoleClassifier {
        RoleClassifier {
            expert_score_threshold: self.expert_score_threshold,
            official_badge: self.official_badge.clone(),
        }
    }
}

/// Post-commit effect configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Upper bound for a single effect (ms)
    pub effect_timeout_ms: u64,
    /// Minimum content length (chars) before an insight is generated
    pub insight_min_chars: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            effect_timeout_ms: 10_000,
            insight_min_chars: 50,
        }
    }
}

impl EffectsConfig {
    pub fn effect_timeout(&self) -> Duration {
        Duration::from_millis(self.effect_timeout_ms)
    }
}

/// Notification fan-out configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a submission waits on deliveries (ms); stragglers continue detached
    pub fanout_timeout_ms: u64,
    /// Maximum deliveries in flight
    pub max_concurrent: usize,
    pub title: String,
    pub message: String,
    pub kind: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            fanout_timeout_ms: 5_000,
            max_concurrent: 16,
            title: "Expert Reply".to_string(),
            message: "An expert replied to a discussion you raised your hand on.".to_string(),
            kind: "expert_reply".to_string(),
        }
    }
}

impl NotificationConfig {
    pub fn fanout_timeout(&self) -> Duration {
        Duration::from_millis(self.fanout_timeout_ms)
    }
}

/// Blacklist configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlacklistConfig {
    pub keywords: Vec<String>,
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            keywords: vec![
                "scam".to_string(),
                "miracle cure".to_string(),
                "buy now".to_string(),
                "guaranteed cure".to_string(),
            ],
        }
    }
}

/// General configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
