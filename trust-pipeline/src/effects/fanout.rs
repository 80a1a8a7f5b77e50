//! Expert-reply notification fan-out.
//!
//! One task per recipient inside a [`JoinSet`], bounded by a semaphore.
//! The submission waits at most `fanout_timeout`; deliveries still in
//! flight at the deadline are detached and finish on their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use trust_core::{Contribution, RoleClassifier, SignalType};

use super::{author_profile, EffectOutcome, SideEffect};
use crate::config::NotificationConfig;
use crate::error::{CollaboratorError, SideEffectError};
use crate::ports::{Notification, NotificationSender, ProfileStore, SignalStore};

/// Delivery counts for one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanoutReport {
    pub recipients: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Still in flight when the deadline passed
    pub timed_out: usize,
}

impl FanoutReport {
    pub fn all_failed(&self) -> bool {
        self.recipients > 0 && self.failed == self.recipients
    }
}

/// Notifies raise-hand signalers on the parent when an official responder replies.
pub struct NotificationFanout {
    signals: Arc<dyn SignalStore>,
    profiles: Arc<dyn ProfileStore>,
    sender: Arc<dyn NotificationSender>,
    roles: RoleClassifier,
    config: NotificationConfig,
}

impl NotificationFanout {
    pub fn new(
        signals: Arc<dyn SignalStore>,
        profiles: Arc<dyn ProfileStore>,
        sender: Arc<dyn NotificationSender>,
        roles: RoleClassifier,
        config: NotificationConfig,
    ) -> Self {
        Self {
            signals,
            profiles,
            sender,
            roles,
            config,
        }
    }

    fn notification_for(&self, contribution: &Contribution) -> Notification {
        Notification {
            title: self.config.title.clone(),
            message: self.config.message.clone(),
            kind: self.config.kind.clone(),
            link: format!(
                "/entities/{}#contribution-{}",
                contribution.target_entity_id, contribution.id
            ),
        }
    }

    /// Deliver `notification` to every recipient concurrently.
    pub async fn dispatch(&self, recipients: Vec<String>, notification: Notification) -> FanoutReport {
        let mut report = FanoutReport {
            recipients: recipients.len(),
            ..Default::default()
        };
        if recipients.is_empty() {
            return report;
        }

        let permits = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let notification = Arc::new(notification);
        let mut tasks = JoinSet::new();

        for recipient in recipients {
            let permits = Arc::clone(&permits);
            let sender = Arc::clone(&self.sender);
            let notification = Arc::clone(&notification);
            tasks.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => sender.notify(&recipient, &notification).await,
                    Err(_) => Err(CollaboratorError::Unavailable("dispatch closed".to_string())),
                };
                (recipient, result)
            });
        }

        let deadline = tokio::time::sleep(self.config.fanout_timeout());
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok((recipient, Ok(())))) => {
                        debug!(recipient = %recipient, "Notification delivered");
                        report.delivered += 1;
                    }
                    Some(Ok((recipient, Err(e)))) => {
                        warn!(recipient = %recipient, error = %e, "Notification failed");
                        report.failed += 1;
                    }
                    Some(Err(join_error)) => {
                        warn!(error = %join_error, "Notification task aborted");
                        report.failed += 1;
                    }
                },
                _ = &mut deadline => {
                    report.timed_out = tasks.len();
                    warn!(
                        pending = report.timed_out,
                        timeout_ms = self.config.fanout_timeout_ms,
                        "Fan-out deadline reached, detaching pending deliveries"
                    );
                    tasks.detach_all();
                    break;
                }
            }
        }

        report
    }
}

#[async_trait]
impl SideEffect for NotificationFanout {
    fn name(&self) -> &'static str {
        "notification_fanout"
    }

    async fn apply(&self, contribution: &Contribution) -> Result<EffectOutcome, SideEffectError> {
        let Some(parent_id) = contribution.parent_id.as_deref() else {
            return Ok(EffectOutcome::skipped("not a reply"));
        };
        let Some(author_id) = contribution.author_id() else {
            return Ok(EffectOutcome::skipped("guest contribution"));
        };

        let profile = author_profile(self.profiles.as_ref(), author_id).await?;
        if !self.roles.is_official_responder(&profile) {
            return Ok(EffectOutcome::skipped("author is not an official responder"));
        }

        let recipients: Vec<String> = self
            .signals
            .signalers(parent_id, SignalType::RaiseHand)
            .await?
            .into_iter()
            .filter(|user| user != author_id)
            .collect();
        if recipients.is_empty() {
            return Ok(EffectOutcome::skipped("no raised hands"));
        }

        let report = self
            .dispatch(recipients, self.notification_for(contribution))
            .await;
        info!(
            contribution_id = %contribution.id,
            recipients = report.recipients,
            delivered = report.delivered,
            failed = report.failed,
            timed_out = report.timed_out,
            "Expert reply fan-out finished"
        );

        if report.all_failed() {
            return Err(SideEffectError::Delivery(format!(
                "all {} notifications failed",
                report.recipients
            )));
        }

        Ok(EffectOutcome::applied(format!(
            "{}/{} delivered",
            report.delivered, report.recipients
        )))
    }
}
