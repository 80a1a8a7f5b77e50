//! Default collaborator implementations.
//!
//! Keyword blacklist with an in-process review queue, plus log-only
//! notifier, aggregate recomputer and path invalidator for deployments that
//! have nothing better wired in.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use trust_core::{BlacklistMatch, KeywordList};

use crate::error::CollaboratorError;
use crate::ports::{
    AggregateRecomputer, BlacklistHandler, Notification, NotificationSender, PathInvalidator,
    ReviewItem,
};

/// Blacklist backed by a [`KeywordList`].
#[derive(Default)]
pub struct KeywordBlacklistHandler {
    keywords: KeywordList,
    queue: Mutex<Vec<ReviewItem>>,
}

impl KeywordBlacklistHandler {
    pub fn new(keywords: KeywordList) -> Self {
        Self {
            keywords,
            queue: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the review queue.
    pub async fn queued(&self) -> Vec<ReviewItem> {
        self.queue.lock().await.clone()
    }
}

#[async_trait]
impl BlacklistHandler for KeywordBlacklistHandler {
    async fn scan(&self, text: &str) -> Result<Vec<BlacklistMatch>, CollaboratorError> {
        Ok(self.keywords.scan(text))
    }

    async fn queue_for_review(&self, item: ReviewItem) -> Result<(), CollaboratorError> {
        info!(
            contribution_id = %item.contribution_id,
            keywords = ?item.matched_keywords,
            "Queued contribution for review"
        );
        self.queue.lock().await.push(item);
        Ok(())
    }
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone)]
pub struct LoggingNotifier;

#[async_trait]
impl NotificationSender for LoggingNotifier {
    async fn notify(
        &self,
        recipient_id: &str,
        notification: &Notification,
    ) -> Result<(), CollaboratorError> {
        info!(
            recipient = %recipient_id,
            kind = %notification.kind,
            link = %notification.link,
            "Notification: {}",
            notification.title
        );
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct LoggingAggregateRecomputer;

#[async_trait]
impl AggregateRecomputer for LoggingAggregateRecomputer {
    async fn recompute_aggregate(&self, target_entity_id: &str) -> Result<(), CollaboratorError> {
        debug!(target_entity_id = %target_entity_id, "Aggregate recompute requested");
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct LoggingPathInvalidator;

#[async_trait]
impl PathInvalidator for LoggingPathInvalidator {
    async fn invalidate(&self, target_entity_id: &str) -> Result<(), CollaboratorError> {
        debug!(target_entity_id = %target_entity_id, "Path invalidated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_keyword_handler_scans_and_queues() {
        let handler = KeywordBlacklistHandler::new(KeywordList::new(["scam"]));

        let matches = handler.scan("This is a SCAM.").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert!(handler.scan("Chamomile helps me sleep").await.unwrap().is_empty());

        handler
            .queue_for_review(ReviewItem {
                contribution_id: "c-1".to_string(),
                kind: "contribution".to_string(),
                text: "This is a SCAM.".to_string(),
                target_entity_id: "herb-1".to_string(),
                author_id: Some("user-1".to_string()),
                matched_keywords: vec!["scam".to_string()],
                queued_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(handler.queued().await.len(), 1);
    }
}
