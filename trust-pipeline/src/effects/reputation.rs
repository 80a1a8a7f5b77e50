//! Summons resolution and reputation awards.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use trust_core::Contribution;

use super::{EffectOutcome, SideEffect};
use crate::error::SideEffectError;
use crate::ports::{ProfileStore, SummonsStore};

/// Resolves an open summons for the target, or awards base points.
///
/// Resolution is conditional in the store, so of several concurrent
/// contributions only one earns the bonus for a given summons. A summons is
/// resolved before the bonus is awarded; if the award fails the summons id
/// is logged so the points can be granted by hand.
pub struct ReputationEffect {
    summons: Arc<dyn SummonsStore>,
    profiles: Arc<dyn ProfileStore>,
    base_award: u64,
    summons_bonus: u64,
}

impl ReputationEffect {
    pub fn new(
        summons: Arc<dyn SummonsStore>,
        profiles: Arc<dyn ProfileStore>,
        base_award: u64,
        summons_bonus: u64,
    ) -> Self {
        Self {
            summons,
            profiles,
            base_award,
            summons_bonus,
        }
    }

    /// Claim an open summons for `target`. Returns the resolved summons id.
    ///
    /// Each lost claim means a rival resolved that summons, so the open set
    /// only shrinks and the loop ends once it is empty.
    async fn claim_summons(&self, target: &str) -> Result<Option<String>, SideEffectError> {
        loop {
            let Some(open) = self.summons.open_summons_for(target).await? else {
                return Ok(None);
            };
            if self.summons.resolve_if_open(&open.id).await? {
                return Ok(Some(open.id));
            }
            debug!(summons_id = %open.id, "Summons resolved by another contribution");
        }
    }
}

#[async_trait]
impl SideEffect for ReputationEffect {
    fn name(&self) -> &'static str {
        "reputation"
    }

    async fn apply(&self, contribution: &Contribution) -> Result<EffectOutcome, SideEffectError> {
        let Some(author_id) = contribution.author_id() else {
            return Ok(EffectOutcome::skipped("guest contribution"));
        };

        match self.claim_summons(&contribution.target_entity_id).await? {
            Some(summons_id) => {
                info!(author_id = %author_id, summons_id = %summons_id, "Summons claimed");
                let score = self
                    .profiles
                    .award_points(author_id, self.summons_bonus)
                    .await
                    .inspect_err(|e| {
                        warn!(
                            author_id = %author_id,
                            summons_id = %summons_id,
                            points = self.summons_bonus,
                            error = %e,
                            "Summons resolved but bonus not awarded"
                        );
                    })?;
                debug!(
                    summons_id = %summons_id,
                    points = self.summons_bonus,
                    score,
                    "Summons bonus awarded"
                );
                Ok(EffectOutcome::applied(format!(
                    "resolved summons {} (+{})",
                    summons_id, self.summons_bonus
                )))
            }
            None => {
                let score = self.profiles.award_points(author_id, self.base_award).await?;
                debug!(author_id = %author_id, points = self.base_award, score, "Base points awarded");
                Ok(EffectOutcome::applied(format!("+{}", self.base_award)))
            }
        }
    }
}
