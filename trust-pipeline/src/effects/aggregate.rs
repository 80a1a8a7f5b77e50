use async_trait::async_trait;
use std::sync::Arc;

use trust_core::Contribution;

use super::{EffectOutcome, SideEffect};
use crate::error::SideEffectError;
use crate::ports::AggregateRecomputer;

/// Asks the collaborator to recompute the target's rating after a rated contribution.
///
/// Runs for guests too: their ratings count toward the aggregate.
pub struct AggregateEffect {
    recomputer: Arc<dyn AggregateRecomputer>,
}

impl AggregateEffect {
    pub fn new(recomputer: Arc<dyn AggregateRecomputer>) -> Self {
        Self { recomputer }
    }
}

#[async_trait]
impl SideEffect for AggregateEffect {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    async fn apply(&self, contribution: &Contribution) -> Result<EffectOutcome, SideEffectError> {
        if contribution.star_rating.is_none() {
            return Ok(EffectOutcome::skipped("no rating"));
        }
        self.recomputer
            .recompute_aggregate(&contribution.target_entity_id)
            .await?;
        Ok(EffectOutcome::applied("aggregate recomputed"))
    }
}
