//! Chakra tiers: display banding of cumulative reputation.
//!
//! Tiers are recomputed from the score on every read and never stored.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Errors building a tier table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChakraError {
    #[error("Tier table is empty")]
    Empty,

    #[error("Lowest tier must start at 0, got {0}")]
    NonZeroFloor(u64),

    #[error("Tier thresholds must be strictly ascending at '{0}'")]
    NotAscending(String),
}

/// One named band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ChakraTier {
    pub threshold: u64,
    pub name: String,
}

impl ChakraTier {
    pub fn new(threshold: u64, name: impl Into<String>) -> Self {
        Self {
            threshold,
            name: name.into(),
        }
    }
}

/// Where a score sits inside its tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct TierProgress {
    pub current: ChakraTier,
    /// `None` at the top tier
    pub next: Option<ChakraTier>,
    /// Percentage toward `next`, in 0..=100
    pub percent: f64,
}

impl TierProgress {
    pub fn is_complete(&self) -> bool {
        self.next.is_none()
    }
}

/// Ascending threshold table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ChakraTier>", into = "Vec<ChakraTier>")]
pub struct ChakraTable {
    tiers: Vec<ChakraTier>,
}

impl ChakraTable {
    /// Build a table, checking it starts at 0 and ascends strictly.
    pub fn new(tiers: Vec<ChakraTier>) -> Result<Self, ChakraError> {
        let first = tiers.first().ok_or(ChakraError::Empty)?;
        if first.threshold != 0 {
            return Err(ChakraError::NonZeroFloor(first.threshold));
        }
        for pair in tiers.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(ChakraError::NotAscending(pair[1].name.clone()));
            }
        }
        Ok(Self { tiers })
    }

    /// The seven-chakra table used for contributor standing.
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                ChakraTier::new(0, "Root"),
                ChakraTier::new(25, "Sacral"),
                ChakraTier::new(75, "Solar Plexus"),
                ChakraTier::new(150, "Heart"),
                ChakraTier::new(300, "Throat"),
                ChakraTier::new(600, "Third Eye"),
                ChakraTier::new(1000, "Crown"),
            ],
        }
    }

    pub fn tiers(&self) -> &[ChakraTier] {
        &self.tiers
    }

    fn position(&self, score: u64) -> usize {
        // first threshold is 0, so at least one tier always qualifies
        self.tiers
            .iter()
            .rposition(|tier| tier.threshold <= score)
            .unwrap_or(0)
    }

    /// Highest tier whose threshold is at or below `score`.
    pub fn tier_for(&self, score: u64) -> &ChakraTier {
        &self.tiers[self.position(score)]
    }

    /// Tier plus progress toward the next one.
    pub fn progress(&self, score: u64) -> TierProgress {
        let index = self.position(score);
        let current = self.tiers[index].clone();

        match self.tiers.get(index + 1) {
            Some(next) => {
                let span = (next.threshold - current.threshold) as f64;
                let gained = score.saturating_sub(current.threshold) as f64;
                TierProgress {
                    current,
                    next: Some(next.clone()),
                    percent: (gained / span * 100.0).clamp(0.0, 100.0),
                }
            }
            None => TierProgress {
                current,
                next: None,
                percent: 100.0,
            },
        }
    }
}

impl TryFrom<Vec<ChakraTier>> for ChakraTable {
    type Error = ChakraError;

    fn try_from(tiers: Vec<ChakraTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<ChakraTable> for Vec<ChakraTier> {
    fn from(table: ChakraTable) -> Self {
        table.tiers
    }
}

impl Default for ChakraTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> ChakraTable {
        ChakraTable::new(vec![
            ChakraTier::new(0, "Seed"),
            ChakraTier::new(10, "Sprout"),
            ChakraTier::new(30, "Bloom"),
        ])
        .unwrap()
    }

    #[test]
    fn test_tier_lookup() {
        let table = small_table();
        assert_eq!(table.tier_for(0).name, "Seed");
        assert_eq!(table.tier_for(9).name, "Seed");
        assert_eq!(table.tier_for(10).name, "Sprout");
        assert_eq!(table.tier_for(29).name, "Sprout");
        assert_eq!(table.tier_for(5000).name, "Bloom");
    }

    #[test]
    fn test_progress_between_tiers() {
        let table = small_table();
        let progress = table.progress(20);
        assert_eq!(progress.current.name, "Sprout");
        assert_eq!(progress.next.as_ref().map(|t| t.name.as_str()), Some("Bloom"));
        assert!((progress.percent - 50.0).abs() < f64::EPSILON);

        assert_eq!(table.progress(10).percent, 0.0);
    }

    #[test]
    fn test_progress_at_top_tier() {
        let progress = small_table().progress(31);
        assert!(progress.is_complete());
        assert_eq!(progress.percent, 100.0);
        assert_eq!(progress.current.name, "Bloom");
    }

    #[test]
    fn test_table_validation() {
        assert_eq!(ChakraTable::new(vec![]), Err(ChakraError::Empty));
        assert_eq!(
            ChakraTable::new(vec![ChakraTier::new(5, "A")]),
            Err(ChakraError::NonZeroFloor(5))
        );
        assert_eq!(
            ChakraTable::new(vec![ChakraTier::new(0, "A"), ChakraTier::new(0, "B")]),
            Err(ChakraError::NotAscending("B".to_string()))
        );
    }

    #[test]
    fn test_standard_table_is_valid() {
        let standard = ChakraTable::standard();
        assert!(ChakraTable::new(standard.tiers().to_vec()).is_ok());
        assert_eq!(standard.tier_for(100).name, "Solar Plexus");
    }
}
