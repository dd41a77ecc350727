//! Cross-sectional ranking.
//!
//! Rank first, filter second: the top `candidate_count` instruments by slope
//! are chosen before the slope/trend/gap filters run, so a filtered-out name
//! frees no slot for the next one down.

use std::collections::HashMap;

use crate::components::composite::{MomentumIndicator, RankedCandidate};
use crate::config::StrategyConfig;
use crate::domain::Symbol;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingSelector {
    pub candidate_count: usize,
    pub min_slope: f64,
    pub max_gap: f64,
}

impl RankingSelector {
    pub fn new(candidate_count: usize, min_slope: f64, max_gap: f64) -> Self {
        Self {
            candidate_count,
            min_slope,
            max_gap,
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.candidate_count, config.min_slope, config.max_gap)
    }

    /// Project ready indicators that have a known price into candidates,
    /// preserving iteration order.
    pub fn eligible<'a>(
        indicators: impl IntoIterator<Item = &'a MomentumIndicator>,
        prices: &HashMap<Symbol, f64>,
    ) -> Vec<RankedCandidate> {
        indicators
            .into_iter()
            .filter_map(|ind| {
                let price = prices.get(ind.symbol()).copied()?;
                ind.candidate(price)
            })
            .collect()
    }

    /// Whether a candidate passes the post-ranking filters.
    pub fn passes(&self, candidate: &RankedCandidate) -> bool {
        candidate.slope > self.min_slope
            && candidate.price > candidate.moving_average
            && candidate.gap < self.max_gap
    }

    /// Rank candidates by slope (highest first), keep the top N, then filter.
    ///
    /// The sort is stable: equal slopes keep their input order.
    pub fn select(&self, mut candidates: Vec<RankedCandidate>) -> Vec<RankedCandidate> {
        candidates.sort_by(|a, b| b.slope.total_cmp(&a.slope));
        candidates.truncate(self.candidate_count);
        candidates.retain(|c| self.passes(c));
        candidates
    }
}
