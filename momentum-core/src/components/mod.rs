//! Strategy components: the pieces a ranking-and-rebalance cycle is built from.
//!
//! - Indicator trait for streaming estimators
//! - Momentum composite: slope + EMA + gap + ATR per instrument
//! - Regime filter: benchmark above/below its average
//! - Ranking selector: top-N by slope, then trend and gap filters
//! - Rebalance engine: liquidate, resize on alternate cycles, enter

pub mod composite;
pub mod indicator;
pub mod ranking;
pub mod rebalance;
pub mod regime;

pub use composite::{MomentumIndicator, RankedCandidate};
pub use indicator::Indicator;
pub use ranking::RankingSelector;
pub use rebalance::{AtrRiskSizer, RebalanceCycleState, RebalanceEngine};
pub use regime::{Regime, RegimeFilter};
