//! Rebalance engine: turns a ranked candidate list into order intents.
//!
//! Each cycle runs up to three passes, in order:
//! 1. **Liquidate** every holding that is no longer a candidate.
//! 2. **Resize** holdings that are still candidates to their ATR risk target,
//!    only on every other cycle (see [`RebalanceCycleState`]).
//! 3. **Enter** candidates not yet held, only when the regime is risk-on.
//!
//! Buys are checked against a projected cash balance that starts at the
//! snapshot's cash and shrinks by each emitted buy's cost plus the fee buffer.
//! Sell proceeds are not credited until the next snapshot reports them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::composite::RankedCandidate;
use crate::config::StrategyConfig;
use crate::domain::{IntentReason, OrderIntent, PortfolioSnapshot};

/// Alternating resize cadence. Starts with `resize_due = false`, so the first
/// cycle never resizes, the second does, and so on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceCycleState {
    resize_due: bool,
}

impl RebalanceCycleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resize_due(&self) -> bool {
        self.resize_due
    }

    /// Whether this cycle resizes; flips the flag for the next one.
    pub fn advance(&mut self) -> bool {
        let due = self.resize_due;
        self.resize_due = !due;
        due
    }
}

/// ATR risk sizer
///
/// # Formula
/// ```text
/// risk_budget = total_value * risk_fraction
/// quantity    = floor(risk_budget / ATR)
/// ```
///
/// # Example
/// - Portfolio: $100,000
/// - Risk fraction: 1.5% ($1,500)
/// - ATR: $2.50
/// - Quantity: floor($1,500 / $2.50) = 600 shares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtrRiskSizer {
    risk_fraction: f64,
}

impl AtrRiskSizer {
    pub fn new(risk_fraction: f64) -> Self {
        assert!(
            risk_fraction > 0.0 && risk_fraction <= 1.0,
            "risk_fraction must be in (0, 1]"
        );
        Self { risk_fraction }
    }

    pub fn risk_budget(&self, total_value: f64) -> f64 {
        total_value * self.risk_fraction
    }

    /// Whole-unit target quantity, or `None` when ATR or equity cannot size a
    /// position. Callers leave such holdings untouched.
    pub fn target_quantity(&self, total_value: f64, atr: f64) -> Option<f64> {
        if !(atr.is_finite() && atr > 0.0) || !(total_value.is_finite() && total_value > 0.0) {
            return None;
        }
        Some((self.risk_budget(total_value) / atr).floor())
    }
}

#[derive(Debug, Clone)]
pub struct RebalanceEngine {
    state: RebalanceCycleState,
    sizer: AtrRiskSizer,
    fee_rate: f64,
}

impl RebalanceEngine {
    pub fn new(risk_fraction: f64, fee_rate: f64) -> Self {
        assert!((0.0..1.0).contains(&fee_rate), "fee_rate must be in [0, 1)");
        Self {
            state: RebalanceCycleState::new(),
            sizer: AtrRiskSizer::new(risk_fraction),
            fee_rate,
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.risk_fraction, config.fee_rate)
    }

    pub fn state(&self) -> RebalanceCycleState {
        self.state
    }

    pub fn sizer(&self) -> &AtrRiskSizer {
        &self.sizer
    }

    /// Projected cost of buying `quantity` at `price`, including the fee buffer.
    fn buy_cost(&self, quantity: f64, price: f64) -> f64 {
        quantity * price * (1.0 + self.fee_rate)
    }

    /// Run one cycle against the selector's output and a fresh snapshot.
    pub fn run_cycle(
        &mut self,
        candidates: &[RankedCandidate],
        portfolio: &PortfolioSnapshot,
        risk_on: bool,
    ) -> Vec<OrderIntent> {
        let mut intents = Vec::new();
        let mut cash = portfolio.cash();
        let find = |symbol: &str| candidates.iter().find(|c| c.symbol == symbol);

        for (symbol, held) in portfolio.invested() {
            if find(symbol).is_none() {
                debug!(%symbol, held, "liquidate: dropped from candidates");
                intents.push(OrderIntent::liquidate(symbol.clone(), held));
            }
        }

        if self.state.advance() {
            for (symbol, held) in portfolio.invested() {
                let Some(candidate) = find(symbol) else {
                    continue;
                };
                let Some(target) = self
                    .sizer
                    .target_quantity(portfolio.total_value, candidate.atr)
                else {
                    debug!(%symbol, atr = candidate.atr, "resize skipped: cannot size");
                    continue;
                };
                if (held - target).abs() == 0.0 || held <= 1.0 {
                    continue;
                }
                if held > target {
                    debug!(%symbol, held, target, "trim to risk target");
                    intents.push(OrderIntent::new(
                        symbol.clone(),
                        -(held - target),
                        IntentReason::Trim,
                    ));
                } else if risk_on && valid_price(candidate.price) {
                    let diff = target - held;
                    let cost = self.buy_cost(diff, candidate.price);
                    if cash > cost {
                        debug!(%symbol, held, target, cost, "top up to risk target");
                        intents.push(OrderIntent::new(symbol.clone(), diff, IntentReason::TopUp));
                        cash -= cost;
                    } else {
                        debug!(%symbol, cost, cash, "top up skipped: insufficient cash");
                    }
                }
            }
        }

        if risk_on {
            for candidate in candidates {
                if portfolio.is_invested(&candidate.symbol) || !valid_price(candidate.price) {
                    continue;
                }
                let Some(target) = self
                    .sizer
                    .target_quantity(portfolio.total_value, candidate.atr)
                else {
                    continue;
                };
                if target <= 0.0 {
                    continue;
                }
                let cost = self.buy_cost(target, candidate.price);
                if cash - cost >= 0.0 {
                    debug!(symbol = %candidate.symbol, target, cost, "enter");
                    intents.push(OrderIntent::new(
                        candidate.symbol.clone(),
                        target,
                        IntentReason::Enter,
                    ));
                    cash -= cost;
                } else {
                    debug!(symbol = %candidate.symbol, cost, cash, "entry skipped: insufficient cash");
                }
            }
        }

        intents
    }
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}
