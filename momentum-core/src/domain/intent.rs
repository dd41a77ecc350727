//! Order intents: what the engine asks the executor to do.

use super::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which rebalance pass produced an intent. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentReason {
    /// Flatten a holding that dropped out of the candidate list or the universe.
    Liquidate,
    /// Sell the excess of a holding above its risk-sized target.
    Trim,
    /// Buy up to the risk-sized target of an existing holding.
    TopUp,
    /// Open a new position in a candidate.
    Enter,
}

impl fmt::Display for IntentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntentReason::Liquidate => "liquidate",
            IntentReason::Trim => "trim",
            IntentReason::TopUp => "top_up",
            IntentReason::Enter => "enter",
        };
        f.write_str(s)
    }
}

/// A signed quantity change for one instrument.
///
/// Positive quantity buys, negative sells. The executor owns fills; the engine
/// never reconciles intended against executed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: Symbol,
    pub quantity: f64,
    pub reason: IntentReason,
}

impl OrderIntent {
    pub fn new(symbol: impl Into<Symbol>, quantity: f64, reason: IntentReason) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            reason,
        }
    }

    /// Full liquidation of a held quantity (quantity = −held).
    pub fn liquidate(symbol: impl Into<Symbol>, held: f64) -> Self {
        Self::new(symbol, -held, IntentReason::Liquidate)
    }

    pub fn is_buy(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_sell(&self) -> bool {
        self.quantity < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liquidation_negates_held() {
        let long = OrderIntent::liquidate("AAA", 25.0);
        assert_eq!(long.quantity, -25.0);
        assert!(long.is_sell());

        let short = OrderIntent::liquidate("BBB", -4.0);
        assert_eq!(short.quantity, 4.0);
        assert!(short.is_buy());
    }

    #[test]
    fn reason_serializes_snake_case() {
        let intent = OrderIntent::new("AAA", 3.0, IntentReason::TopUp);
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("\"top_up\""));
        assert_eq!(IntentReason::TopUp.to_string(), "top_up");
    }
}
