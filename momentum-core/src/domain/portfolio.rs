//! Portfolio snapshot: read-only view of holdings supplied once per cycle.

use super::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Holdings and valuation as reported by the external portfolio collaborator.
///
/// The engine never mutates a snapshot. It emits intents, the executor applies
/// them, and the next cycle receives a fresh snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Signed held quantity per symbol. Zero entries are treated as flat.
    pub positions: BTreeMap<Symbol, f64>,
    /// Cash plus market value of all holdings.
    pub total_value: f64,
    /// Market value of all holdings.
    pub holdings_value: f64,
}

impl PortfolioSnapshot {
    /// An all-cash portfolio.
    pub fn flat(cash: f64) -> Self {
        Self {
            positions: BTreeMap::new(),
            total_value: cash,
            holdings_value: 0.0,
        }
    }

    pub fn with_position(mut self, symbol: impl Into<Symbol>, quantity: f64) -> Self {
        self.positions.insert(symbol.into(), quantity);
        self
    }

    /// Available cash = total value − holdings value.
    pub fn cash(&self) -> f64 {
        self.total_value - self.holdings_value
    }

    /// Held quantity for a symbol (0.0 when flat or unknown).
    pub fn quantity(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }

    /// Whether a symbol has a non-zero position.
    pub fn is_invested(&self, symbol: &str) -> bool {
        self.quantity(symbol) != 0.0
    }

    /// Non-flat positions, in symbol order.
    pub fn invested(&self) -> impl Iterator<Item = (&Symbol, f64)> + '_ {
        self.positions
            .iter()
            .filter(|(_, qty)| **qty != 0.0)
            .map(|(sym, qty)| (sym, *qty))
    }
}
