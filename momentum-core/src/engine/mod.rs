//! Engine: the strategy facade a backtest or live host drives.
//!
//! Hosts call `on_universe_changed`, `on_bar` and `on_rebalance_cycle`, in that
//! order within a time step.

pub mod strategy;

pub use strategy::{CycleReport, HistoryProvider, MomentumStrategy};
