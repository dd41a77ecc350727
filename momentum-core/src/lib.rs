//! Momentum Core: cross-sectional momentum ranking and risk-weighted rebalancing.
//!
//! This crate contains:
//! - Domain types (bars, portfolio snapshots, order intents)
//! - Streaming indicators (annualized regression slope, gap risk, EMA, SMA, ATR)
//! - A per-instrument momentum composite with a single readiness flag
//! - Benchmark regime filter, ranking selector and rebalance engine
//! - The `MomentumStrategy` facade and its validated configuration

pub mod components;
pub mod config;
pub mod domain;
pub mod engine;
pub mod indicators;

pub use config::{ConfigError, IndicatorWindows, StrategyConfig};
pub use engine::{CycleReport, HistoryProvider, MomentumStrategy};
