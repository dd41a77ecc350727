//! Strategy configuration: windows, thresholds, sizing and the regime benchmark.
//!
//! Loaded from TOML; every field has a default, so a partial file only
//! overrides what it names. `validate()` is the single place where bad
//! parameters are rejected, and `MomentumStrategy::new` calls it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::indicators::slope::DEFAULT_PERIODS_PER_YEAR;

/// Rejected configuration. The only error the engine surfaces to its host.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be >= 1 (got {value})")]
    NonPositiveWindow { field: &'static str, value: usize },

    #[error("candidate count must be >= 1")]
    ZeroCandidateCount,

    #[error("risk_fraction must be in (0, 1] (got {0})")]
    RiskFractionOutOfRange(f64),

    #[error("fee_rate must be in [0, 1) (got {0})")]
    FeeRateOutOfRange(f64),

    #[error("max_gap must be > 0 (got {0})")]
    NonPositiveMaxGap(f64),

    #[error("{field} must be finite (got {value})")]
    NonFiniteThreshold { field: &'static str, value: f64 },

    #[error("periods_per_year must be finite and > 0 (got {0})")]
    InvalidPeriodsPerYear(f64),

    #[error("benchmark symbol must not be empty")]
    EmptyBenchmark,

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Look-back windows of the four per-instrument estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorWindows {
    /// Bars in the log-price regression.
    pub slope: usize,
    /// EMA period used for the "price above average" filter.
    pub moving_average: usize,
    /// Bars scanned for the largest single-bar move.
    pub gap: usize,
    /// ATR period used for position sizing.
    pub atr: usize,
}

impl Default for IndicatorWindows {
    fn default() -> Self {
        Self {
            slope: 90,
            moving_average: 150,
            gap: 90,
            atr: 20,
        }
    }
}

impl IndicatorWindows {
    /// Longest window; the history needed to warm a new instrument.
    pub fn required(&self) -> usize {
        self.slope
            .max(self.moving_average)
            .max(self.gap)
            .max(self.atr)
    }
}

/// Complete strategy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub windows: IndicatorWindows,

    /// Bars per year used to annualize the regression slope (252 for daily bars).
    pub periods_per_year: f64,

    /// Top-N instruments by slope considered each cycle.
    pub candidate_count: usize,

    /// Candidates need an annualized slope strictly above this (percent).
    pub min_slope: f64,

    /// Candidates need a gap value strictly below this (fraction, 0.15 = 15%).
    pub max_gap: f64,

    /// Fraction of total portfolio value risked per position, divided by ATR.
    pub risk_fraction: f64,

    /// Fee buffer added to projected buy cost in cash checks.
    pub fee_rate: f64,

    /// Benchmark symbol driving the regime filter. Never ranked.
    pub benchmark: String,

    /// SMA period of the benchmark regime filter.
    pub regime_window: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            windows: IndicatorWindows::default(),
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            candidate_count: 20,
            min_slope: 0.0,
            max_gap: 0.15,
            risk_fraction: 0.015,
            fee_rate: 0.005,
            benchmark: "SPY".to_string(),
            regime_window: 200,
        }
    }
}

impl StrategyConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("windows.slope", self.windows.slope),
            ("windows.moving_average", self.windows.moving_average),
            ("windows.gap", self.windows.gap),
            ("windows.atr", self.windows.atr),
            ("regime_window", self.regime_window),
        ];
        for (field, value) in windows {
            if value == 0 {
                return Err(ConfigError::NonPositiveWindow { field, value });
            }
        }

        if self.candidate_count == 0 {
            return Err(ConfigError::ZeroCandidateCount);
        }
        if !self.min_slope.is_finite() {
            return Err(ConfigError::NonFiniteThreshold {
                field: "min_slope",
                value: self.min_slope,
            });
        }
        if !self.max_gap.is_finite() {
            return Err(ConfigError::NonFiniteThreshold {
                field: "max_gap",
                value: self.max_gap,
            });
        }
        if self.max_gap <= 0.0 {
            return Err(ConfigError::NonPositiveMaxGap(self.max_gap));
        }
        if !(self.risk_fraction > 0.0 && self.risk_fraction <= 1.0) {
            return Err(ConfigError::RiskFractionOutOfRange(self.risk_fraction));
        }
        if !(self.fee_rate >= 0.0 && self.fee_rate < 1.0) {
            return Err(ConfigError::FeeRateOutOfRange(self.fee_rate));
        }
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(ConfigError::InvalidPeriodsPerYear(self.periods_per_year));
        }
        if self.benchmark.trim().is_empty() {
            return Err(ConfigError::EmptyBenchmark);
        }
        Ok(())
    }

    /// BLAKE3 hash of the canonical JSON form. Identical configs share a fingerprint.
    pub fn fingerprint(&self) -> String {
        // Struct fields serialize in declaration order, so the JSON is canonical.
        match serde_json::to_string(self) {
            Ok(json) => blake3::hash(json.as_bytes()).to_hex().to_string(),
            Err(_) => String::new(),
        }
    }
}
