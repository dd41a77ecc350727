//! Per-instrument momentum composite.
//!
//! Bundles the four estimators the ranking needs (annualized slope, EMA, gap
//! risk, ATR) behind one update call and one readiness flag. Created when an
//! instrument joins the universe and dropped when it leaves.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::components::indicator::Indicator;
use crate::config::IndicatorWindows;
use crate::domain::{Bar, Symbol};
use crate::indicators::{AnnualizedSlope, Atr, Ema, GapRisk};

/// One instrument's ranking inputs for a single cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub symbol: Symbol,
    /// Annualized, R²-scaled slope in percent.
    pub slope: f64,
    pub price: f64,
    pub moving_average: f64,
    pub gap: f64,
    pub atr: f64,
}

#[derive(Debug, Clone)]
pub struct MomentumIndicator {
    symbol: Symbol,
    slope: AnnualizedSlope,
    moving_average: Ema,
    gap: GapRisk,
    atr: Atr,
    required_window: usize,
    last_close: Option<f64>,
    last_date: Option<NaiveDate>,
}

impl MomentumIndicator {
    pub fn new(symbol: impl Into<Symbol>, windows: &IndicatorWindows, periods_per_year: f64) -> Self {
        Self {
            symbol: symbol.into(),
            slope: AnnualizedSlope::with_periods_per_year(windows.slope, periods_per_year),
            moving_average: Ema::new(windows.moving_average),
            gap: GapRisk::new(windows.gap),
            atr: Atr::new(windows.atr),
            required_window: windows.required(),
            last_close: None,
            last_date: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Bars of history needed before every estimator is ready.
    pub fn required_window(&self) -> usize {
        self.required_window
    }

    pub fn is_ready(&self) -> bool {
        self.slope.is_ready()
            && self.moving_average.is_ready()
            && self.gap.is_ready()
            && self.atr.is_ready()
    }

    /// Push one bar through all four estimators.
    pub fn update(&mut self, bar: &Bar) {
        self.slope.update(bar);
        self.moving_average.update(bar);
        self.gap.update(bar);
        self.atr.update(bar);
        self.last_close = Some(bar.close);
        self.last_date = Some(bar.date);
    }

    /// Feed a block of history, oldest first.
    pub fn warm_up<'a>(&mut self, bars: impl IntoIterator<Item = &'a Bar>) {
        for bar in bars {
            self.update(bar);
        }
    }

    pub fn reset(&mut self) {
        self.slope.reset();
        self.moving_average.reset();
        self.gap.reset();
        self.atr.reset();
        self.last_close = None;
        self.last_date = None;
    }

    pub fn slope(&self) -> f64 {
        self.slope.value()
    }

    pub fn moving_average(&self) -> f64 {
        self.moving_average.value()
    }

    pub fn gap(&self) -> f64 {
        self.gap.value()
    }

    pub fn atr(&self) -> f64 {
        self.atr.value()
    }

    /// Close of the most recent bar.
    pub fn last_close(&self) -> Option<f64> {
        self.last_close
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }

    /// Snapshot for ranking, or `None` while not ready.
    pub fn candidate(&self, price: f64) -> Option<RankedCandidate> {
        if !self.is_ready() {
            return None;
        }
        Some(RankedCandidate {
            symbol: self.symbol.clone(),
            slope: self.slope(),
            price,
            moving_average: self.moving_average(),
            gap: self.gap(),
            atr: self.atr(),
        })
    }
}
