//! Market regime filter - gates new long exposure by the benchmark's trend.
//!
//! Risk-on when the benchmark trades strictly above its simple moving average.
//! The filter owns the SMA; the host feeds it benchmark bars.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::Sma;

/// Binary market regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    RiskOn,
    RiskOff,
}

impl Regime {
    pub fn is_risk_on(self) -> bool {
        self == Regime::RiskOn
    }
}

#[derive(Debug, Clone)]
pub struct RegimeFilter {
    average: Sma,
}

impl RegimeFilter {
    pub fn new(period: usize) -> Self {
        Self {
            average: Sma::new(period),
        }
    }

    /// Feed one benchmark bar.
    pub fn update(&mut self, bar: &Bar) {
        self.average.update(bar);
    }

    pub fn is_ready(&self) -> bool {
        self.average.is_ready()
    }

    /// Current moving-average value (partial mean while warming up).
    pub fn average(&self) -> f64 {
        self.average.value()
    }

    /// Regime for the given benchmark price. Risk-off until the average is ready.
    pub fn regime(&self, benchmark_price: f64) -> Regime {
        if self.is_ready() && benchmark_price > self.average.value() {
            Regime::RiskOn
        } else {
            Regime::RiskOff
        }
    }

    pub fn risk_on(&self, benchmark_price: f64) -> bool {
        self.regime(benchmark_price).is_risk_on()
    }

    pub fn reset(&mut self) {
        self.average.reset();
    }
}
