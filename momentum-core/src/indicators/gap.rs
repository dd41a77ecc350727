//! Gap risk: the largest single-bar relative move within a trailing window.
//!
//! For closes `p[0..n]` (oldest first) the value is
//! `max |(p[i+1] − p[i]) / p[i]|`, with a zero denominator replaced by 1.
//! This measures any step, not only overnight gaps.
//!
//! Ready after `period` bars. With fewer than 3 closes in the window the value
//! is 0 regardless of readiness.

use super::window::RollingWindow;
use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct GapRisk {
    period: usize,
    window: RollingWindow,
    value: f64,
    name: String,
}

impl GapRisk {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "gap period must be >= 1");
        Self {
            period,
            window: RollingWindow::new(period),
            value: 0.0,
            name: format!("gap_{period}"),
        }
    }
}

/// Largest absolute step-to-step relative change of a price series.
pub fn max_relative_step(prices: &[f64]) -> f64 {
    prices
        .windows(2)
        .map(|pair| {
            let denom = if pair[0] == 0.0 { 1.0 } else { pair[0] };
            ((pair[1] - pair[0]) / denom).abs()
        })
        .fold(0.0, f64::max)
}

impl Indicator for GapRisk {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn samples(&self) -> usize {
        self.window.samples()
    }

    fn is_ready(&self) -> bool {
        self.window.samples() >= self.period
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn update(&mut self, bar: &Bar) -> f64 {
        self.window.push(bar.close);
        self.value = if self.window.len() < 3 {
            0.0
        } else {
            let prices: Vec<f64> = self.window.iter().collect();
            max_relative_step(&prices)
        };
        self.value
    }

    fn reset(&mut self) {
        self.window.clear();
        self.value = 0.0;
    }
}
