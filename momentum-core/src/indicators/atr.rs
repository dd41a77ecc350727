//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|); the first
//! bar has no previous close and contributes high-low.
//! ATR uses Wilder smoothing (alpha = 1/period), seeded with the mean of the
//! first `period` true ranges.
//! Ready after `period` bars, so a window of `period` bars fully warms it.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<f64>,
    samples: usize,
    seed_sum: f64,
    value: f64,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            prev_close: None,
            samples: 0,
            seed_sum: 0.0,
            value: 0.0,
            name: format!("atr_{period}"),
        }
    }
}

/// True Range of a single bar given the previous close.
pub fn true_range(bar: &Bar, prev_close: Option<f64>) -> f64 {
    let high_low = bar.high - bar.low;
    match prev_close {
        Some(pc) => high_low
            .max((bar.high - pc).abs())
            .max((bar.low - pc).abs()),
        None => high_low,
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn samples(&self) -> usize {
        self.samples
    }

    fn is_ready(&self) -> bool {
        self.samples >= self.period
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn update(&mut self, bar: &Bar) -> f64 {
        let tr = true_range(bar, self.prev_close);
        self.prev_close = Some(bar.close);
        self.samples += 1;

        if self.samples <= self.period {
            self.seed_sum += tr;
            self.value = self.seed_sum / self.samples as f64;
        } else {
            let n = self.period as f64;
            self.value = (self.value * (n - 1.0) + tr) / n;
        }
        self.value
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.samples = 0;
        self.seed_sum = 0.0;
        self.value = 0.0;
    }
}
