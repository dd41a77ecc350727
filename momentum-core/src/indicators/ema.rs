//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: SMA of the first `period` closes. Until then the value is the running
//! mean of the closes seen so far.
//! Ready after `period` bars.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    samples: usize,
    seed_sum: f64,
    value: f64,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            samples: 0,
            seed_sum: 0.0,
            value: 0.0,
            name: format!("ema_{period}"),
        }
    }

    /// Push a raw value instead of a bar.
    pub fn update_value(&mut self, value: f64) -> f64 {
        self.samples += 1;
        if self.samples <= self.period {
            self.seed_sum += value;
            self.value = self.seed_sum / self.samples as f64;
        } else {
            self.value = self.alpha * value + (1.0 - self.alpha) * self.value;
        }
        self.value
    }
}

impl Indicator for Ema {
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
        self.update_value(bar.close)
    }

    fn reset(&mut self) {
        self.samples = 0;
        self.seed_sum = 0.0;
        self.value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn run(ema: &mut Ema, closes: &[f64]) -> Vec<f64> {
        make_bars(closes).iter().map(|b| ema.update(b)).collect()
    }

    #[test]
    fn ema_period_1_equals_close() {
        let mut ema = Ema::new(1);
        let result = run(&mut ema, &[100.0, 200.0, 300.0]);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 0.5, seed SMA(10,11,12) = 11
        // EMA[3] = 0.5*13 + 0.5*11 = 12, EMA[4] = 0.5*14 + 0.5*12 = 13
        let mut ema = Ema::new(3);
        let result = run(&mut ema, &[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn running_mean_before_ready() {
        let mut ema = Ema::new(5);
        let result = run(&mut ema, &[10.0, 20.0]);
        assert!(!ema.is_ready());
        assert_approx(result[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn reset_restarts_seed() {
        let mut ema = Ema::new(2);
        run(&mut ema, &[10.0, 20.0, 30.0]);
        ema.reset();
        let result = run(&mut ema, &[4.0, 6.0]);
        assert_approx(result[1], 5.0, DEFAULT_EPSILON);
    }
}
