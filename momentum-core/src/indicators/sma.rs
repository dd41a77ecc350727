//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over the last `period` bars.
//! Ready after `period` bars; before that the value is the mean of what has been seen.

use super::window::RollingWindow;
use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: RollingWindow,
    sum: f64,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            window: RollingWindow::new(period),
            sum: 0.0,
            name: format!("sma_{period}"),
        }
    }

    /// Push a raw value instead of a bar.
    pub fn update_value(&mut self, value: f64) -> f64 {
        if let Some(evicted) = self.window.push(value) {
            self.sum -= evicted;
        }
        self.sum += value;
        self.value()
    }
}

impl Indicator for Sma {
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
        if self.window.is_empty() {
            0.0
        } else {
            self.sum / self.window.len() as f64
        }
    }

    fn update(&mut self, bar: &Bar) -> f64 {
        self.update_value(bar.close)
    }

    fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let mut sma = Sma::new(5);
        let result: Vec<f64> = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0])
            .iter()
            .map(|b| sma.update(b))
            .collect();
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
        assert!(sma.is_ready());
    }

    #[test]
    fn partial_mean_before_ready() {
        let mut sma = Sma::new(4);
        sma.update_value(2.0);
        sma.update_value(4.0);
        assert!(!sma.is_ready());
        assert_approx(sma.value(), 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn running_sum_tracks_window_after_reset() {
        let mut sma = Sma::new(3);
        for v in [5.0, 7.0, 9.0, 11.0, 13.0] {
            sma.update_value(v);
        }
        assert_approx(sma.value(), 11.0, DEFAULT_EPSILON);
        sma.reset();
        sma.update_value(1.0);
        assert_approx(sma.value(), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(Sma::new(3).value(), 0.0);
    }
}
