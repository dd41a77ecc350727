//! Annualized exponential slope.
//!
//! Fits `ln(close) = a + b·x` by ordinary least squares over the last `period`
//! closes, with `x = 1..=period` (bar index, not calendar time). The per-bar
//! log growth `b` is compounded over `periods_per_year` bars, expressed in
//! percent, and scaled by the fit's R²:
//!
//! ```text
//! annual = ((e^b)^periods_per_year − 1) · 100 · R²
//! ```
//!
//! Ready after `period` bars; the value stays 0 until `period + 1` bars have
//! been pushed. Flat (|b| < 1e-25), non-finite, or overflowing fits yield 0.

use super::window::RollingWindow;
use crate::components::indicator::Indicator;
use crate::domain::Bar;

/// Slopes smaller than this are flat.
pub const FLAT_SLOPE_EPSILON: f64 = 1e-25;

/// Trading days per year for US equities.
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;

/// Result of an OLS line fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
}

/// Fit `y = a + b·x` against `x = 1..=n`.
///
/// With fewer than two points, or when every `y` is identical, R² is NaN.
pub fn fit_line(ys: &[f64]) -> LineFit {
    let n = ys.len() as f64;
    let x_mean = (n + 1.0) / 2.0;
    let y_mean = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, &y) in ys.iter().enumerate() {
        let dx = (i + 1) as f64 - x_mean;
        sxx += dx * dx;
        sxy += dx * (y - y_mean);
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, &y) in ys.iter().enumerate() {
        let fitted = intercept + slope * (i + 1) as f64;
        ss_res += (y - fitted).powi(2);
        ss_tot += (y - y_mean).powi(2);
    }

    LineFit {
        intercept,
        slope,
        r_squared: 1.0 - ss_res / ss_tot,
    }
}

/// Annualize a log-price fit, in percent, shrunk by R².
///
/// Returns 0.0 for flat, non-finite, or overflowing results.
pub fn annualize(fit: &LineFit, periods_per_year: f64) -> f64 {
    if !fit.slope.is_finite() || fit.slope.abs() < FLAT_SLOPE_EPSILON {
        return 0.0;
    }
    let annual = (fit.slope.exp().powf(periods_per_year) - 1.0) * 100.0 * fit.r_squared;
    if annual.is_finite() {
        annual
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct AnnualizedSlope {
    period: usize,
    periods_per_year: f64,
    window: RollingWindow,
    value: f64,
    name: String,
}

impl AnnualizedSlope {
    pub fn new(period: usize) -> Self {
        Self::with_periods_per_year(period, DEFAULT_PERIODS_PER_YEAR)
    }

    pub fn with_periods_per_year(period: usize, periods_per_year: f64) -> Self {
        assert!(period >= 1, "slope period must be >= 1");
        assert!(
            periods_per_year.is_finite() && periods_per_year > 0.0,
            "periods_per_year must be > 0"
        );
        Self {
            period,
            periods_per_year,
            window: RollingWindow::new(period),
            value: 0.0,
            name: format!("aes_{period}"),
        }
    }

    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }

    /// Line fit over the current window's log closes, if the window is full.
    pub fn fit(&self) -> Option<LineFit> {
        if !self.window.is_full() {
            return None;
        }
        let logs: Vec<f64> = self.window.iter().map(f64::ln).collect();
        Some(fit_line(&logs))
    }

    fn compute(&self) -> f64 {
        if self.window.samples() <= self.period {
            return 0.0;
        }
        match self.fit() {
            Some(fit) => annualize(&fit, self.periods_per_year),
            None => 0.0,
        }
    }
}

impl Indicator for AnnualizedSlope {
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
        self.value = self.compute();
        self.value
    }

    fn reset(&mut self) {
        self.window.clear();
        self.value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    fn geometric(start: f64, growth: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start * (1.0 + growth).powi(i as i32)).collect()
    }

    fn run(ind: &mut AnnualizedSlope, closes: &[f64]) -> Vec<f64> {
        make_bars(closes).iter().map(|b| ind.update(b)).collect()
    }

    #[test]
    fn zero_until_window_saturated() {
        let mut slope = AnnualizedSlope::new(10);
        let values = run(&mut slope, &geometric(100.0, 0.01, 10));
        assert!(values.iter().all(|&v| v == 0.0));
        // Ready at `period` samples even though the value is still 0.
        assert!(slope.is_ready());

        let next = slope.update(&make_bars(&[100.0 * 1.01_f64.powi(10)])[0]);
        assert!(next > 0.0);
    }

    #[test]
    fn exponential_series_matches_closed_form() {
        let growth = 0.001;
        let mut slope = AnnualizedSlope::new(20);
        let values = run(&mut slope, &geometric(50.0, growth, 21));

        let fit = slope.fit().unwrap();
        assert_approx(fit.r_squared, 1.0, 1e-9);
        assert_approx(fit.slope, (1.0 + growth).ln(), 1e-12);

        let expected = ((1.0 + growth).powf(252.0) - 1.0) * 100.0;
        assert_approx(values[20], expected, 1e-6);
    }

    #[test]
    fn periods_per_year_is_configurable() {
        let growth = 0.002;
        let mut weekly = AnnualizedSlope::with_periods_per_year(12, 52.0);
        let values = run(&mut weekly, &geometric(10.0, growth, 13));
        let expected = ((1.0 + growth).powf(52.0) - 1.0) * 100.0;
        assert_approx(values[12], expected, 1e-6);
    }

    #[test]
    fn downtrend_is_negative() {
        let mut slope = AnnualizedSlope::new(15);
        let values = run(&mut slope, &geometric(100.0, -0.005, 16));
        assert!(values[15] < 0.0);
        assert!(values[15] > -100.0);
    }

    #[test]
    fn flat_series_is_zero() {
        let mut slope = AnnualizedSlope::new(5);
        let values = run(&mut slope, &[42.0; 8]);
        assert!(values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn noisy_fit_is_shrunk_by_r_squared() {
        let closes = [100.0, 104.0, 99.0, 106.0, 101.0, 108.0, 103.0, 110.0, 104.0];
        let mut slope = AnnualizedSlope::new(8);
        let values = run(&mut slope, &closes);
        let fit = slope.fit().unwrap();
        assert!(fit.r_squared < 1.0);
        let unscaled = (fit.slope.exp().powf(252.0) - 1.0) * 100.0;
        assert_approx(values[8], unscaled * fit.r_squared, 1e-9);
        assert!(values[8].abs() < unscaled.abs());
    }

    #[test]
    fn overflow_clamps_to_zero() {
        // 20x per bar compounds past f64::MAX over 252 bars.
        let closes = geometric(1.0, 19.0, 6);
        let mut slope = AnnualizedSlope::new(5);
        let values = run(&mut slope, &closes);
        assert_eq!(values[5], 0.0);
    }

    #[test]
    fn non_positive_price_is_degenerate() {
        let mut slope = AnnualizedSlope::new(3);
        let values = run(&mut slope, &[10.0, 11.0, 0.0, 12.0]);
        assert_eq!(values[3], 0.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut slope = AnnualizedSlope::new(4);
        run(&mut slope, &geometric(10.0, 0.01, 6));
        assert!(slope.value() != 0.0);
        slope.reset();
        assert_eq!(slope.value(), 0.0);
        assert_eq!(slope.samples(), 0);
        assert!(!slope.is_ready());
    }

    #[test]
    fn fit_line_recovers_exact_line() {
        let ys: Vec<f64> = (1..=6).map(|x| 2.0 + 0.5 * x as f64).collect();
        let fit = fit_line(&ys);
        assert_approx(fit.intercept, 2.0, 1e-12);
        assert_approx(fit.slope, 0.5, 1e-12);
        assert_approx(fit.r_squared, 1.0, 1e-12);
    }
}
