//! Concrete streaming indicator implementations.
//!
//! All indicators implement the `Indicator` trait from `components::indicator`
//! and are updated one bar at a time. The momentum composite bundles
//! `AnnualizedSlope`, `Ema`, `GapRisk` and `Atr`; the regime filter wraps `Sma`.

pub mod atr;
pub mod ema;
pub mod gap;
pub mod slope;
pub mod sma;
pub mod window;

pub use atr::Atr;
pub use ema::Ema;
pub use gap::GapRisk;
pub use slope::{AnnualizedSlope, LineFit};
pub use sma::Sma;
pub use window::RollingWindow;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
