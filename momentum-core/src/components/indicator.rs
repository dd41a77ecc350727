//! Indicator trait for streaming, bar-at-a-time estimators.
//!
//! Every estimator owns its look-back state and is updated exactly once per
//! bar, in time order. Before an estimator is ready it reports a defined
//! neutral value instead of failing.

use crate::domain::Bar;

/// Trait for streaming indicators.
///
/// # Look-ahead contamination guard
/// `update` only sees the bar being pushed and the estimator's own history, so
/// no value can depend on a later bar.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_150", "aes_90").
    fn name(&self) -> &str;

    /// Configured window length.
    fn period(&self) -> usize;

    /// Number of bars pushed since construction or the last `reset`.
    fn samples(&self) -> usize;

    /// Whether enough bars have been seen for the value to be meaningful.
    fn is_ready(&self) -> bool;

    /// Current value. Neutral (0.0 or a partial average) until ready.
    fn value(&self) -> f64;

    /// Push one bar and return the new value.
    fn update(&mut self, bar: &Bar) -> f64;

    /// Discard all history.
    fn reset(&mut self);
}
