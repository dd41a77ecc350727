//! Strategy host facade: owns the indicator registry, the regime filter and the
//! rebalance engine, and exposes the three entry points a host drives.
//!
//! # Ordering
//! Within one time step the host must apply universe changes, then deliver
//! every bar, then trigger the rebalance cycle. All calls are synchronous.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::components::composite::{MomentumIndicator, RankedCandidate};
use crate::components::ranking::RankingSelector;
use crate::components::rebalance::{RebalanceCycleState, RebalanceEngine};
use crate::components::regime::RegimeFilter;
use crate::config::{ConfigError, StrategyConfig};
use crate::domain::{Bar, OrderIntent, PortfolioSnapshot, Symbol};

/// Supplies warm-up history for instruments joining the universe.
///
/// Implementations return bars oldest first and should return at least
/// `min_bars` bars when that much history exists. Returning more is fine.
pub trait HistoryProvider {
    fn history(&self, symbol: &str, min_bars: usize) -> Vec<Bar>;
}

impl HistoryProvider for HashMap<Symbol, Vec<Bar>> {
    fn history(&self, symbol: &str, _min_bars: usize) -> Vec<Bar> {
        self.get(symbol).cloned().unwrap_or_default()
    }
}

/// Result of one rebalance cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub candidates: Vec<RankedCandidate>,
    pub risk_on: bool,
    pub resized: bool,
    pub intents: Vec<OrderIntent>,
}

#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    config: StrategyConfig,
    indicators: BTreeMap<Symbol, MomentumIndicator>,
    regime: RegimeFilter,
    selector: RankingSelector,
    rebalancer: RebalanceEngine,
}

impl MomentumStrategy {
    /// Build a strategy. Fails only on invalid configuration.
    pub fn new(config: StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            fingerprint = %config.fingerprint(),
            benchmark = %config.benchmark,
            candidate_count = config.candidate_count,
            "momentum strategy configured"
        );
        Ok(Self {
            regime: RegimeFilter::new(config.regime_window),
            selector: RankingSelector::from_config(&config),
            rebalancer: RebalanceEngine::from_config(&config),
            indicators: BTreeMap::new(),
            config,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn regime(&self) -> &RegimeFilter {
        &self.regime
    }

    pub fn cycle_state(&self) -> RebalanceCycleState {
        self.rebalancer.state()
    }

    pub fn indicator(&self, symbol: &str) -> Option<&MomentumIndicator> {
        self.indicators.get(symbol)
    }

    /// Tracked symbols, in ranking tie-break order.
    pub fn tracked(&self) -> impl Iterator<Item = &str> + '_ {
        self.indicators.keys().map(String::as_str)
    }

    /// Bars of history a newly added instrument needs.
    pub fn required_window(&self) -> usize {
        self.config.windows.required()
    }

    /// Deliver one bar. Benchmark bars feed the regime filter; bars for
    /// untracked symbols are dropped.
    pub fn on_bar(&mut self, symbol: &str, bar: &Bar) {
        if !bar.is_finite() {
            warn!(%symbol, date = %bar.date, "dropping non-finite bar");
            return;
        }
        if symbol == self.config.benchmark {
            self.regime.update(bar);
            return;
        }
        match self.indicators.get_mut(symbol) {
            Some(indicator) => indicator.update(bar),
            None => warn!(%symbol, "bar for untracked symbol dropped"),
        }
    }

    /// Apply universe membership changes.
    ///
    /// Added symbols get a fresh composite pre-warmed from `history`; removed
    /// symbols are discarded immediately and any open position is liquidated.
    pub fn on_universe_changed(
        &mut self,
        added: &[Symbol],
        removed: &[Symbol],
        history: &dyn HistoryProvider,
        portfolio: &PortfolioSnapshot,
    ) -> Vec<OrderIntent> {
        let required = self.required_window();
        for symbol in added {
            if *symbol == self.config.benchmark || self.indicators.contains_key(symbol) {
                continue;
            }
            let mut indicator = MomentumIndicator::new(
                symbol.clone(),
                &self.config.windows,
                self.config.periods_per_year,
            );
            let bars = history.history(symbol, required);
            if bars.len() < required {
                warn!(%symbol, got = bars.len(), required, "short warm-up history");
            }
            let dropped = bars.iter().filter(|b| !b.is_finite()).count();
            if dropped > 0 {
                warn!(%symbol, dropped, "dropping non-finite warm-up bars");
            }
            indicator.warm_up(bars.iter().filter(|b| b.is_finite()));
            debug!(%symbol, ready = indicator.is_ready(), "instrument added");
            self.indicators.insert(symbol.clone(), indicator);
        }

        let mut intents = Vec::new();
        for symbol in removed {
            if self.indicators.remove(symbol).is_some() {
                debug!(%symbol, "instrument removed");
            }
            let held = portfolio.quantity(symbol);
            if held != 0.0 {
                intents.push(OrderIntent::liquidate(symbol.clone(), held));
            }
        }

        info!(
            added = added.len(),
            removed = removed.len(),
            tracked = self.indicators.len(),
            liquidations = intents.len(),
            "universe changed"
        );
        intents
    }

    /// Rank the universe at current prices without touching cycle state.
    pub fn rank(&self) -> Vec<RankedCandidate> {
        let prices: HashMap<Symbol, f64> = self
            .indicators
            .iter()
            .filter_map(|(sym, ind)| ind.last_close().map(|p| (sym.clone(), p)))
            .collect();
        let eligible = RankingSelector::eligible(self.indicators.values(), &prices);
        self.selector.select(eligible)
    }

    /// Run one rebalance cycle and return the intents for the order sink.
    pub fn on_rebalance_cycle(
        &mut self,
        portfolio: &PortfolioSnapshot,
        benchmark_price: f64,
    ) -> Vec<OrderIntent> {
        self.run_cycle(portfolio, benchmark_price).intents
    }

    /// Like [`Self::on_rebalance_cycle`], also returning the candidates and regime.
    pub fn run_cycle(&mut self, portfolio: &PortfolioSnapshot, benchmark_price: f64) -> CycleReport {
        let candidates = self.rank();
        let risk_on = self.regime.risk_on(benchmark_price);
        let resized = self.rebalancer.state().resize_due();
        let intents = self.rebalancer.run_cycle(&candidates, portfolio, risk_on);

        info!(
            candidates = candidates.len(),
            risk_on,
            resized,
            intents = intents.len(),
            "rebalance cycle"
        );
        CycleReport {
            candidates,
            risk_on,
            resized,
            intents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorWindows;
    use crate::indicators::make_bars;

    fn small_config() -> StrategyConfig {
        StrategyConfig {
            windows: IndicatorWindows {
                slope: 5,
                moving_average: 5,
                gap: 5,
                atr: 5,
            },
            regime_window: 3,
            candidate_count: 5,
            ..StrategyConfig::default()
        }
    }

    fn history(entries: &[(&str, Vec<f64>)]) -> HashMap<Symbol, Vec<Bar>> {
        entries
            .iter()
            .map(|(s, closes)| (s.to_string(), make_bars(closes)))
            .collect()
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 50.0 * 1.003_f64.powi(i as i32)).collect()
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = StrategyConfig {
            risk_fraction: -0.1,
            ..StrategyConfig::default()
        };
        assert!(MomentumStrategy::new(config).is_err());
    }

    #[test]
    fn benchmark_is_never_tracked() {
        let mut strat = MomentumStrategy::new(small_config()).unwrap();
        let hist = history(&[("SPY", rising(8)), ("AAA", rising(8))]);
        strat.on_universe_changed(
            &["SPY".into(), "AAA".into()],
            &[],
            &hist,
            &PortfolioSnapshot::flat(1.0),
        );
        assert_eq!(strat.tracked().collect::<Vec<_>>(), vec!["AAA"]);
    }

    #[test]
    fn duplicate_add_keeps_existing_state() {
        let mut strat = MomentumStrategy::new(small_config()).unwrap();
        let hist = history(&[("AAA", rising(8))]);
        let flat = PortfolioSnapshot::flat(1.0);
        strat.on_universe_changed(&["AAA".into()], &[], &hist, &flat);
        let bar = make_bars(&[1.0])[0];
        strat.on_bar("AAA", &bar);
        strat.on_universe_changed(&["AAA".into()], &[], &hist, &flat);
        assert_eq!(strat.indicator("AAA").unwrap().last_close(), Some(1.0));
    }

    #[test]
    fn removal_liquidates_and_discards() {
        let mut strat = MomentumStrategy::new(small_config()).unwrap();
        let hist = history(&[("AAA", rising(8))]);
        let snap = PortfolioSnapshot::flat(1_000.0).with_position("AAA", 12.0);
        strat.on_universe_changed(&["AAA".into()], &[], &hist, &snap);
        let intents = strat.on_universe_changed(&[], &["AAA".into()], &hist, &snap);
        assert_eq!(intents, vec![OrderIntent::liquidate("AAA", 12.0)]);
        assert!(strat.indicator("AAA").is_none());
    }

    #[test]
    fn readded_symbol_starts_fresh() {
        let mut strat = MomentumStrategy::new(small_config()).unwrap();
        let hist = history(&[("AAA", rising(8))]);
        let empty: HashMap<Symbol, Vec<Bar>> = HashMap::new();
        let flat = PortfolioSnapshot::flat(1.0);
        strat.on_universe_changed(&["AAA".into()], &[], &hist, &flat);
        assert!(strat.indicator("AAA").unwrap().is_ready());
        strat.on_universe_changed(&[], &["AAA".into()], &hist, &flat);
        strat.on_universe_changed(&["AAA".into()], &[], &empty, &flat);
        assert!(!strat.indicator("AAA").unwrap().is_ready());
    }

    #[test]
    fn bars_route_to_regime_and_indicators() {
        let mut strat = MomentumStrategy::new(small_config()).unwrap();
        strat.on_universe_changed(
            &["AAA".into()],
            &[],
            &HashMap::<Symbol, Vec<Bar>>::new(),
            &PortfolioSnapshot::flat(1.0),
        );
        for bar in make_bars(&[10.0, 11.0, 12.0]) {
            strat.on_bar("SPY", &bar);
            strat.on_bar("AAA", &bar);
            strat.on_bar("ZZZ", &bar);
        }
        assert!(strat.regime().is_ready());
        assert_eq!(strat.indicator("AAA").unwrap().last_close(), Some(12.0));
        assert!(strat.indicator("ZZZ").is_none());
    }

    #[test]
    fn void_bars_are_dropped() {
        let mut strat = MomentumStrategy::new(small_config()).unwrap();
        let mut bar = make_bars(&[10.0])[0];
        bar.close = f64::NAN;
        strat.on_bar("SPY", &bar);
        assert!(!strat.regime().is_ready());
        assert_eq!(strat.regime().average(), 0.0);
    }

    #[test]
    fn infinite_fields_are_dropped_live_and_in_history() {
        let mut strat = MomentumStrategy::new(small_config()).unwrap();
        let mut bars = make_bars(&rising(8));
        bars[2].high = f64::INFINITY;
        bars[4].close = f64::INFINITY;
        let hist: HashMap<Symbol, Vec<Bar>> = [("AAA".to_string(), bars)].into();
        strat.on_universe_changed(&["AAA".into()], &[], &hist, &PortfolioSnapshot::flat(1.0));

        let mut live = make_bars(&[60.0])[0];
        live.low = f64::NEG_INFINITY;
        strat.on_bar("AAA", &live);

        let ind = strat.indicator("AAA").unwrap();
        assert!(ind.is_ready());
        assert!(ind.atr().is_finite());
        assert!(ind.moving_average().is_finite());
        assert_ne!(ind.last_close(), Some(60.0));
    }

    #[test]
    fn cycle_report_tracks_resize_alternation() {
        let mut strat = MomentumStrategy::new(small_config()).unwrap();
        let flat = PortfolioSnapshot::flat(10_000.0);
        let flags: Vec<bool> = (0..4).map(|_| strat.run_cycle(&flat, 100.0).resized).collect();
        assert_eq!(flags, vec![false, true, false, true]);
    }
}
