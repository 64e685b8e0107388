//! Side-by-side runs of several strategies over one price series.

use rayon::prelude::*;

use super::backtest::{BacktestConfig, BacktestEngine, BacktestResult};
use super::error::TradesimError;
use super::metrics::PerformanceMetrics;
use super::ohlcv::PriceSeries;
use super::strategy::Strategy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub result: BacktestResult,
    pub metrics: PerformanceMetrics,
}

/// Run every strategy with its own engine and portfolio.
///
/// The series is shared read-only across the parallel runs. Outcomes come
/// back in the same order as `strategies`; the first failing run fails the
/// whole comparison.
pub fn compare_strategies(
    strategies: Vec<Box<dyn Strategy>>,
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<Vec<StrategyOutcome>, TradesimError> {
    let engines = strategies
        .into_iter()
        .map(|s| BacktestEngine::new(s, config.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    engines
        .par_iter()
        .map(|engine| {
            let result = engine.run(series)?;
            let metrics = PerformanceMetrics::compute(&result);
            Ok(StrategyOutcome { result, metrics })
        })
        .collect()
}
