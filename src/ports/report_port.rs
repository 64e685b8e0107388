//! Report generation port trait.

use std::io::Write;

use crate::domain::backtest::BacktestResult;
use crate::domain::comparison::StrategyOutcome;
use crate::domain::error::TradesimError;
use crate::domain::metrics::PerformanceMetrics;

/// Port for rendering backtest results.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &PerformanceMetrics,
        out: &mut dyn Write,
    ) -> Result<(), TradesimError>;

    /// Default implementation: writes each outcome's full report in turn.
    fn write_comparison(
        &self,
        outcomes: &[StrategyOutcome],
        out: &mut dyn Write,
    ) -> Result<(), TradesimError> {
        for outcome in outcomes {
            self.write(&outcome.result, &outcome.metrics, out)?;
        }
        Ok(())
    }
}
