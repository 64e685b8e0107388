//! Plain-text report writer.
//!
//! All presentation rounding happens here; the domain hands over exact
//! decimals.

use rust_decimal::Decimal;
use std::io::Write;

use crate::domain::backtest::BacktestResult;
use crate::domain::comparison::StrategyOutcome;
use crate::domain::error::TradesimError;
use crate::domain::metrics::{pair_trades, PerformanceMetrics};
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReportAdapter {
    /// Include the per-trade and per-pair listings.
    pub show_trades: bool,
}

impl ConsoleReportAdapter {
    pub fn new(show_trades: bool) -> Self {
        Self { show_trades }
    }
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn pct(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

fn signed_money(value: Decimal) -> String {
    if value >= Decimal::ZERO {
        format!("+{}", money(value))
    } else {
        money(value)
    }
}

impl ReportPort for ConsoleReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &PerformanceMetrics,
        out: &mut dyn Write,
    ) -> Result<(), TradesimError> {
        writeln!(out, "=== {} ===", result.strategy_name)?;
        writeln!(
            out,
            "Period:           {} to {} ({} days)",
            result.start_date, result.end_date, metrics.trading_days
        )?;
        writeln!(out, "Initial Value:    {}", money(result.initial_value))?;
        writeln!(out, "Final Value:      {}", money(result.final_value))?;
        writeln!(out, "Total Profit:     {}", signed_money(metrics.total_profit))?;
        writeln!(out, "Total Return:     {}", pct(metrics.total_return))?;
        writeln!(out, "Max Drawdown:     -{}", pct(metrics.max_drawdown))?;
        writeln!(out, "Total Trades:     {}", metrics.total_trades)?;
        writeln!(
            out,
            "Round Trips:      {} ({} won, {} lost)",
            metrics.total_pairs, metrics.winning_trades, metrics.losing_trades
        )?;
        writeln!(out, "Win Rate:         {}", pct(metrics.win_rate))?;
        writeln!(out, "Average Win:      {}", money(metrics.average_win))?;
        writeln!(out, "Average Loss:     {}", money(metrics.average_loss))?;
        writeln!(out, "Largest Win:      {}", money(metrics.largest_win))?;
        writeln!(out, "Largest Loss:     {}", money(metrics.largest_loss))?;
        writeln!(out, "Profit Factor:    {}", metrics.profit_factor.round_dp(2))?;
        writeln!(out, "Commissions:      {}", money(metrics.total_commissions))?;

        if self.show_trades && !result.trades.is_empty() {
            writeln!(out, "\n--- Trades ---")?;
            for trade in &result.trades {
                writeln!(
                    out,
                    "  {}  {:<4}  {:>8} @ {:>10}  commission {}",
                    trade.date(),
                    trade.action().to_string(),
                    trade.share_count(),
                    money(trade.price_per_share()),
                    money(trade.commission()),
                )?;
            }

            let pairs = pair_trades(&result.trades);
            if !pairs.is_empty() {
                writeln!(out, "\n--- Round Trips ---")?;
                for pair in &pairs {
                    writeln!(
                        out,
                        "  {} -> {}  {} shares  {} -> {}  {}",
                        pair.buy_date,
                        pair.sell_date,
                        pair.share_count,
                        money(pair.buy_price),
                        money(pair.sell_price),
                        signed_money(pair.profit),
                    )?;
                }
            }
        }

        writeln!(out)?;
        Ok(())
    }

    fn write_comparison(
        &self,
        outcomes: &[StrategyOutcome],
        out: &mut dyn Write,
    ) -> Result<(), TradesimError> {
        writeln!(
            out,
            "{:<20} {:>14} {:>10} {:>10} {:>8} {:>8} {:>8}",
            "Strategy", "Final Value", "Return", "Drawdown", "Trades", "Win%", "PF"
        )?;
        writeln!(out, "{}", "-".repeat(84))?;

        for outcome in outcomes {
            let (r, m) = (&outcome.result, &outcome.metrics);
            writeln!(
                out,
                "{:<20} {:>14} {:>10} {:>10} {:>8} {:>8} {:>8}",
                r.strategy_name,
                money(r.final_value),
                pct(m.total_return),
                pct(m.max_drawdown),
                m.total_trades,
                pct(m.win_rate),
                m.profit_factor.round_dp(2).to_string(),
            )?;
        }

        if self.show_trades {
            writeln!(out)?;
            for outcome in outcomes {
                self.write(&outcome.result, &outcome.metrics, out)?;
            }
        }
        Ok(())
    }
}
