//! Backtest engine and daily simulation loop.
//!
//! The strategy runs once over the full series. The engine then walks the
//! bars in date order, applies every signal dated on the bar to a fresh
//! [`Portfolio`], and snapshots equity at the bar's close.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

use super::error::TradesimError;
use super::ohlcv::PriceSeries;
use super::portfolio::Portfolio;
use super::signal::{Action, TradeSignal};
use super::strategy::Strategy;
use super::trade::Trade;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktestConfig {
    pub initial_cash: Decimal,
    pub commission_per_trade: Decimal,
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), TradesimError> {
        if self.initial_cash <= Decimal::ZERO {
            return Err(TradesimError::invalid_parameter(
                "initial_cash",
                format!("must be positive, got {}", self.initial_cash),
            ));
        }
        if self.commission_per_trade < Decimal::ZERO {
            return Err(TradesimError::invalid_parameter(
                "commission_per_trade",
                format!("must be non-negative, got {}", self.commission_per_trade),
            ));
        }
        Ok(())
    }
}

/// Portfolio state at the close of one simulated bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub cash: Decimal,
    pub shares_owned: u64,
    pub total_value: Decimal,
    pub market_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktestResult {
    pub strategy_name: String,
    pub initial_value: Decimal,
    pub final_value: Decimal,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<PortfolioSnapshot>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub struct BacktestEngine {
    strategy: Box<dyn Strategy>,
    config: BacktestConfig,
}

impl BacktestEngine {
    pub fn new(strategy: Box<dyn Strategy>, config: BacktestConfig) -> Result<Self, TradesimError> {
        config.validate()?;
        Ok(BacktestEngine { strategy, config })
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn run(&self, series: &PriceSeries) -> Result<BacktestResult, TradesimError> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(TradesimError::invalid_parameter(
                    "series",
                    "price series is empty",
                ));
            }
        };

        let signals = self.strategy.generate_signals(series)?;
        tracing::info!(
            strategy = self.strategy.name(),
            bars = series.len(),
            signals = signals.len(),
            "running backtest from {} to {}",
            first.date(),
            last.date()
        );

        let mut by_date: BTreeMap<NaiveDate, Vec<&TradeSignal>> = BTreeMap::new();
        for signal in &signals {
            by_date.entry(signal.date).or_default().push(signal);
        }

        let mut portfolio = Portfolio::new(self.config.initial_cash)?;
        let mut equity_curve = Vec::with_capacity(series.len());

        for bar in series.bars() {
            if let Some(todays) = by_date.remove(&bar.date()) {
                for signal in todays {
                    self.apply_signal(&mut portfolio, signal)?;
                }
            }

            equity_curve.push(PortfolioSnapshot {
                date: bar.date(),
                cash: portfolio.cash(),
                shares_owned: portfolio.shares_owned(),
                total_value: portfolio.total_value(bar.close()),
                market_price: bar.close(),
            });
        }

        if !by_date.is_empty() {
            tracing::debug!(
                dates = by_date.len(),
                "ignored signals dated outside the series"
            );
        }

        let final_value = portfolio.total_value(last.close());
        tracing::info!(
            strategy = self.strategy.name(),
            trades = portfolio.trade_count(),
            %final_value,
            "backtest complete"
        );

        Ok(BacktestResult {
            strategy_name: self.strategy.name().to_string(),
            initial_value: self.config.initial_cash,
            final_value,
            trades: portfolio.into_trade_history(),
            equity_curve,
            start_date: first.date(),
            end_date: last.date(),
        })
    }

    /// Turn one signal into a trade sized from the portfolio.
    ///
    /// Buys spend all cash left after commission on whole shares; sells
    /// liquidate the whole position. Nothing to buy or sell is a no-op.
    fn apply_signal(&self, portfolio: &mut Portfolio, signal: &TradeSignal) -> Result<(), TradesimError> {
        let price = signal.reference_price;
        if price <= Decimal::ZERO {
            return Err(TradesimError::invalid_trade(format!(
                "signal on {} has non-positive reference price {}",
                signal.date, price
            )));
        }
        let commission = self.config.commission_per_trade;

        let shares = match signal.action {
            Action::Buy => {
                let budget = portfolio.cash() - commission;
                if budget <= Decimal::ZERO {
                    0
                } else {
                    (budget / price).floor().to_u64().unwrap_or(0)
                }
            }
            Action::Sell => portfolio.shares_owned(),
        };

        if shares == 0 {
            tracing::debug!(date = %signal.date, action = %signal.action, "signal skipped: nothing to trade");
            return Ok(());
        }

        let trade = Trade::new(signal.date, signal.action, price, shares, commission)?;
        if portfolio.execute_trade(trade) {
            tracing::debug!(
                date = %signal.date,
                action = %signal.action,
                shares,
                %price,
                cash = %portfolio.cash(),
                "trade executed"
            );
        } else {
            tracing::debug!(date = %signal.date, action = %signal.action, "trade rejected by portfolio");
        }
        Ok(())
    }
}
