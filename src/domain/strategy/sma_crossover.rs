//! Moving-average crossover strategy.
//!
//! Buy when the short SMA moves from at-or-below the long SMA to strictly
//! above it; sell on the mirror move. Ties count as "not crossed", so a run of
//! equal averages followed by a strict move fires once, and values sitting on
//! the line fire nothing.

use crate::domain::error::TradesimError;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::TradeSignal;
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmaCrossover {
    short_period: usize,
    long_period: usize,
    description: String,
}

impl SmaCrossover {
    pub fn new(short_period: usize, long_period: usize) -> Result<Self, TradesimError> {
        if short_period == 0 {
            return Err(TradesimError::invalid_parameter("short_period", "must be positive"));
        }
        if long_period == 0 {
            return Err(TradesimError::invalid_parameter("long_period", "must be positive"));
        }
        if short_period >= long_period {
            return Err(TradesimError::invalid_parameter(
                "short_period",
                format!("{short_period} must be less than long_period {long_period}"),
            ));
        }

        Ok(SmaCrossover {
            short_period,
            long_period,
            description: format!(
                "Buy when SMA({short_period}) crosses above SMA({long_period}), \
                 sell when it crosses below"
            ),
        })
    }

    pub fn short_period(&self) -> usize {
        self.short_period
    }

    pub fn long_period(&self) -> usize {
        self.long_period
    }
}

/// Short-average point for the `k`-th long-average point.
///
/// Both series end on the last bar, and the long one starts
/// `long - short` bars later, so the short index is `k + offset`. The dates
/// are compared anyway so a misaligned pair surfaces as an error.
fn aligned_short<'a>(
    short: &'a IndicatorSeries,
    long: &IndicatorSeries,
    offset: usize,
    k: usize,
) -> Result<&'a IndicatorPoint, TradesimError> {
    let long_point = &long.values[k];
    short
        .values
        .get(k + offset)
        .filter(|p| p.date == long_point.date)
        .ok_or_else(|| TradesimError::IndicatorUnavailable {
            indicator: short.indicator_type.to_string(),
            date: long_point.date.to_string(),
        })
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &str {
        "SMA Crossover"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn generate_signals(&self, series: &PriceSeries) -> Result<Vec<TradeSignal>, TradesimError> {
        let short = calculate_sma(series, self.short_period)?;
        let long = calculate_sma(series, self.long_period)?;

        let offset = self.long_period - self.short_period;
        let first_bar = long.indicator_type.warmup();
        let bars = series.bars();
        let mut signals = Vec::new();

        for k in 1..long.len() {
            let prev_short = aligned_short(&short, &long, offset, k - 1)?.value;
            let curr_short = aligned_short(&short, &long, offset, k)?.value;
            let prev_long = long.values[k - 1].value;
            let curr_long = long.values[k].value;

            let bar = &bars[first_bar + k];

            if prev_short <= prev_long && curr_short > curr_long {
                signals.push(TradeSignal::buy(
                    bar.date(),
                    bar.close(),
                    format!(
                        "SMA({}) {} crossed above SMA({}) {}",
                        self.short_period, curr_short, self.long_period, curr_long
                    ),
                ));
            } else if prev_short >= prev_long && curr_short < curr_long {
                signals.push(TradeSignal::sell(
                    bar.date(),
                    bar.close(),
                    format!(
                        "SMA({}) {} crossed below SMA({}) {}",
                        self.short_period, curr_short, self.long_period, curr_long
                    ),
                ));
            }
        }

        Ok(signals)
    }
}
