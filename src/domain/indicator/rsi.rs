//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first value is at bar n (n price changes are needed).

use rust_decimal::Decimal;

use crate::domain::error::TradesimError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> Result<IndicatorSeries, TradesimError> {
    if period == 0 {
        return Err(TradesimError::invalid_parameter("period", "must be positive"));
    }
    if series.len() <= period {
        return Err(TradesimError::invalid_parameter(
            "period",
            format!("RSI({}) needs more than {} bars, have {}", period, period, series.len()),
        ));
    }

    let bars = series.bars();
    let n = Decimal::from(period);
    let n_minus_one = Decimal::from(period - 1);

    let mut gains = Vec::with_capacity(bars.len() - 1);
    let mut losses = Vec::with_capacity(bars.len() - 1);
    for w in bars.windows(2) {
        let change = w[1].close() - w[0].close();
        gains.push(change.max(Decimal::ZERO));
        losses.push((-change).max(Decimal::ZERO));
    }

    let mut avg_gain = gains[..period].iter().sum::<Decimal>() / n;
    let mut avg_loss = losses[..period].iter().sum::<Decimal>() / n;

    let mut values = Vec::with_capacity(bars.len() - period);
    values.push(IndicatorPoint {
        date: bars[period].date(),
        value: rsi_value(avg_gain, avg_loss),
    });

    for i in period..gains.len() {
        avg_gain = (avg_gain * n_minus_one + gains[i]) / n;
        avg_loss = (avg_loss * n_minus_one + losses[i]) / n;
        values.push(IndicatorPoint {
            date: bars[i + 1].date(),
            value: rsi_value(avg_gain, avg_loss),
        });
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    })
}

fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
    if avg_loss.is_zero() {
        return Decimal::ONE_HUNDRED;
    }
    Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + avg_gain / avg_loss)
}
