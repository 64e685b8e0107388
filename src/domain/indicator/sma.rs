//! Simple Moving Average indicator.
//!
//! O(n) sliding window: the running sum adds the newest close and drops the
//! one leaving the window. Decimal sums are exact, so only the final division
//! rounds.
//! SMA(n) at bar i = (P[i-n+1] + ... + P[i]) / n, defined for i >= n-1.

use rust_decimal::Decimal;

use crate::domain::error::TradesimError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> Result<IndicatorSeries, TradesimError> {
    if period == 0 {
        return Err(TradesimError::invalid_parameter("period", "must be positive"));
    }
    if series.is_empty() {
        return Err(TradesimError::invalid_parameter("series", "price series is empty"));
    }
    if period > series.len() {
        return Err(TradesimError::invalid_parameter(
            "period",
            format!("{} exceeds series length {}", period, series.len()),
        ));
    }

    let bars = series.bars();
    let divisor = Decimal::from(period);
    let mut values = Vec::with_capacity(bars.len() - period + 1);
    let mut window_sum = Decimal::ZERO;

    for (i, bar) in bars.iter().enumerate() {
        window_sum += bar.close();
        if i >= period {
            window_sum -= bars[i - period].close();
        }
        if i + 1 >= period {
            values.push(IndicatorPoint {
                date: bar.date(),
                value: window_sum / divisor,
            });
        }
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    })
}
