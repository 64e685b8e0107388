//! RSI threshold strategy: buy when RSI drops into the oversold zone, sell
//! when it rises into the overbought zone.

use rust_decimal::Decimal;

use crate::domain::error::TradesimError;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::TradeSignal;
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsiThreshold {
    period: usize,
    oversold: Decimal,
    overbought: Decimal,
    description: String,
}

impl RsiThreshold {
    pub fn new(period: usize, oversold: Decimal, overbought: Decimal) -> Result<Self, TradesimError> {
        if period == 0 {
            return Err(TradesimError::invalid_parameter("rsi_period", "must be positive"));
        }
        if oversold <= Decimal::ZERO || overbought >= Decimal::ONE_HUNDRED || oversold >= overbought {
            return Err(TradesimError::invalid_parameter(
                "oversold",
                format!("need 0 < oversold ({oversold}) < overbought ({overbought}) < 100"),
            ));
        }

        Ok(RsiThreshold {
            period,
            oversold,
            overbought,
            description: format!(
                "Buy when RSI({period}) falls below {oversold}, sell when it rises above {overbought}"
            ),
        })
    }
}

impl Strategy for RsiThreshold {
    fn name(&self) -> &str {
        "RSI Threshold"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn generate_signals(&self, series: &PriceSeries) -> Result<Vec<TradeSignal>, TradesimError> {
        let rsi = calculate_rsi(series, self.period)?;
        let first_bar = rsi.indicator_type.warmup();
        let bars = series.bars();
        let mut signals = Vec::new();

        for (k, pair) in rsi.values.windows(2).enumerate() {
            let (prev, curr) = (pair[0].value, pair[1].value);
            let bar = &bars[first_bar + k + 1];

            if prev >= self.oversold && curr < self.oversold {
                signals.push(TradeSignal::buy(
                    bar.date(),
                    bar.close(),
                    format!("RSI({}) {} fell below {}", self.period, curr.round_dp(2), self.oversold),
                ));
            } else if prev <= self.overbought && curr > self.overbought {
                signals.push(TradeSignal::sell(
                    bar.date(),
                    bar.close(),
                    format!("RSI({}) {} rose above {}", self.period, curr.round_dp(2), self.overbought),
                ));
            }
        }

        Ok(signals)
    }
}
