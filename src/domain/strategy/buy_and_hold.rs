//! Benchmark strategy: buy on the first bar and never sell.

use crate::domain::error::TradesimError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::TradeSignal;
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuyAndHold;

impl BuyAndHold {
    pub fn new() -> Self {
        BuyAndHold
    }
}

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "Buy and Hold"
    }

    fn description(&self) -> &str {
        "Buy on the first bar and hold the position to the end of the data"
    }

    fn generate_signals(&self, series: &PriceSeries) -> Result<Vec<TradeSignal>, TradesimError> {
        Ok(series
            .first()
            .map(|bar| TradeSignal::buy(bar.date(), bar.close(), "initial entry"))
            .into_iter()
            .collect())
    }
}
