//! Trading strategies.
//!
//! A strategy sees the whole price history at once and returns every signal
//! for it in ascending date order. The engine only goes through the
//! [`Strategy`] trait and never inspects a variant's parameters.

pub mod buy_and_hold;
pub mod rsi_threshold;
pub mod sma_crossover;

use super::error::TradesimError;
use super::ohlcv::PriceSeries;
use super::signal::TradeSignal;

pub use buy_and_hold::BuyAndHold;
pub use rsi_threshold::RsiThreshold;
pub use sma_crossover::SmaCrossover;

pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn generate_signals(&self, series: &PriceSeries) -> Result<Vec<TradeSignal>, TradesimError>;
}

impl std::fmt::Debug for dyn Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name()).finish_non_exhaustive()
    }
}
