//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod strategy;
pub mod trade;
pub mod portfolio;
pub mod backtest;
pub mod metrics;
pub mod comparison;
pub mod config_validation;
pub mod error;
