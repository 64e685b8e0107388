//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report_adapter::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestEngine};
use crate::domain::comparison::compare_strategies;
use crate::domain::config_validation::{
    optional_date, validate_backtest_config, validate_strategy_config, DEFAULT_LONG_PERIOD,
    DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_RSI_PERIOD, DEFAULT_SHORT_PERIOD,
};
use crate::domain::error::TradesimError;
use crate::domain::metrics::PerformanceMetrics;
use crate::domain::strategy::{BuyAndHold, RsiThreshold, SmaCrossover, Strategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradesim", about = "Single-instrument strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of <symbol>.csv files, overriding [data] directory
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        /// Strategy type, overriding [strategy] type
        #[arg(short, long)]
        strategy: Option<String>,
        /// Also list trades and round trips
        #[arg(long)]
        trades: bool,
    },
    /// Run the SMA crossover, RSI and buy-and-hold strategies side by side
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in a data directory
    ListSymbols {
        #[arg(short, long)]
        data_dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            data_dir,
            symbol,
            strategy,
            trades,
        } => run_backtest(
            &config,
            data_dir.as_deref(),
            symbol.as_deref(),
            strategy.as_deref(),
            trades,
            &mut io::stdout().lock(),
        ),
        Command::Compare {
            config,
            data_dir,
            symbol,
        } => run_compare(
            &config,
            data_dir.as_deref(),
            symbol.as_deref(),
            &mut io::stdout().lock(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data_dir } => run_list_symbols(&data_dir, &mut io::stdout().lock()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradesimError> {
    FileConfigAdapter::from_file(path).map_err(|e| TradesimError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn run_backtest(
    config_path: &Path,
    data_dir: Option<&Path>,
    symbol: Option<&str>,
    strategy_override: Option<&str>,
    show_trades: bool,
    out: &mut dyn Write,
) -> Result<(), TradesimError> {
    tracing::info!(config = %config_path.display(), "loading config");
    let config = load_config(config_path)?;
    validate_backtest_config(&config)?;
    validate_strategy_config(&config)?;

    let strategy = build_strategy(&config, strategy_override)?;
    let bt_config = build_backtest_config(&config)?;
    let (data, symbol) = resolve_data_source(&config, data_dir, symbol)?;
    let (start, end) = resolve_date_range(&config)?;

    let series = data.load_series(&symbol, start, end)?;
    tracing::info!(%symbol, bars = series.len(), strategy = strategy.name(), "running backtest");

    let engine = BacktestEngine::new(strategy, bt_config)?;
    let result = engine.run(&series)?;
    let metrics = PerformanceMetrics::compute(&result);

    ConsoleReportAdapter::new(show_trades).write(&result, &metrics, out)
}

pub fn run_compare(
    config_path: &Path,
    data_dir: Option<&Path>,
    symbol: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), TradesimError> {
    tracing::info!(config = %config_path.display(), "loading config");
    let config = load_config(config_path)?;
    validate_backtest_config(&config)?;
    validate_strategy_config(&config)?;

    let strategies = build_comparison_strategies(&config)?;
    let bt_config = build_backtest_config(&config)?;
    let (data, symbol) = resolve_data_source(&config, data_dir, symbol)?;
    let (start, end) = resolve_date_range(&config)?;

    let series = data.load_series(&symbol, start, end)?;
    tracing::info!(
        %symbol,
        bars = series.len(),
        strategies = strategies.len(),
        "running comparison"
    );

    let outcomes = compare_strategies(strategies, &series, &bt_config)?;
    ConsoleReportAdapter::default().write_comparison(&outcomes, out)
}

pub fn run_validate(config_path: &Path) -> Result<(), TradesimError> {
    tracing::info!(config = %config_path.display(), "validating config");
    let config = load_config(config_path)?;
    validate_backtest_config(&config)?;
    validate_strategy_config(&config)?;

    // Constructing the strategy applies the same checks a run would.
    let strategy = build_strategy(&config, None)?;
    eprintln!("Configuration is valid ({}).", strategy.name());
    Ok(())
}

pub fn run_list_symbols(data_dir: &Path, out: &mut dyn Write) -> Result<(), TradesimError> {
    let symbols = CsvAdapter::new(data_dir.to_path_buf()).list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_dir.display());
    }
    for symbol in &symbols {
        writeln!(out, "{}", symbol)?;
    }
    Ok(())
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, TradesimError> {
    let bt_config = BacktestConfig {
        initial_cash: config.get_decimal("backtest", "initial_cash", Decimal::ZERO),
        commission_per_trade: config.get_decimal("backtest", "commission_per_trade", Decimal::ZERO),
    };
    bt_config.validate()?;
    Ok(bt_config)
}

fn period(config: &dyn ConfigPort, key: &str, default: i64) -> Result<usize, TradesimError> {
    let value = config.get_int("strategy", key, default);
    usize::try_from(value).map_err(|_| TradesimError::ConfigInvalid {
        section: "strategy".into(),
        key: key.into(),
        reason: format!("{} must be positive", key),
    })
}

fn build_sma(config: &dyn ConfigPort) -> Result<SmaCrossover, TradesimError> {
    SmaCrossover::new(
        period(config, "short_period", DEFAULT_SHORT_PERIOD)?,
        period(config, "long_period", DEFAULT_LONG_PERIOD)?,
    )
}

fn build_rsi(config: &dyn ConfigPort) -> Result<RsiThreshold, TradesimError> {
    RsiThreshold::new(
        period(config, "rsi_period", DEFAULT_RSI_PERIOD)?,
        config.get_decimal("strategy", "oversold", Decimal::from(DEFAULT_OVERSOLD)),
        config.get_decimal("strategy", "overbought", Decimal::from(DEFAULT_OVERBOUGHT)),
    )
}

/// Build the configured strategy; `override_type` wins over `[strategy] type`.
pub fn build_strategy(
    config: &dyn ConfigPort,
    override_type: Option<&str>,
) -> Result<Box<dyn Strategy>, TradesimError> {
    let kind = override_type
        .map(str::to_string)
        .or_else(|| config.get_string("strategy", "type"))
        .unwrap_or_else(|| "sma_crossover".to_string());

    match kind.trim().to_lowercase().as_str() {
        "sma_crossover" => Ok(Box::new(build_sma(config)?)),
        "rsi" => Ok(Box::new(build_rsi(config)?)),
        "buy_and_hold" => Ok(Box::new(BuyAndHold::new())),
        other => Err(TradesimError::ConfigInvalid {
            section: "strategy".into(),
            key: "type".into(),
            reason: format!("unknown strategy type {:?}", other),
        }),
    }
}

pub fn build_comparison_strategies(
    config: &dyn ConfigPort,
) -> Result<Vec<Box<dyn Strategy>>, TradesimError> {
    Ok(vec![
        Box::new(build_sma(config)?),
        Box::new(build_rsi(config)?),
        Box::new(BuyAndHold::new()),
    ])
}

/// Pick the CSV directory and symbol, command-line values first.
pub fn resolve_data_source(
    config: &dyn ConfigPort,
    data_dir: Option<&Path>,
    symbol: Option<&str>,
) -> Result<(CsvAdapter, String), TradesimError> {
    let directory = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => config
            .get_string("data", "directory")
            .filter(|s| !s.trim().is_empty())
            .map(|s| PathBuf::from(s.trim()))
            .ok_or_else(|| TradesimError::ConfigMissing {
                section: "data".into(),
                key: "directory".into(),
            })?,
    };

    let symbol = match symbol {
        Some(s) => s.trim().to_string(),
        None => config
            .get_string("data", "symbol")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TradesimError::ConfigMissing {
                section: "data".into(),
                key: "symbol".into(),
            })?,
    };

    Ok((CsvAdapter::new(directory), symbol))
}

pub fn resolve_date_range(
    config: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), TradesimError> {
    Ok((
        optional_date(config, "start_date")?,
        optional_date(config, "end_date")?,
    ))
}
