//! CLI definition and dispatch.

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::headline_file_adapter::HeadlineFileAdapter;
use crate::adapters::json_ledger_adapter::JsonLedgerAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::arena::{run_arena, ArenaConfig};
use crate::domain::circuit_breaker::{check_trade, CircuitBreakerConfig, TradeRequest};
use crate::domain::config_validation::{
    parse_assets, validate_arena_config, validate_circuit_breaker_config, validate_data_config,
    validate_log_config, validate_portfolio_config,
};
use crate::domain::consensus::Council;
use crate::domain::error::CouncilError;
use crate::domain::ohlcv::{validate_ascending, PriceBar};
use crate::domain::portfolio_backtest::{run_portfolio_backtest, PortfolioBacktestConfig};
use crate::domain::signal::Signal;
use crate::domain::sizing::{calculate_limit_price, calculate_position_size, RiskParameters, TradeSetup};
use crate::obs::init_tracing;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::news_port::NewsPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradecouncil", about = "Multi-agent trading signal engine and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the agent council on the latest bars of a symbol
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        /// Headline file, one per line; overrides [data] headlines_dir
        #[arg(long)]
        headlines_file: Option<PathBuf>,
        /// Account equity used to size the suggested order
        #[arg(long)]
        equity: Option<f64>,
    },
    /// Replay a symbol's history through the arena
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the weight-based portfolio backtest
    Portfolio {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Ask the circuit breaker whether a trade may go ahead
    CheckTrade {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ledger: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long, value_enum)]
        side: Side,
        #[arg(long)]
        quantity: f64,
        #[arg(long)]
        price: f64,
    },
    /// Validate every configuration section
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available from the configured data source
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Buy,
    Sell,
}

impl From<Side> for Signal {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => Signal::Buy,
            Side::Sell => Signal::Sell,
        }
    }
}

impl Command {
    fn config_path(&self) -> &Path {
        match self {
            Command::Analyze { config, .. }
            | Command::Backtest { config, .. }
            | Command::Portfolio { config, .. }
            | Command::CheckTrade { config, .. }
            | Command::Validate { config }
            | Command::ListSymbols { config } => config,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let adapter = match load_config(cli.command.config_path()) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = init_logging(&adapter) {
        return report_error(&e);
    }

    let result = match cli.command {
        Command::Analyze {
            symbol,
            headlines_file,
            equity,
            ..
        } => run_analyze(&adapter, &symbol, headlines_file.as_deref(), equity),
        Command::Backtest { symbol, output, .. } => {
            run_backtest(&adapter, &symbol, output.as_deref())
        }
        Command::Portfolio { output, .. } => run_portfolio(&adapter, output.as_deref()),
        Command::CheckTrade {
            ledger,
            symbol,
            side,
            quantity,
            price,
            ..
        } => {
            let request = TradeRequest {
                symbol,
                side: side.into(),
                quantity,
                price,
            };
            run_check_trade(&adapter, &ledger, &request)
        }
        Command::Validate { .. } => run_validate(&adapter),
        Command::ListSymbols { .. } => run_list_symbols(&adapter),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| report_error(&err))
}

fn report_error(err: &CouncilError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

fn init_logging(config: &dyn ConfigPort) -> Result<(), CouncilError> {
    validate_log_config(config)?;
    let level = config.get_string_or("log", "level", "info");
    let format = config.get_string_or("log", "format", "text");
    init_tracing(&level, &format)
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, CouncilError> {
    validate_data_config(config)?;
    let source = config.get_string_or("data", "source", "csv");
    match source.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Box::new(
            crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?,
        )),
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => Err(CouncilError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: "sqlite support requires the `sqlite` feature".to_string(),
        }),
        _ => {
            let dir = config.get_string_or("data", "csv_dir", "");
            Ok(Box::new(CsvAdapter::new(PathBuf::from(dir))))
        }
    }
}

pub fn build_arena_config(config: &dyn ConfigPort) -> Result<ArenaConfig, CouncilError> {
    validate_arena_config(config)?;
    let defaults = ArenaConfig::default();
    Ok(ArenaConfig {
        initial_balance: config.get_double("arena", "initial_balance", defaults.initial_balance),
        risk_percent: config.get_double("arena", "risk_percent", defaults.risk_percent),
        max_position_percent: config.get_double(
            "arena",
            "max_position_percent",
            defaults.max_position_percent,
        ),
        buy_threshold: config.get_double("arena", "buy_threshold", defaults.buy_threshold),
        stop_loss_percent: config.get_double(
            "arena",
            "stop_loss_percent",
            defaults.stop_loss_percent,
        ),
        take_profit_percent: config.get_double(
            "arena",
            "take_profit_percent",
            defaults.take_profit_percent,
        ),
        warmup_bars: config.get_int("arena", "warmup_bars", defaults.warmup_bars as i64) as usize,
        commission_pct: config.get_double("arena", "commission_pct", defaults.commission_pct),
        slippage_pct: config.get_double("arena", "slippage_pct", defaults.slippage_pct),
        allow_shorting: config.get_bool("arena", "allow_shorting", defaults.allow_shorting),
    })
}

pub fn build_circuit_breaker_config(
    config: &dyn ConfigPort,
) -> Result<CircuitBreakerConfig, CouncilError> {
    validate_circuit_breaker_config(config)?;
    let defaults = CircuitBreakerConfig::default();
    Ok(CircuitBreakerConfig {
        max_daily_loss_percent: config.get_double(
            "circuit_breaker",
            "max_daily_loss_percent",
            defaults.max_daily_loss_percent,
        ),
        cooldown_ms: config.get_int("circuit_breaker", "cooldown_ms", defaults.cooldown_ms),
        max_position_size_percent: config.get_double(
            "circuit_breaker",
            "max_position_size_percent",
            defaults.max_position_size_percent,
        ),
    })
}

pub fn build_portfolio_config(
    config: &dyn ConfigPort,
) -> Result<PortfolioBacktestConfig, CouncilError> {
    validate_portfolio_config(config)?;
    let defaults = PortfolioBacktestConfig::default();
    let assets = parse_assets(&config.get_string_or("portfolio", "assets", ""))?;
    Ok(PortfolioBacktestConfig {
        initial_capital: config.get_double(
            "portfolio",
            "initial_capital",
            defaults.initial_capital,
        ),
        period_days: config.get_int("portfolio", "period_days", defaults.period_days as i64)
            as usize,
        commission_rate: config.get_double(
            "portfolio",
            "commission_rate",
            defaults.commission_rate,
        ),
        assets,
    })
}

fn fetch_history(data: &dyn DataPort, symbol: &str) -> Result<Vec<PriceBar>, CouncilError> {
    let bars = data.fetch_bars(symbol)?;
    if bars.is_empty() {
        return Err(CouncilError::NoData {
            symbol: symbol.to_string(),
        });
    }
    validate_ascending(symbol, &bars)?;
    Ok(bars)
}

fn run_analyze(
    config: &dyn ConfigPort,
    symbol: &str,
    headlines_file: Option<&Path>,
    equity: Option<f64>,
) -> Result<(), CouncilError> {
    let data = build_data_port(config)?;
    let arena = build_arena_config(config)?;
    let bars = fetch_history(data.as_ref(), symbol)?;

    let headlines = match (headlines_file, config.get_string("data", "headlines_dir")) {
        (Some(path), _) => HeadlineFileAdapter::read_file(path)?,
        (None, Some(dir)) => HeadlineFileAdapter::new(PathBuf::from(dir)).headlines(symbol)?,
        (None, None) => Vec::new(),
    };
    info!(symbol, bars = bars.len(), headlines = headlines.len(), "analyzing");

    let deliberation = Council::with_news().deliberate(&bars, &headlines);
    let consensus = &deliberation.consensus;

    let mut output = serde_json::to_value(&deliberation)?;
    if consensus.signal != Signal::Hold {
        let price = bars.last().map(|b| b.close).unwrap_or_default();
        let account_equity = equity.unwrap_or(arena.initial_balance);
        let setup = TradeSetup {
            price,
            signal: consensus.signal,
            confidence: consensus.confidence,
            sentiment: consensus.sentiment,
        };
        let risk = RiskParameters {
            account_equity,
            risk_per_trade_percent: arena.risk_percent,
            max_position_size_percent: arena.max_position_percent,
            available_cash: None,
        };
        output["order"] = json!({
            "side": consensus.signal,
            "quantity": calculate_position_size(&setup, &risk),
            "limitPrice": calculate_limit_price(&setup),
        });
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_backtest(config: &dyn ConfigPort, symbol: &str, output: Option<&Path>) -> Result<(), CouncilError> {
    let data = build_data_port(config)?;
    let arena = build_arena_config(config)?;
    let bars = fetch_history(data.as_ref(), symbol)?;

    info!(symbol, bars = bars.len(), "running arena backtest");
    let report = run_arena(symbol, &bars, &arena)?;

    println!("Symbol:         {}", report.symbol);
    println!("Initial:        {:.2}", report.initial_balance);
    println!("Final:          {:.2}", report.final_balance);
    println!("Profit:         {:.2} ({:.2}%)", report.profit, report.profit_percent);
    println!("Trades:         {}", report.trade_count);
    println!("Win rate:       {:.1}%", report.win_rate);
    println!("Max drawdown:   {:.2}%", report.max_drawdown);
    println!("Profit factor:  {:.2}", report.profit_factor);

    if let Some(path) = output {
        JsonReportAdapter::new().write_backtest(&report, &path.display().to_string())?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn run_portfolio(config: &dyn ConfigPort, output: Option<&Path>) -> Result<(), CouncilError> {
    let data = build_data_port(config)?;
    let portfolio = build_portfolio_config(config)?;

    info!(assets = portfolio.assets.len(), "running portfolio backtest");
    let result = run_portfolio_backtest(data.as_ref(), &portfolio)?;

    println!("Period:            {} to {} ({} days)", result.start_date, result.end_date, result.trading_days);
    println!("Initial capital:   {:.2}", result.initial_capital);
    println!("Final value:       {:.2}", result.final_value);
    println!("Total return:      {:.2}%", result.total_return_percent);
    println!("Annualized return: {:.2}%", result.annualized_return);
    println!("Volatility:        {:.2}%", result.volatility);
    println!("Sharpe ratio:      {:.2}", result.sharpe_ratio);
    println!("Max drawdown:      {:.2}%", result.max_drawdown);
    println!("Commission:        {:.2}", result.total_commission);
    for asset in &result.asset_results {
        println!(
            "  {:<8} {:>6.2}%  {:>12.2}  {:>+8.2}%",
            asset.symbol, asset.weight, asset.final_value, asset.return_percent
        );
    }

    if let Some(path) = output {
        JsonReportAdapter::new().write_portfolio(&result, &path.display().to_string())?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn run_check_trade(
    config: &dyn ConfigPort,
    ledger_path: &Path,
    request: &TradeRequest,
) -> Result<(), CouncilError> {
    let breaker = build_circuit_breaker_config(config)?;
    let portfolio = JsonLedgerAdapter::new(ledger_path.to_path_buf()).load_portfolio()?;

    let verdict = check_trade(&portfolio, request, &breaker, Utc::now());
    if verdict.allowed {
        println!(
            "trade allowed: {} {} {} @ {}",
            request.side, request.quantity, request.symbol, request.price
        );
    } else {
        println!(
            "trade skipped: {}",
            verdict.reason.as_deref().unwrap_or("denied by circuit breaker")
        );
    }
    Ok(())
}

fn run_validate(config: &dyn ConfigPort) -> Result<(), CouncilError> {
    validate_data_config(config)?;
    validate_arena_config(config)?;
    validate_circuit_breaker_config(config)?;
    if config.get_string("portfolio", "assets").is_some() {
        validate_portfolio_config(config)?;
    }
    validate_log_config(config)?;
    println!("Configuration valid");
    Ok(())
}

fn run_list_symbols(config: &dyn ConfigPort) -> Result<(), CouncilError> {
    let data = build_data_port(config)?;
    let symbols = data.list_symbols()?;
    if symbols.is_empty() {
        println!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
    }
    Ok(())
}
