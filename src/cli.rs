//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::catalyst_file_adapter::CatalystFileAdapter;
use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::retry_adapter::RetryingDataPort;
use crate::adapters::universe_adapter::{FileUniverse, StaticUniverse};
use crate::domain::config::{RunConfig, ScanConfig};
use crate::domain::error::ScannerError;
use crate::domain::report::{result_rows, ReportFilter};
use crate::domain::runner::{self, RunOptions, UniverseResult};
use crate::domain::universe::Universe;
use crate::ports::catalyst_port::{CatalystPort, NoCatalysts};
use crate::ports::report_port::ReportPort;
use crate::ports::universe_port::UniversePort;

#[derive(Parser, Debug)]
#[command(name = "rallyscan", about = "Next-day rally scanner for S&P 500 stocks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the universe and export the ranked candidates
    Scan(ScanArgs),
    /// Validate a configuration file and print the effective values
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the symbols a scan would cover
    Universe {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        universe: Option<PathBuf>,
    },
}

/// Command-line overrides for a scan. Anything unset comes from the config.
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    #[arg(short, long)]
    pub config: PathBuf,
    /// Directory of `<SYMBOL>.csv` daily bar files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub catalysts: Option<PathBuf>,
    #[arg(short, long)]
    pub universe: Option<PathBuf>,
    /// Export PRIME rows only
    #[arg(long)]
    pub only_prime: bool,
    #[arg(long)]
    pub max_universe: Option<usize>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan(args) => run_scan(&args),
        Command::Validate { config } => run_validate(&config),
        Command::Universe { config, universe } => {
            run_universe(config.as_deref(), universe.as_deref())
        }
    }
}

fn fail(err: ScannerError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ScannerError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Validated configs with command-line overrides applied.
pub fn build_configs(
    adapter: &FileConfigAdapter,
    args: &ScanArgs,
) -> Result<(ScanConfig, RunConfig), ScannerError> {
    let scan = ScanConfig::from_port(adapter)?;
    let mut run = RunConfig::from_port(adapter)?;

    if let Some(dir) = &args.data_dir {
        run.data_dir = dir.clone();
    }
    if let Some(output) = &args.output {
        run.output = output.clone();
    }
    if let Some(catalysts) = &args.catalysts {
        run.catalysts_file = Some(catalysts.clone());
    }
    if let Some(universe) = &args.universe {
        run.universe_file = Some(universe.clone());
    }
    if args.only_prime {
        run.filter.only_prime = true;
    }
    if let Some(max) = args.max_universe {
        run.max_universe = max;
    }
    run.validate()?;
    Ok((scan, run))
}

fn universe_port(file: Option<&Path>) -> Box<dyn UniversePort> {
    match file {
        Some(path) => Box::new(FileUniverse::new(path)),
        None => Box::new(StaticUniverse::default()),
    }
}

fn catalyst_port(file: Option<&Path>) -> Result<Box<dyn CatalystPort>, ScannerError> {
    Ok(match file {
        Some(path) => Box::new(CatalystFileAdapter::from_file(path)?),
        None => Box::new(NoCatalysts),
    })
}

/// Load configuration, run the scan and write the report.
pub fn scan(args: &ScanArgs) -> Result<(UniverseResult, RunConfig), ScannerError> {
    let adapter = load_config(&args.config)?;
    let (scan_config, run_config) = build_configs(&adapter, args)?;

    let universe = Universe::load(
        universe_port(run_config.universe_file.as_deref()).as_ref(),
        run_config.max_universe,
    );
    let catalysts = catalyst_port(run_config.catalysts_file.as_deref())?;
    let data = RetryingDataPort::new(
        CsvDataAdapter::new(&run_config.data_dir),
        run_config.retries,
        run_config.retry_sleep,
    );

    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let options = RunOptions::new(as_of, run_config.lookback_days, run_config.max_concurrency);
    let result = runner::run(
        universe.symbols(),
        &data,
        catalysts.as_ref(),
        &scan_config,
        &options,
    );

    CsvReportAdapter::new().write(&result, &run_config.filter, &run_config.output)?;
    Ok((result, run_config))
}

fn run_scan(args: &ScanArgs) -> ExitCode {
    match scan(args) {
        Ok((result, run_config)) => {
            print!("{}", format_table(&result, &run_config.filter));
            println!("\nSaved: {}", run_config.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Human-readable ranked table plus a failure summary.
pub fn format_table(result: &UniverseResult, filter: &ReportFilter) -> String {
    let rows = result_rows(result, filter);
    let mut out = String::new();

    if rows.is_empty() {
        out.push_str(&format!("No eligible symbols ({} scanned)\n", result.scanned()));
    } else {
        out.push_str(&format!(
            "{:<4} {:<7} {:>5}  {:<15} {:>9} {:>9} {:>9} {:>5}  {}\n",
            "#", "SYMBOL", "SCORE", "LABEL", "ENTRY", "STOP", "TARGET", "R/R", "CATALYST"
        ));
        for (i, row) in rows.iter().enumerate() {
            out.push_str(&format!(
                "{:<4} {:<7} {:>5}  {:<15} {:>9.2} {:>9.2} {:>9} {:>5}  {}\n",
                i + 1,
                row.symbol,
                row.score,
                row.label.as_str(),
                row.entry,
                row.stop,
                row.target.map_or_else(|| "-".to_string(), |t| format!("{t:.2}")),
                row.risk_reward
                    .map_or_else(|| "-".to_string(), |r| format!("{r:.2}")),
                row.catalyst.map_or_else(|| "-".to_string(), |c| c.to_string()),
            ));
        }
        out.push_str(&format!(
            "\n{} of {} scanned symbols eligible\n",
            rows.len(),
            result.scanned()
        ));
    }

    if !result.failures.is_empty() {
        out.push_str(&format!("\nSkipped {} symbols:\n", result.failures.len()));
        for failure in &result.failures {
            out.push_str(&format!("  {:<7} {}\n", failure.symbol, failure.reason));
        }
    }
    out
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let args = ScanArgs {
        config: config_path.to_path_buf(),
        ..ScanArgs::default()
    };
    let (scan, run) = match build_configs(&adapter, &args) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    println!("[scan]");
    println!("  volume_multiplier         = {}", scan.volume_multiplier);
    println!("  risk_reward_min_threshold = {}", scan.risk_reward_min_threshold);
    println!("  reward_multiplier         = {}", scan.reward_multiplier);
    println!("  max_risk_fraction         = {}", scan.max_risk_fraction);
    println!("  ema_short_period          = {}", scan.ema_short_period);
    println!("  ema_long_period           = {}", scan.ema_long_period);
    println!("  min_history_bars          = {}", scan.min_history_bars);
    println!("[data]");
    println!("  dir                       = {}", run.data_dir.display());
    println!("  lookback_days             = {}", run.lookback_days);
    println!("  retries                   = {}", run.retries);
    println!("  retry_sleep_secs          = {}", run.retry_sleep.as_secs_f64());
    println!("  max_concurrency           = {}", run.max_concurrency);
    println!("[universe]");
    println!("  file                      = {}", display_opt(run.universe_file.as_deref()));
    println!("  max_universe              = {}", run.max_universe);
    println!("[catalysts]");
    println!("  file                      = {}", display_opt(run.catalysts_file.as_deref()));
    println!("[report]");
    println!("  output                    = {}", run.output.display());
    println!("  min_score                 = {}", run.filter.min_score);
    println!("  only_prime                = {}", run.filter.only_prime);
    println!("\nConfiguration is valid");
    ExitCode::SUCCESS
}

fn display_opt(path: Option<&Path>) -> String {
    path.map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
}

/// Symbols for the `universe` command. Unlike a scan, a listed file that
/// cannot be read, or that has blank entries or repeats, is an error here.
pub fn resolve_universe(
    config_path: Option<&Path>,
    universe_file: Option<&Path>,
) -> Result<Universe, ScannerError> {
    let run = match config_path {
        Some(path) => RunConfig::from_port(&load_config(path)?)?,
        None => RunConfig::default(),
    };
    let symbols = match universe_file.or(run.universe_file.as_deref()) {
        Some(path) => FileUniverse::strict(path).load_symbols()?,
        None => StaticUniverse::default().load_symbols()?,
    };
    Ok(Universe::new(symbols, run.max_universe)?)
}

fn run_universe(config_path: Option<&Path>, universe_file: Option<&Path>) -> ExitCode {
    match resolve_universe(config_path, universe_file) {
        Ok(universe) => {
            for symbol in universe.symbols() {
                println!("{}", symbol);
            }
            eprintln!("{} symbols", universe.count());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
