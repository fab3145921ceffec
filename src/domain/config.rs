//! Scan configuration: the scoring parameters and the run plumbing settings.
//!
//! Both structs are built once per run from a [`ConfigPort`], validated, and
//! then only ever borrowed.

use crate::domain::error::ScannerError;
use crate::domain::report::ReportFilter;
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;
use std::time::Duration;

/// Parameters consumed by the indicator calculator and the signal evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Today's volume must be at least this multiple of the 20-day average.
    pub volume_multiplier: f64,
    /// Minimum reward/risk ratio for the risk/reward gate.
    pub risk_reward_min_threshold: f64,
    /// Target distance as a multiple of risk (close - long EMA).
    pub reward_multiplier: f64,
    /// Risk must stay strictly below this fraction of the close.
    pub max_risk_fraction: f64,
    pub ema_short_period: usize,
    pub ema_long_period: usize,
    pub min_history_bars: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            volume_multiplier: 1.3,
            risk_reward_min_threshold: 2.0,
            reward_multiplier: 2.0,
            max_risk_fraction: 1.0,
            ema_short_period: 20,
            ema_long_period: 50,
            min_history_bars: 60,
        }
    }
}

impl ScanConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, ScannerError> {
        let d = Self::default();
        let scan = Self {
            volume_multiplier: config.get_double("scan", "volume_multiplier", d.volume_multiplier),
            risk_reward_min_threshold: config.get_double(
                "scan",
                "risk_reward_min_threshold",
                d.risk_reward_min_threshold,
            ),
            reward_multiplier: config.get_double("scan", "reward_multiplier", d.reward_multiplier),
            max_risk_fraction: config.get_double("scan", "max_risk_fraction", d.max_risk_fraction),
            ema_short_period: get_count(config, "scan", "ema_short_period", d.ema_short_period)?,
            ema_long_period: get_count(config, "scan", "ema_long_period", d.ema_long_period)?,
            min_history_bars: get_count(config, "scan", "min_history_bars", d.min_history_bars)?,
        };
        scan.validate()?;
        Ok(scan)
    }

    pub fn validate(&self) -> Result<(), ScannerError> {
        positive("scan", "volume_multiplier", self.volume_multiplier)?;
        positive("scan", "risk_reward_min_threshold", self.risk_reward_min_threshold)?;
        positive("scan", "reward_multiplier", self.reward_multiplier)?;
        if !(self.max_risk_fraction > 0.0 && self.max_risk_fraction <= 1.0) {
            return Err(ScannerError::invalid(
                "scan",
                "max_risk_fraction",
                "max_risk_fraction must be in (0, 1]",
            ));
        }
        if self.ema_short_period == 0 {
            return Err(ScannerError::invalid(
                "scan",
                "ema_short_period",
                "ema_short_period must be at least 1",
            ));
        }
        if self.ema_short_period >= self.ema_long_period {
            return Err(ScannerError::invalid(
                "scan",
                "ema_long_period",
                "ema_long_period must be greater than ema_short_period",
            ));
        }
        Ok(())
    }
}

/// Settings for everything around the scoring core: data location, retries,
/// universe size, report output.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub lookback_days: u32,
    pub retries: u32,
    pub retry_sleep: Duration,
    pub max_concurrency: usize,
    pub universe_file: Option<PathBuf>,
    pub max_universe: usize,
    pub catalysts_file: Option<PathBuf>,
    pub output: PathBuf,
    pub filter: ReportFilter,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            lookback_days: 180,
            retries: 2,
            retry_sleep: Duration::from_millis(400),
            max_concurrency: 4,
            universe_file: None,
            max_universe: 250,
            catalysts_file: None,
            output: PathBuf::from("sp500_nextday_scan.csv"),
            filter: ReportFilter::default(),
        }
    }
}

impl RunConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, ScannerError> {
        let d = Self::default();

        let retry_sleep_secs =
            config.get_double("data", "retry_sleep_secs", d.retry_sleep.as_secs_f64());
        let retry_sleep = Duration::try_from_secs_f64(retry_sleep_secs).map_err(|_| {
            ScannerError::invalid(
                "data",
                "retry_sleep_secs",
                "retry_sleep_secs must be a non-negative number of seconds",
            )
        })?;

        let lookback_days = get_count(config, "data", "lookback_days", d.lookback_days as usize)?;
        let retries = get_count(config, "data", "retries", d.retries as usize)?;
        let min_score = get_count(config, "report", "min_score", d.filter.min_score as usize)?;
        if min_score > 5 {
            return Err(ScannerError::invalid(
                "report",
                "min_score",
                "min_score must be between 0 and 5",
            ));
        }

        let run = Self {
            data_dir: non_empty(config, "data", "dir")
                .map(PathBuf::from)
                .unwrap_or(d.data_dir),
            lookback_days: u32::try_from(lookback_days).map_err(|_| {
                ScannerError::invalid("data", "lookback_days", "lookback_days is too large")
            })?,
            retries: u32::try_from(retries)
                .map_err(|_| ScannerError::invalid("data", "retries", "retries is too large"))?,
            retry_sleep,
            max_concurrency: get_count(config, "data", "max_concurrency", d.max_concurrency)?,
            universe_file: non_empty(config, "universe", "file").map(PathBuf::from),
            max_universe: get_count(config, "universe", "max_universe", d.max_universe)?,
            catalysts_file: non_empty(config, "catalysts", "file").map(PathBuf::from),
            output: non_empty(config, "report", "output")
                .map(PathBuf::from)
                .unwrap_or(d.output),
            filter: ReportFilter {
                min_score: min_score as u8,
                only_prime: config.get_bool("report", "only_prime", d.filter.only_prime),
            },
        };
        run.validate()?;
        Ok(run)
    }

    pub fn validate(&self) -> Result<(), ScannerError> {
        if self.lookback_days == 0 {
            return Err(ScannerError::invalid(
                "data",
                "lookback_days",
                "lookback_days must be at least 1",
            ));
        }
        if self.max_concurrency == 0 {
            return Err(ScannerError::invalid(
                "data",
                "max_concurrency",
                "max_concurrency must be at least 1",
            ));
        }
        if self.max_universe == 0 {
            return Err(ScannerError::invalid(
                "universe",
                "max_universe",
                "max_universe must be at least 1",
            ));
        }
        Ok(())
    }
}

fn positive(section: &str, key: &str, value: f64) -> Result<(), ScannerError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScannerError::invalid(
            section,
            key,
            format!("{} must be positive", key),
        ))
    }
}

fn get_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, ScannerError> {
    let value = config.get_int(section, key, default as i64);
    usize::try_from(value)
        .map_err(|_| ScannerError::invalid(section, key, format!("{} must be non-negative", key)))
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
