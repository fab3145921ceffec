//! Universe runner: fans the scorecard out over every symbol and ranks the
//! results.
//!
//! Each symbol is fetched, validated, cut at the evaluation date, and scored
//! independently. A failing symbol is recorded and skipped; it never stops the
//! batch. Work runs on a dedicated pool of `max_concurrency` threads so the
//! data source sees bounded parallel load.

use crate::domain::config::ScanConfig;
use crate::domain::error::SymbolError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::scoring::{score_symbol, ScoreResult};
use crate::domain::snapshot;
use crate::ports::catalyst_port::CatalystPort;
use crate::ports::data_port::MarketDataPort;
use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cooperative stop signal: once cancelled, no further symbols are requested.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// First date requested from the data source.
    pub start: NaiveDate,
    /// Evaluation date; bars after it are ignored.
    pub as_of: NaiveDate,
    /// Stamped on every result of the run.
    pub evaluated_at: DateTime<Utc>,
    pub max_concurrency: usize,
    pub cancel: Option<CancelToken>,
}

impl RunOptions {
    /// Window of `lookback_days` calendar days ending at `as_of`.
    pub fn new(as_of: NaiveDate, lookback_days: u32, max_concurrency: usize) -> Self {
        Self {
            start: as_of - chrono::Duration::days(i64::from(lookback_days)),
            as_of,
            evaluated_at: Utc::now(),
            max_concurrency,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: SymbolError,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UniverseResult {
    /// Score descending, symbol ascending on ties.
    pub results: Vec<ScoreResult>,
    /// In universe order.
    pub failures: Vec<SymbolFailure>,
    /// Symbols never requested because the run was cancelled.
    pub unscanned: Vec<String>,
}

impl UniverseResult {
    pub fn scanned(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

enum Outcome {
    Scored(ScoreResult),
    Failed(SymbolFailure),
    Skipped(String),
}

/// Fetch, validate and score a single symbol.
pub fn evaluate_symbol(
    symbol: &str,
    data: &dyn MarketDataPort,
    catalysts: &dyn CatalystPort,
    config: &ScanConfig,
    options: &RunOptions,
) -> Result<ScoreResult, SymbolError> {
    let bars = data.fetch_series(symbol, options.start, options.as_of)?;
    let series = PriceSeries::new(symbol, bars)?.up_to(options.as_of);
    let snap = snapshot::compute(&series, config)?;
    let result = score_symbol(
        symbol,
        &snap,
        catalysts.catalyst(symbol),
        config,
        options.evaluated_at,
    );
    debug!(
        symbol,
        score = result.score,
        label = %result.label,
        "symbol scored"
    );
    Ok(result)
}

pub fn run(
    symbols: &[String],
    data: &dyn MarketDataPort,
    catalysts: &dyn CatalystPort,
    config: &ScanConfig,
    options: &RunOptions,
) -> UniverseResult {
    info!(
        symbols = symbols.len(),
        start = %options.start,
        as_of = %options.as_of,
        workers = options.max_concurrency,
        "scan started"
    );

    let task = |symbol: &String| -> Outcome {
        if options.cancelled() {
            return Outcome::Skipped(symbol.clone());
        }
        match evaluate_symbol(symbol, data, catalysts, config, options) {
            Ok(result) => Outcome::Scored(result),
            Err(reason) => {
                warn!(symbol = %symbol, %reason, "symbol skipped");
                Outcome::Failed(SymbolFailure {
                    symbol: symbol.clone(),
                    reason,
                })
            }
        }
    };

    let outcomes: Vec<Outcome> = match rayon::ThreadPoolBuilder::new()
        .num_threads(options.max_concurrency.max(1))
        .build()
    {
        Ok(pool) => pool.install(|| symbols.par_iter().map(task).collect()),
        Err(e) => {
            warn!(error = %e, "worker pool unavailable, scanning sequentially");
            symbols.iter().map(task).collect()
        }
    };

    let mut universe = UniverseResult::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Scored(result) => universe.results.push(result),
            Outcome::Failed(failure) => universe.failures.push(failure),
            Outcome::Skipped(symbol) => universe.unscanned.push(symbol),
        }
    }
    rank_results(&mut universe.results);

    info!(
        scored = universe.results.len(),
        failed = universe.failures.len(),
        unscanned = universe.unscanned.len(),
        "scan finished"
    );
    universe
}

/// Sort by score descending, then symbol ascending.
pub fn rank_results(results: &mut [ScoreResult]) {
    results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.symbol.cmp(&b.symbol)));
}
