//! The set of symbols a scan covers.
//!
//! A [`Universe`] is loaded once at the start of a run, normalised
//! (trimmed, uppercased, de-duplicated), truncated to `max_universe`, and
//! never mutated afterwards. The next run loads a fresh one.

use crate::ports::universe_port::UniversePort;
use std::collections::HashSet;
use tracing::{info, warn};

/// Built-in S&P 500 list used when no constituent file is available.
pub const SP500_FALLBACK: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "BRK-B", "UNH", "XOM", "LLY", "JPM", "V",
    "MA", "HD", "PG", "CVX", "AVGO", "COST", "JNJ", "MRK", "PEP", "ABBV", "KO", "BAC", "ADBE",
    "WMT", "NFLX", "CRM", "TMO", "LIN", "TXN", "PFE", "ABT", "CSCO", "ACN", "AMD", "MCD", "DHR",
    "INTC", "INTU", "QCOM", "LOW", "AMGN", "PM", "HON", "AMAT", "BMY", "IBM", "GE", "GS", "CAT",
    "NOW", "BA", "ISRG", "BKNG", "MDT", "RTX", "BLK", "SPGI", "PLD", "DE", "AMT", "SYK", "LMT",
    "SCHW", "MS", "ADI", "GILD", "MU", "ETN", "ONTO", "IONQ",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("universe is empty")]
    Empty,

    #[error("failed to read symbol list {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

impl Universe {
    /// Normalise `symbols`, dropping duplicates after their first occurrence.
    pub fn new<I, S>(symbols: I, max_universe: usize) -> Result<Self, UniverseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for raw in symbols {
            let symbol = raw.as_ref().trim().to_uppercase();
            if symbol.is_empty() {
                continue;
            }
            if seen.insert(symbol.clone()) {
                out.push(symbol);
            }
        }
        out.truncate(max_universe);
        if out.is_empty() {
            return Err(UniverseError::Empty);
        }
        Ok(Self { symbols: out })
    }

    pub fn fallback(max_universe: usize) -> Self {
        let mut symbols: Vec<String> = SP500_FALLBACK.iter().map(|s| s.to_string()).collect();
        symbols.truncate(max_universe.max(1));
        Self { symbols }
    }

    /// Load from `port`; any failure falls back to the built-in list.
    pub fn load(port: &dyn UniversePort, max_universe: usize) -> Self {
        match port
            .load_symbols()
            .map_err(|e| e.to_string())
            .and_then(|symbols| Universe::new(symbols, max_universe).map_err(|e| e.to_string()))
        {
            Ok(universe) => {
                info!(symbols = universe.count(), "universe loaded");
                universe
            }
            Err(reason) => {
                warn!(%reason, "universe source failed, using built-in S&P 500 list");
                Universe::fallback(max_universe)
            }
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn count(&self) -> usize {
        self.symbols.len()
    }
}

fn tokens(input: &str) -> impl Iterator<Item = &str> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
}

/// Parse a comma- or newline-separated symbol list. Lines starting with `#`
/// are comments. Empty tokens are skipped and repeated symbols keep their
/// first position.
pub fn parse_symbols(input: &str) -> Vec<String> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens(input).filter(|t| !t.is_empty()) {
        let symbol = token.to_uppercase();
        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        } else {
            warn!(%symbol, "duplicate symbol in universe list, keeping the first");
        }
    }
    symbols
}

/// Like [`parse_symbols`], but an empty token or a repeated symbol is an error.
pub fn parse_symbols_strict(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens(input) {
        if token.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = token.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}
