#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use rallyscan::domain::catalyst::Catalyst;
use rallyscan::domain::error::SymbolError;
pub use rallyscan::domain::ohlcv::Bar;
use rallyscan::ports::catalyst_port::CatalystPort;
use rallyscan::ports::data_port::MarketDataPort;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
    pub calls: AtomicUsize,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, SymbolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SymbolError::DataFetchFailure {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MockCatalysts(pub HashMap<String, Catalyst>);

impl MockCatalysts {
    pub fn with(mut self, symbol: &str, catalyst: Catalyst) -> Self {
        self.0.insert(symbol.to_string(), catalyst);
        self
    }
}

impl CatalystPort for MockCatalysts {
    fn catalyst(&self, symbol: &str) -> Option<Catalyst> {
        self.0.get(symbol).copied()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Evaluation date used across the integration tests.
pub fn as_of() -> NaiveDate {
    date(2024, 6, 28)
}

/// `count` consecutive daily bars ending at `end`, closes from `price(i)`,
/// constant volume.
pub fn generate_bars(
    end: NaiveDate,
    count: usize,
    price: impl Fn(usize) -> f64,
    volume: i64,
) -> Vec<Bar> {
    let first = end - Duration::days(count as i64 - 1);
    (0..count)
        .map(|i| {
            let close = price(i);
            Bar {
                date: first + Duration::days(i as i64),
                open: close * 0.99,
                high: close * 1.01,
                low: close * 0.98,
                close,
                volume,
            }
        })
        .collect()
}

/// Accelerating uptrend: trend, momentum and risk/reward all pass.
pub fn rally_bars(count: usize) -> Vec<Bar> {
    generate_bars(as_of(), count, |i| 100.0 * 1.01_f64.powi(i as i32), 1_000_000)
}

/// Rally whose last bar trades on heavy volume: all four technical signals pass.
pub fn breakout_bars(count: usize) -> Vec<Bar> {
    let mut bars = rally_bars(count);
    if let Some(last) = bars.last_mut() {
        last.volume = 5_000_000;
    }
    bars
}

pub fn downtrend_bars(count: usize) -> Vec<Bar> {
    generate_bars(as_of(), count, |i| 300.0 - i as f64, 1_000_000)
}

/// Write `<dir>/<symbol>.csv` in the downloader's format.
pub fn write_symbol_csv(dir: &Path, symbol: &str, bars: &[Bar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        writeln!(
            content,
            "{},{},{},{},{},{}",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        )
        .unwrap();
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
