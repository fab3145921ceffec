//! Daily OHLCV bars and the validated per-symbol price series.

use crate::domain::error::SymbolError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Ordered daily bars for one symbol.
///
/// Built only through [`PriceSeries::new`], which guarantees strictly
/// ascending dates, finite positive prices and non-negative volume. The bars
/// are never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SymbolError> {
        for (i, bar) in bars.iter().enumerate() {
            check_bar(bar)?;
            if i > 0 {
                let prev = bars[i - 1].date;
                if bar.date == prev {
                    return Err(SymbolError::malformed(format!(
                        "duplicate date {}",
                        bar.date
                    )));
                }
                if bar.date < prev {
                    return Err(SymbolError::malformed(format!(
                        "dates not ascending: {} follows {}",
                        bar.date, prev
                    )));
                }
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Copy of the series ending at `as_of` (inclusive).
    pub fn up_to(&self, as_of: NaiveDate) -> PriceSeries {
        let end = self.bars.partition_point(|b| b.date <= as_of);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[..end].to_vec(),
        }
    }
}

fn check_bar(bar: &Bar) -> Result<(), SymbolError> {
    let fields = [
        ("open", bar.open),
        ("high", bar.high),
        ("low", bar.low),
        ("close", bar.close),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value <= 0.0 {
            return Err(SymbolError::malformed(format!(
                "{} on {} is {}",
                name, bar.date, value
            )));
        }
    }
    if bar.volume < 0 {
        return Err(SymbolError::malformed(format!(
            "negative volume on {}",
            bar.date
        )));
    }
    Ok(())
}
