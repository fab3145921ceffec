//! Market data port trait.

use crate::domain::error::SymbolError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

/// Source of daily bars for one symbol.
///
/// Implementations are shared across scan workers, hence `Send + Sync`.
/// Bars are returned as stored; the caller validates ordering.
pub trait MarketDataPort: Send + Sync {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, SymbolError>;
}
