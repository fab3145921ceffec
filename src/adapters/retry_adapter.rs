//! Retrying wrapper around any [`MarketDataPort`].
//!
//! Only transient fetch failures are retried; malformed data and short
//! history fail on the first attempt. Attempt `n` (1-based) that fails sleeps
//! `n * retry_sleep` before the next one.

use crate::domain::error::SymbolError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub struct RetryingDataPort<P> {
    inner: P,
    retries: u32,
    retry_sleep: Duration,
}

impl<P: MarketDataPort> RetryingDataPort<P> {
    pub fn new(inner: P, retries: u32, retry_sleep: Duration) -> Self {
        Self {
            inner,
            retries,
            retry_sleep,
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: MarketDataPort> MarketDataPort for RetryingDataPort<P> {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, SymbolError> {
        let mut attempt = 1;
        loop {
            match self.inner.fetch_series(symbol, start_date, end_date) {
                Err(SymbolError::DataFetchFailure { reason }) if attempt <= self.retries => {
                    let wait = self.retry_sleep * attempt;
                    debug!(symbol, attempt, %reason, ?wait, "fetch failed, retrying");
                    thread::sleep(wait);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
