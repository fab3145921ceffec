//! Indicator calculator: one point-in-time snapshot per symbol.
//!
//! Every value is recomputed over the full series on each call; nothing is
//! carried over between runs. The evaluation date is the last bar of the
//! series handed in.

use crate::domain::config::ScanConfig;
use crate::domain::error::SymbolError;
use crate::domain::indicator::macd::{self, DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::{
    calculate_ema, calculate_macd_default, calculate_volume_sma, IndicatorSeries, IndicatorValue,
};
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;
use tracing::debug;

pub const VOLUME_AVERAGE_PERIOD: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist_today: f64,
    pub macd_hist_yesterday: f64,
    pub avg_volume_20d: f64,
    pub volume_today: f64,
    /// close - long EMA; the long EMA acts as the stop.
    pub risk: f64,
    pub reward: f64,
    /// reward / risk, `None` when risk is not positive.
    pub risk_reward: Option<f64>,
    /// close + reward, `None` when risk is not positive.
    pub target: Option<f64>,
}

/// Bars needed before a snapshot can be produced under `config`.
pub fn required_bars(config: &ScanConfig) -> usize {
    let macd_bars = macd::warmup(DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL) + 2;
    config
        .min_history_bars
        .max(config.ema_long_period)
        .max(config.ema_short_period)
        .max(macd_bars)
        .max(VOLUME_AVERAGE_PERIOD)
}

pub fn compute(
    series: &PriceSeries,
    config: &ScanConfig,
) -> Result<IndicatorSnapshot, SymbolError> {
    let minimum = required_bars(config);
    let last = match series.last() {
        Some(bar) if series.len() >= minimum => bar,
        _ => {
            return Err(SymbolError::InsufficientHistory {
                bars: series.len(),
                minimum,
            });
        }
    };

    let ema_short = latest_simple(&calculate_ema(series, config.ema_short_period))?;
    let ema_long = latest_simple(&calculate_ema(series, config.ema_long_period))?;
    let avg_volume_20d = latest_simple(&calculate_volume_sma(series, VOLUME_AVERAGE_PERIOD))?;

    let macd_series = calculate_macd_default(series);
    let (macd, macd_signal, macd_hist_today) = macd_at(&macd_series, 0)?;
    let (_, _, macd_hist_yesterday) = macd_at(&macd_series, 1)?;

    let close = last.close;
    let risk = close - ema_long;
    let reward = config.reward_multiplier * risk;
    let (risk_reward, target) = if risk > 0.0 {
        (Some(reward / risk), Some(close + reward))
    } else {
        (None, None)
    };

    Ok(IndicatorSnapshot {
        date: last.date,
        close,
        ema_short,
        ema_long,
        macd,
        macd_signal,
        macd_hist_today,
        macd_hist_yesterday,
        avg_volume_20d,
        volume_today: last.volume as f64,
        risk,
        reward,
        risk_reward,
        target,
    })
}

fn latest_simple(series: &IndicatorSeries) -> Result<f64, SymbolError> {
    series
        .latest()
        .and_then(|p| p.value.simple())
        .ok_or_else(|| warmup_error(series))
}

fn macd_at(series: &IndicatorSeries, offset: usize) -> Result<(f64, f64, f64), SymbolError> {
    match series.back(offset).map(|p| p.value) {
        Some(IndicatorValue::Macd {
            line,
            signal,
            histogram,
        }) => Ok((line, signal, histogram)),
        _ => Err(warmup_error(series)),
    }
}

fn warmup_error(series: &IndicatorSeries) -> SymbolError {
    debug!(indicator = %series.indicator_type, "indicator still in warmup");
    SymbolError::InsufficientHistory {
        bars: series.values.len(),
        minimum: series.values.len() + 1,
    }
}
