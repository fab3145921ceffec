//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n values, then
//! EMA[i] = x[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) values are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceSeries;

/// EMA over raw values; `None` during warmup.
pub fn ema_values(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if period == 0 {
        out.resize(values.len(), None);
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &x) in values.iter().enumerate() {
        if i < period - 1 {
            sum += x;
            out.push(None);
        } else if i == period - 1 {
            sum += x;
            ema = sum / period as f64;
            out.push(Some(ema));
        } else {
            ema = x * k + ema * (1.0 - k);
            out.push(Some(ema));
        }
    }
    out
}

/// EMA of closing prices.
pub fn calculate_ema(series: &PriceSeries, period: usize) -> IndicatorSeries {
    if period == 0 || series.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Ema(period));
    }

    let emas = ema_values(&series.closes(), period);
    let values = series
        .bars()
        .iter()
        .zip(emas)
        .map(|(bar, ema)| IndicatorPoint {
            date: bar.date,
            valid: ema.is_some(),
            value: IndicatorValue::Simple(ema.unwrap_or(0.0)),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn ema_warmup() {
        let series = calculate_ema(&make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn ema_period_1_tracks_input() {
        let emas = ema_values(&[10.0, 20.0, 30.0], 1);
        assert_eq!(emas, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn ema_seed_is_sma() {
        let emas = ema_values(&[10.0, 20.0, 30.0], 3);
        assert_eq!(emas[0], None);
        assert_eq!(emas[1], None);
        assert_relative_eq!(emas[2].unwrap(), 20.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let emas = ema_values(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        let k = 2.0 / 4.0;
        let sma = 20.0;
        let ema_3 = 40.0 * k + sma * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert_relative_eq!(emas[3].unwrap(), ema_3);
        assert_relative_eq!(emas[4].unwrap(), ema_4);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&make_series(&[100.0; 5]), 3);
        for point in &series.values[2..] {
            assert_relative_eq!(point.value.simple().unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_shorter_than_period_is_all_warmup() {
        let emas = ema_values(&[1.0, 2.0], 5);
        assert_eq!(emas, vec![None, None]);
    }

    #[test]
    fn ema_indicator_type() {
        let series = calculate_ema(&make_series(&[10.0, 20.0, 30.0]), 5);
        assert_eq!(series.indicator_type, IndicatorType::Ema(5));
        assert!(series.latest().is_none());
    }

    #[test]
    fn ema_empty_and_zero_period() {
        assert!(calculate_ema(&make_series(&[]), 3).values.is_empty());
        assert!(calculate_ema(&make_series(&[10.0, 20.0]), 0).values.is_empty());
        assert_eq!(ema_values(&[1.0, 2.0], 0), vec![None, None]);
    }
}
