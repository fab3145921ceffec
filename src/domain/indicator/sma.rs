//! Simple moving average, used for the trailing average volume.
//!
//! O(n) rolling sum. Warmup: first (n-1) values are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceSeries;

pub fn sma_values(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if period == 0 {
        out.resize(values.len(), None);
        return out;
    }

    let mut window_sum = 0.0;
    for (i, &x) in values.iter().enumerate() {
        window_sum += x;
        if i >= period {
            window_sum -= values[i - period];
        }
        if i + 1 >= period {
            out.push(Some(window_sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Mean volume over the trailing `period` bars, the current bar included.
pub fn calculate_volume_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    if period == 0 || series.is_empty() {
        return IndicatorSeries::empty(IndicatorType::VolumeSma(period));
    }

    let averages = sma_values(&series.volumes(), period);
    let values = series
        .bars()
        .iter()
        .zip(averages)
        .map(|(bar, avg)| IndicatorPoint {
            date: bar.date,
            valid: avg.is_some(),
            value: IndicatorValue::Simple(avg.unwrap_or(0.0)),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::VolumeSma(period),
        values,
    }
}
