//! Signal evaluator: turns a snapshot into the five scorecard flags.

use crate::domain::config::ScanConfig;
use crate::domain::snapshot::IndicatorSnapshot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SignalSet {
    pub trend_ok: bool,
    pub momentum_ok: bool,
    pub volume_ok: bool,
    pub risk_reward_ok: bool,
    pub catalyst_present: bool,
}

impl SignalSet {
    /// Number of technical signals that hold (catalyst excluded), 0..=4.
    pub fn tech_count(&self) -> u8 {
        [
            self.trend_ok,
            self.momentum_ok,
            self.volume_ok,
            self.risk_reward_ok,
        ]
        .into_iter()
        .filter(|&ok| ok)
        .count() as u8
    }
}

pub fn evaluate(
    snapshot: &IndicatorSnapshot,
    catalyst_present: bool,
    config: &ScanConfig,
) -> SignalSet {
    SignalSet {
        trend_ok: trend_ok(snapshot),
        momentum_ok: momentum_ok(snapshot),
        volume_ok: volume_ok(snapshot, config),
        risk_reward_ok: risk_reward_ok(snapshot, config),
        catalyst_present,
    }
}

/// Short EMA above long EMA and price above the short EMA.
fn trend_ok(s: &IndicatorSnapshot) -> bool {
    s.ema_short > s.ema_long && s.close > s.ema_short
}

/// MACD above its signal with a histogram still widening.
fn momentum_ok(s: &IndicatorSnapshot) -> bool {
    s.macd > s.macd_signal && s.macd_hist_today > s.macd_hist_yesterday
}

fn volume_ok(s: &IndicatorSnapshot, config: &ScanConfig) -> bool {
    s.volume_today >= config.volume_multiplier * s.avg_volume_20d
}

fn risk_reward_ok(s: &IndicatorSnapshot, config: &ScanConfig) -> bool {
    if s.risk <= 0.0 || s.risk / s.close >= config.max_risk_fraction {
        return false;
    }
    s.risk_reward
        .is_some_and(|ratio| ratio >= config.risk_reward_min_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// ema20=105, ema50=100, close=106, MACD 1.2/1.0, hist 0.3 > 0.1,
    /// volume 3.0M vs 1.4M average, risk 6 with a 2.5 ratio.
    fn strong_snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            close: 106.0,
            ema_short: 105.0,
            ema_long: 100.0,
            macd: 1.2,
            macd_signal: 1.0,
            macd_hist_today: 0.3,
            macd_hist_yesterday: 0.1,
            avg_volume_20d: 1_400_000.0,
            volume_today: 3_000_000.0,
            risk: 6.0,
            reward: 15.0,
            risk_reward: Some(2.5),
            target: Some(121.0),
        }
    }

    fn scenario_config() -> ScanConfig {
        ScanConfig {
            volume_multiplier: 2.0,
            risk_reward_min_threshold: 2.0,
            reward_multiplier: 2.5,
            ..ScanConfig::default()
        }
    }

    #[test]
    fn all_technicals_hold_on_strong_snapshot() {
        let signals = evaluate(&strong_snapshot(), true, &scenario_config());
        assert_eq!(
            signals,
            SignalSet {
                trend_ok: true,
                momentum_ok: true,
                volume_ok: true,
                risk_reward_ok: true,
                catalyst_present: true,
            }
        );
        assert_eq!(signals.tech_count(), 4);
    }

    #[test]
    fn catalyst_flag_is_passed_through() {
        let signals = evaluate(&strong_snapshot(), false, &scenario_config());
        assert!(!signals.catalyst_present);
        assert_eq!(signals.tech_count(), 4);
    }

    #[test]
    fn trend_needs_both_conditions() {
        let mut snap = strong_snapshot();
        snap.ema_short = 99.0;
        assert!(!evaluate(&snap, false, &scenario_config()).trend_ok);

        let mut snap = strong_snapshot();
        snap.close = 104.0;
        assert!(!evaluate(&snap, false, &scenario_config()).trend_ok);
    }

    #[test]
    fn momentum_rejects_falling_histogram() {
        let mut snap = strong_snapshot();
        snap.macd_hist_yesterday = 0.4;
        assert!(!evaluate(&snap, false, &scenario_config()).momentum_ok);

        let mut snap = strong_snapshot();
        snap.macd = 0.9;
        assert!(!evaluate(&snap, false, &scenario_config()).momentum_ok);
    }

    #[test]
    fn volume_threshold_is_inclusive() {
        let mut snap = strong_snapshot();
        snap.volume_today = 2_800_000.0;
        assert!(evaluate(&snap, false, &scenario_config()).volume_ok);

        snap.volume_today = 2_799_999.0;
        assert!(!evaluate(&snap, false, &scenario_config()).volume_ok);
    }

    #[test]
    fn risk_reward_requires_positive_risk() {
        let mut snap = strong_snapshot();
        snap.risk = 0.0;
        snap.risk_reward = None;
        assert!(!evaluate(&snap, false, &scenario_config()).risk_reward_ok);

        snap.risk = -3.0;
        assert!(!evaluate(&snap, false, &scenario_config()).risk_reward_ok);
    }

    #[test]
    fn risk_reward_below_threshold_fails() {
        let config = ScanConfig {
            risk_reward_min_threshold: 3.0,
            ..scenario_config()
        };
        assert!(!evaluate(&strong_snapshot(), false, &config).risk_reward_ok);
    }

    #[test]
    fn risk_reward_respects_max_risk_fraction() {
        let config = ScanConfig {
            max_risk_fraction: 0.05,
            ..scenario_config()
        };
        // 6 / 106 is about 5.7% of price
        assert!(!evaluate(&strong_snapshot(), false, &config).risk_reward_ok);

        let config = ScanConfig {
            max_risk_fraction: 0.10,
            ..scenario_config()
        };
        assert!(evaluate(&strong_snapshot(), false, &config).risk_reward_ok);
    }

    #[test]
    fn tech_count_ignores_catalyst() {
        let signals = SignalSet {
            trend_ok: true,
            volume_ok: true,
            catalyst_present: true,
            ..SignalSet::default()
        };
        assert_eq!(signals.tech_count(), 2);
        assert_eq!(SignalSet::default().tech_count(), 0);
    }
}
