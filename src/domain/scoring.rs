//! Scoring engine: four technical signals plus the catalyst amplifier.
//!
//! | tech count | catalyst | score | label          |
//! |------------|----------|-------|----------------|
//! | 4          | yes      | 5     | PRIME          |
//! | 4          | no       | 4     | Strong TA      |
//! | 3          | yes      | 4     | Catalyst PRIME |
//! | 3          | no       | 3     | Candidate      |
//! | 0..=2      | either   | count | Pass           |
//!
//! A catalyst never lifts a symbol out of `Pass`.

use crate::domain::catalyst::Catalyst;
use crate::domain::config::ScanConfig;
use crate::domain::signals::{evaluate, SignalSet};
use crate::domain::snapshot::IndicatorSnapshot;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    Prime,
    StrongTa,
    CatalystPrime,
    Candidate,
    Pass,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Prime => "PRIME",
            StatusLabel::StrongTa => "Strong TA",
            StatusLabel::CatalystPrime => "Catalyst PRIME",
            StatusLabel::Candidate => "Candidate",
            StatusLabel::Pass => "Pass",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub fn score(signals: &SignalSet) -> (u8, StatusLabel) {
    match (signals.tech_count(), signals.catalyst_present) {
        (4, true) => (5, StatusLabel::Prime),
        (4, false) => (4, StatusLabel::StrongTa),
        (3, true) => (4, StatusLabel::CatalystPrime),
        (3, false) => (3, StatusLabel::Candidate),
        (n, _) => (n, StatusLabel::Pass),
    }
}

/// Entry, stop and target levels behind the risk/reward gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub stop: f64,
    pub target: Option<f64>,
    pub risk_reward: Option<f64>,
}

impl From<&IndicatorSnapshot> for TradeLevels {
    fn from(s: &IndicatorSnapshot) -> Self {
        Self {
            entry: s.close,
            stop: s.ema_long,
            target: s.target,
            risk_reward: s.risk_reward,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub symbol: String,
    pub score: u8,
    pub label: StatusLabel,
    pub signals: SignalSet,
    pub catalyst: Option<Catalyst>,
    pub levels: TradeLevels,
    pub evaluated_at: DateTime<Utc>,
}

/// Evaluate and score one symbol's snapshot.
pub fn score_symbol(
    symbol: &str,
    snapshot: &IndicatorSnapshot,
    catalyst: Option<Catalyst>,
    config: &ScanConfig,
    evaluated_at: DateTime<Utc>,
) -> ScoreResult {
    let signals = evaluate(snapshot, catalyst.is_some(), config);
    let (score, label) = score(&signals);
    ScoreResult {
        symbol: symbol.to_string(),
        score,
        label,
        signals,
        catalyst,
        levels: TradeLevels::from(snapshot),
        evaluated_at,
    }
}
