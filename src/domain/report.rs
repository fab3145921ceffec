//! Tabular output records handed to the presentation/export layer.

use crate::domain::catalyst::Catalyst;
use crate::domain::runner::{SymbolFailure, UniverseResult};
use crate::domain::scoring::{ScoreResult, StatusLabel};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which ranked rows make it into a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFilter {
    pub min_score: u8,
    /// Keep only `PRIME` rows; overrides `min_score`.
    pub only_prime: bool,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            min_score: 3,
            only_prime: false,
        }
    }
}

impl ReportFilter {
    pub fn accepts(&self, result: &ScoreResult) -> bool {
        if self.only_prime {
            result.label == StatusLabel::Prime
        } else {
            result.score >= self.min_score
        }
    }
}

/// One exported row per scored symbol. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub symbol: String,
    pub score: u8,
    pub label: StatusLabel,
    pub trend_ok: bool,
    pub momentum_ok: bool,
    pub volume_ok: bool,
    pub risk_reward_ok: bool,
    pub catalyst_present: bool,
    pub catalyst: Option<Catalyst>,
    pub entry: f64,
    pub stop: f64,
    pub target: Option<f64>,
    pub risk_reward: Option<f64>,
    pub evaluated_at: DateTime<Utc>,
}

impl From<&ScoreResult> for ResultRow {
    fn from(r: &ScoreResult) -> Self {
        Self {
            symbol: r.symbol.clone(),
            score: r.score,
            label: r.label,
            trend_ok: r.signals.trend_ok,
            momentum_ok: r.signals.momentum_ok,
            volume_ok: r.signals.volume_ok,
            risk_reward_ok: r.signals.risk_reward_ok,
            catalyst_present: r.signals.catalyst_present,
            catalyst: r.catalyst,
            entry: round2(r.levels.entry),
            stop: round2(r.levels.stop),
            target: r.levels.target.map(round2),
            risk_reward: r.levels.risk_reward.map(round2),
            evaluated_at: r.evaluated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRow {
    pub symbol: String,
    pub kind: &'static str,
    pub reason: String,
}

impl From<&SymbolFailure> for FailureRow {
    fn from(f: &SymbolFailure) -> Self {
        Self {
            symbol: f.symbol.clone(),
            kind: f.reason.kind(),
            reason: f.reason.to_string(),
        }
    }
}

/// Rows accepted by `filter`, in ranked order.
pub fn result_rows(result: &UniverseResult, filter: &ReportFilter) -> Vec<ResultRow> {
    result
        .results
        .iter()
        .filter(|r| filter.accepts(r))
        .map(ResultRow::from)
        .collect()
}

pub fn failure_rows(result: &UniverseResult) -> Vec<FailureRow> {
    result.failures.iter().map(FailureRow::from).collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
