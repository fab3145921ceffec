//! CSV export of a ranked scan.
//!
//! Writes the filtered ranked rows to `output_path` and the failure list to
//! `<stem>_failures.csv` next to it. Both files always get a header row, even
//! when empty.

use crate::domain::error::ScannerError;
use crate::domain::report::{failure_rows, result_rows, ReportFilter};
use crate::domain::runner::UniverseResult;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const RESULT_COLUMNS: &[&str] = &[
    "symbol",
    "score",
    "label",
    "trend_ok",
    "momentum_ok",
    "volume_ok",
    "risk_reward_ok",
    "catalyst_present",
    "catalyst",
    "entry",
    "stop",
    "target",
    "risk_reward",
    "evaluated_at",
];

pub const FAILURE_COLUMNS: &[&str] = &["symbol", "kind", "reason"];

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// `reports/scan.csv` -> `reports/scan_failures.csv`.
    pub fn failures_path(output_path: &Path) -> PathBuf {
        let stem = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scan".to_string());
        output_path.with_file_name(format!("{}_failures.csv", stem))
    }
}

fn report_err(path: &Path, e: impl std::fmt::Display) -> ScannerError {
    ScannerError::Report {
        reason: format!("{}: {}", path.display(), e),
    }
}

fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), ScannerError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| report_err(path, e))?;
    wtr.write_record(header).map_err(|e| report_err(path, e))?;
    for row in rows {
        wtr.serialize(row).map_err(|e| report_err(path, e))?;
    }
    wtr.flush().map_err(|e| report_err(path, e))?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &UniverseResult,
        filter: &ReportFilter,
        output_path: &Path,
    ) -> Result<(), ScannerError> {
        let rows = result_rows(result, filter);
        write_csv(output_path, RESULT_COLUMNS, &rows)?;

        let failures_path = Self::failures_path(output_path);
        let failures = failure_rows(result);
        write_csv(&failures_path, FAILURE_COLUMNS, &failures)?;

        info!(
            rows = rows.len(),
            failures = failures.len(),
            path = %output_path.display(),
            "report written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalyst::Catalyst;
    use crate::domain::error::SymbolError;
    use crate::domain::runner::SymbolFailure;
    use crate::domain::scoring::{ScoreResult, StatusLabel, TradeLevels};
    use crate::domain::signals::SignalSet;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    fn scored(symbol: &str, score: u8, label: StatusLabel, catalyst: Option<Catalyst>) -> ScoreResult {
        ScoreResult {
            symbol: symbol.into(),
            score,
            label,
            signals: SignalSet {
                trend_ok: true,
                momentum_ok: true,
                volume_ok: true,
                risk_reward_ok: score >= 4,
                catalyst_present: catalyst.is_some(),
            },
            catalyst,
            levels: TradeLevels {
                entry: 120.5,
                stop: 110.25,
                target: Some(141.0),
                risk_reward: Some(2.0),
            },
            evaluated_at: Utc.with_ymd_and_hms(2024, 6, 28, 22, 0, 0).unwrap(),
        }
    }

    fn sample() -> UniverseResult {
        UniverseResult {
            results: vec![
                scored("NVDA", 5, StatusLabel::Prime, Some(Catalyst::EarningsSurprise)),
                scored("AAPL", 3, StatusLabel::Candidate, None),
            ],
            failures: vec![SymbolFailure {
                symbol: "XYZ".into(),
                reason: SymbolError::DataFetchFailure {
                    reason: "no file".into(),
                },
            }],
            unscanned: vec![],
        }
    }

    #[test]
    fn failures_path_uses_stem() {
        assert_eq!(
            CsvReportAdapter::failures_path(Path::new("out/scan.csv")),
            PathBuf::from("out/scan_failures.csv")
        );
    }

    #[test]
    fn writes_ranked_rows_and_failures() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("scan.csv");
        CsvReportAdapter::new()
            .write(&sample(), &ReportFilter::default(), &out)
            .unwrap();

        let content = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], RESULT_COLUMNS.join(","));
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("NVDA,5,PRIME,true,true,true,true,true,earnings_surprise,120.5,110.25,141.0,2.0,"));
        assert!(lines[2].starts_with("AAPL,3,Candidate,true,true,true,false,false,,"));

        let failures = fs::read_to_string(dir.path().join("scan_failures.csv")).unwrap();
        assert_eq!(
            failures,
            "symbol,kind,reason\nXYZ,data_fetch_failure,data fetch failed: no file\n"
        );
    }

    #[test]
    fn only_prime_filters_rows() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("prime.csv");
        let filter = ReportFilter {
            min_score: 3,
            only_prime: true,
        };
        CsvReportAdapter::new().write(&sample(), &filter, &out).unwrap();

        let content = fs::read_to_string(&out).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("NVDA"));
        assert!(!content.contains("AAPL"));
    }

    #[test]
    fn empty_result_still_writes_headers() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("empty.csv");
        CsvReportAdapter::new()
            .write(&UniverseResult::default(), &ReportFilter::default(), &out)
            .unwrap();

        let content = fs::read_to_string(&out).unwrap();
        assert_eq!(content.trim_end(), RESULT_COLUMNS.join(","));
        let failures = fs::read_to_string(dir.path().join("empty_failures.csv")).unwrap();
        assert_eq!(failures.trim_end(), "symbol,kind,reason");
    }

    #[test]
    fn unwritable_path_is_report_error() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("missing").join("scan.csv");
        let err = CsvReportAdapter::new()
            .write(&sample(), &ReportFilter::default(), &out)
            .unwrap_err();
        assert!(matches!(err, ScannerError::Report { .. }));
    }
}
