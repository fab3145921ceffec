//! Domain error types.

use crate::domain::universe::UniverseError;

/// Why a single symbol could not be scored.
///
/// Every variant is recoverable: the runner records it next to the symbol and
/// moves on to the next one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolError {
    #[error("insufficient history: have {bars} bars, need {minimum}")]
    InsufficientHistory { bars: usize, minimum: usize },

    #[error("data fetch failed: {reason}")]
    DataFetchFailure { reason: String },

    #[error("malformed series: {reason}")]
    MalformedSeries { reason: String },
}

impl SymbolError {
    /// Short machine-friendly tag used in failure exports.
    pub fn kind(&self) -> &'static str {
        match self {
            SymbolError::InsufficientHistory { .. } => "insufficient_history",
            SymbolError::DataFetchFailure { .. } => "data_fetch_failure",
            SymbolError::MalformedSeries { .. } => "malformed_series",
        }
    }

    pub(crate) fn fetch(reason: impl Into<String>) -> Self {
        SymbolError::DataFetchFailure {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        SymbolError::MalformedSeries {
            reason: reason.into(),
        }
    }
}

/// Top-level error type for rallyscan.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScannerError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        ScannerError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&ScannerError> for std::process::ExitCode {
    fn from(err: &ScannerError) -> Self {
        let code: u8 = match err {
            ScannerError::Io(_) => 1,
            ScannerError::ConfigParse { .. }
            | ScannerError::ConfigMissing { .. }
            | ScannerError::ConfigInvalid { .. } => 2,
            ScannerError::Universe(_) => 3,
            ScannerError::Report { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
