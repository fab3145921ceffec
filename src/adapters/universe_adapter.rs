//! Universe sources: a fixed in-memory list and a constituent file.

use crate::domain::error::ScannerError;
use crate::domain::universe::{parse_symbols, parse_symbols_strict, UniverseError, SP500_FALLBACK};
use crate::ports::universe_port::UniversePort;
use std::fs;
use std::path::PathBuf;

/// Fixed symbol list. `Default` is the built-in S&P 500 list.
#[derive(Debug, Clone)]
pub struct StaticUniverse {
    symbols: Vec<String>,
}

impl StaticUniverse {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StaticUniverse {
    fn default() -> Self {
        Self::new(SP500_FALLBACK.iter().copied())
    }
}

impl UniversePort for StaticUniverse {
    fn load_symbols(&self) -> Result<Vec<String>, ScannerError> {
        Ok(self.symbols.clone())
    }
}

/// Comma- or newline-separated symbol file.
#[derive(Debug, Clone)]
pub struct FileUniverse {
    path: PathBuf,
    strict: bool,
}

impl FileUniverse {
    /// Blank entries and repeated symbols are skipped.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            strict: false,
        }
    }

    /// Blank entries and repeated symbols are errors.
    pub fn strict(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            strict: true,
        }
    }
}

impl UniversePort for FileUniverse {
    fn load_symbols(&self) -> Result<Vec<String>, ScannerError> {
        let content = fs::read_to_string(&self.path).map_err(|e| UniverseError::Unreadable {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        if self.strict {
            Ok(parse_symbols_strict(&content)?)
        } else {
            Ok(parse_symbols(&content))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn static_default_is_builtin_list() {
        let symbols = StaticUniverse::default().load_symbols().unwrap();
        assert_eq!(symbols.len(), SP500_FALLBACK.len());
        assert_eq!(symbols[0], "AAPL");
    }

    #[test]
    fn file_universe_reads_symbols() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "# S&P 500\nAAPL,MSFT\nnvda\n").unwrap();
        let symbols = FileUniverse::new(file.path()).load_symbols().unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn missing_file_is_universe_error() {
        let err = FileUniverse::new("/nonexistent/sp500.txt")
            .load_symbols()
            .unwrap_err();
        assert!(matches!(
            err,
            ScannerError::Universe(UniverseError::Unreadable { .. })
        ));
    }

    #[test]
    fn duplicate_in_file_is_dropped() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "AAPL\nAAPL\nMSFT,\n").unwrap();
        let symbols = FileUniverse::new(file.path()).load_symbols().unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn strict_file_rejects_duplicate() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "AAPL\nAAPL\n").unwrap();
        let err = FileUniverse::strict(file.path()).load_symbols().unwrap_err();
        assert!(matches!(
            err,
            ScannerError::Universe(UniverseError::DuplicateSymbol(_))
        ));
    }
}
