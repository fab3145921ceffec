//! File-backed catalyst source.
//!
//! Reads a `symbol,catalyst` CSV once; lookups are then plain map reads.
//! Rows with an unknown catalyst kind are logged and skipped. A symbol listed
//! twice keeps its last catalyst.

use crate::domain::catalyst::Catalyst;
use crate::domain::error::ScannerError;
use crate::ports::catalyst_port::CatalystPort;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct CatalystFileAdapter {
    catalysts: HashMap<String, Catalyst>,
}

#[derive(Debug, Deserialize)]
struct CatalystRow {
    symbol: String,
    catalyst: String,
}

impl CatalystFileAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScannerError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ScannerError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let adapter = Self::from_string(&content).map_err(|reason| ScannerError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        info!(
            path = %path.display(),
            catalysts = adapter.len(),
            "catalysts loaded"
        );
        Ok(adapter)
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(content.as_bytes());
        let mut catalysts = HashMap::new();

        for result in rdr.deserialize::<CatalystRow>() {
            let row = result.map_err(|e| e.to_string())?;
            let symbol = row.symbol.to_uppercase();
            if symbol.is_empty() {
                continue;
            }
            match row.catalyst.parse::<Catalyst>() {
                Ok(kind) => {
                    catalysts.insert(symbol, kind);
                }
                Err(e) => warn!(symbol = %symbol, error = %e, "catalyst row skipped"),
            }
        }

        Ok(Self { catalysts })
    }

    pub fn len(&self) -> usize {
        self.catalysts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalysts.is_empty()
    }
}

impl CatalystPort for CatalystFileAdapter {
    fn catalyst(&self, symbol: &str) -> Option<Catalyst> {
        self.catalysts.get(&symbol.to_uppercase()).copied()
    }
}
