//! Universe source port trait.

use crate::domain::error::ScannerError;

pub trait UniversePort {
    /// Symbols to scan, in the order the source lists them.
    fn load_symbols(&self) -> Result<Vec<String>, ScannerError>;
}
