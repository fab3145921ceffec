//! Report generation port trait.

use crate::domain::error::ScannerError;
use crate::domain::report::ReportFilter;
use crate::domain::runner::UniverseResult;
use std::path::Path;

/// Port for exporting a ranked scan.
pub trait ReportPort {
    fn write(
        &self,
        result: &UniverseResult,
        filter: &ReportFilter,
        output_path: &Path,
    ) -> Result<(), ScannerError>;
}
