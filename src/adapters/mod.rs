//! Concrete adapter implementations for ports.

pub mod catalyst_file_adapter;
pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod retry_adapter;
pub mod universe_adapter;
