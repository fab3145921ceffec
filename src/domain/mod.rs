//! Core domain types and logic.

pub mod catalyst;
pub mod config;
pub mod error;
pub mod indicator;
pub mod ohlcv;
pub mod report;
pub mod runner;
pub mod scoring;
pub mod signals;
pub mod snapshot;
pub mod universe;
