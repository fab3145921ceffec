//! Port traits the domain talks to (hexagonal boundary).

pub mod catalyst_port;
pub mod config_port;
pub mod data_port;
pub mod report_port;
pub mod universe_port;
