//! Catalyst source port trait.

use crate::domain::catalyst::Catalyst;

/// Per-symbol catalyst lookup for the current run.
///
/// `None` means no catalyst, never an error.
pub trait CatalystPort: Send + Sync {
    fn catalyst(&self, symbol: &str) -> Option<Catalyst>;
}

/// Catalyst source that never reports one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCatalysts;

impl CatalystPort for NoCatalysts {
    fn catalyst(&self, _symbol: &str) -> Option<Catalyst> {
        None
    }
}
