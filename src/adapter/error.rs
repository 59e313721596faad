//! Error types for tree adaptation.

use rowan::{TextRange, TextSize};
use thiserror::Error;

/// Malformed upstream trees the adapter cannot project.
///
/// These are broken invariants of the CST, not problems in the COBOL source;
/// source problems are reported as diagnostics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// A construct has no token to start its legacy context with.
    #[error("{construct} at offset {offset:?} has no start token")]
    MissingStartToken {
        construct: &'static str,
        offset: TextSize,
    },

    /// A construct has no token to stop its legacy context with.
    #[error("{construct} at offset {offset:?} has no stop token")]
    MissingStopToken {
        construct: &'static str,
        offset: TextSize,
    },

    /// A nested program unit was reached before it was converted.
    #[error("program unit at {range:?} was not converted")]
    UnconvertedProgramUnit { range: TextRange },
}

impl AdapterError {
    /// Create a missing start token error.
    pub fn missing_start(construct: &'static str, offset: TextSize) -> Self {
        Self::MissingStartToken { construct, offset }
    }

    /// Create a missing stop token error.
    pub fn missing_stop(construct: &'static str, offset: TextSize) -> Self {
        Self::MissingStopToken { construct, offset }
    }
}
