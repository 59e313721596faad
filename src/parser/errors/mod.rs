//! Diagnostics module
//!
//! This module provides the structured diagnostics shared by the parser and
//! the tree adapter:
//! - Categorized error codes with stable message keys
//! - Severity levels
//! - Line/column positions next to byte ranges
//! - Related span tracking (e.g., the PROGRAM-ID an END PROGRAM refers to)

mod codes;
mod diagnostic;

pub use codes::ErrorCode;
pub use diagnostic::{Diagnostic, DiagnosticBuilder, RelatedInfo, Severity};
