//! Foundation types for the COBOL front end.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Span`] - Line/column/index positions
//! - [`LineIndex`] - Offset to line/column conversion
//! - [`TextRange`], [`TextSize`] - Byte ranges (re-exported from rowan)
//!
//! This module has NO dependencies on other crate modules.

mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::{Position, Span};

pub use rowan::{TextRange, TextSize};
