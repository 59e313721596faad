//! Parser layer tests
//!
//! Tests for the context-sensitive lexer and the CST parser:
//! - Token batches per grammar context
//! - Division structure diagnostics
//! - Program identity and nesting
//! - Procedure sections and paragraphs
//! - Lossless reconstruction

pub mod tests_lexer;
pub mod tests_procedure;
pub mod tests_round_trip;
pub mod tests_structure;
