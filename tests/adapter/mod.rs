//! Adapter layer tests
//!
//! Tests for the CST to legacy parse-tree projection:
//! - Program unit rewrite and END PROGRAM extraction
//! - Division re-parse and position fidelity
//! - Failure reporting and invariant violations

pub mod tests_adapter;
