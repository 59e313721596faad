//! # cobol-cst
//!
//! Context-sensitive COBOL lexer, lossless CST parser and the adapter that
//! projects the CST into per-division legacy parse trees.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! pipeline  → lex → parse → adapt for one document, rayon for batches
//!   ↓
//! adapter   → Legacy RuleContext trees, pest division grammars
//!   ↓
//! mapping   → Provenance of substituted text (MappedCharacter, ExtendedDocument)
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, rowan CST, diagnostics
//!   ↓
//! base      → Primitives (Position, Span, LineIndex, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → mapping → adapter → pipeline)
// ============================================================================

/// Foundation types: Position, Span, LineIndex
pub mod base;

/// Parser: context-sensitive lexer, recursive-descent parser, typed CST
pub mod parser;

/// Provenance mapping for text produced by copybook substitution
pub mod mapping;

/// CST to legacy parse-tree adapter
pub mod adapter;

/// One document from text to adapted trees
pub mod pipeline;

// Re-export foundation types
pub use base::{LineIndex, Position, Span, TextRange, TextSize};

pub use adapter::{AdaptedSourceUnit, AdapterError, CharStream, RuleContext, TreeAdapter};
pub use parser::{Diagnostic, ParseResult, ParserSettings, parse};
pub use pipeline::{Pipeline, PipelineOutput};
