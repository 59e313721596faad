//! Context-sensitive lexer and lossless parser for COBOL
//!
//! This module builds a lossless CST using:
//! - **logos** for word-level lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! The tree preserves all whitespace and comments, so the text of any node is
//! exactly the source it was parsed from. Typed wrappers sit on top.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! CobolLexer ← GrammarRule (the parser says what it expects next)
//!     ↓
//! CobolParser → GreenNode tree + Diagnostics
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//! ```
//!
//! The lexer keeps no mode of its own. Each call receives the context, so the
//! same characters can lex as a word, a picture string or a comment entry.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod context;
mod division;
pub mod errors;
pub mod lexer;
mod settings;
mod syntax_kind;

pub use ast::*;
pub use context::{GrammarRule, LexMode};
pub use division::DivisionKind;
pub use errors::{Diagnostic, DiagnosticBuilder, ErrorCode, RelatedInfo, Severity};
pub use lexer::{CobolLexer, Token, tokenize};
pub use parser::{CobolParser, ParseResult, parse};
pub use settings::ParserSettings;
pub use syntax_kind::{
    CobolLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken,
};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
