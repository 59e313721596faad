//! Provenance of characters in substituted text
//!
//! A preprocessor that expands copybooks hands the parser an *extended* text
//! together with a [`DocumentMapping`]. The parser never looks at the mapping;
//! the adapter uses it to stamp every legacy token with the [`Location`] it was
//! written at.

mod character;
mod document;

pub use character::{Location, MappedCharacter, Provenance};
pub use document::{DocumentMapping, ExtendedDocument, MappingEntry};
