//! Characters that remember where they were written.

use std::sync::Arc;

use rowan::TextRange;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use uuid::Uuid;

use crate::base::{Position, Span};

/// A range in a named document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub uri: SmolStr,
    pub range: Span,
}

impl Location {
    pub fn new(uri: impl Into<SmolStr>, range: Span) -> Self {
        Self {
            uri: uri.into(),
            range,
        }
    }
}

/// Where a character came from, before any text substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub original_position: Position,
    pub uri: SmolStr,
    /// Range of the substituted region of the extended text, if any
    pub parent: Option<TextRange>,
    pub instant_location: Option<Location>,
    /// Location of the character per named region (copybook name)
    pub initial_location_map: Arc<FxHashMap<SmolStr, Location>>,
}

/// One source character plus its provenance.
///
/// Two mapped characters are the same character only if their ids match;
/// equal provenance is not identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedCharacter {
    pub id: Uuid,
    pub character: char,
    pub provenance: Provenance,
}

impl MappedCharacter {
    pub fn new(character: char, provenance: Provenance) -> Self {
        Self {
            id: Uuid::new_v4(),
            character,
            provenance,
        }
    }

    /// A new character with a fresh id and the same provenance
    pub fn shadow_copy(&self) -> Self {
        Self::new(self.character, self.provenance.clone())
    }

    pub fn original_position(&self) -> Position {
        self.provenance.original_position
    }

    pub fn uri(&self) -> &str {
        &self.provenance.uri
    }
}
