//! Extended text plus the table mapping it back to the original documents.

use std::sync::Arc;

use rowan::{TextRange, TextSize};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::character::{Location, MappedCharacter, Provenance};
use crate::base::{LineIndex, Position, Span};

/// One substituted range of the extended text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Range in the extended text
    pub extended: TextRange,
    /// Document the substituted text came from
    pub uri: SmolStr,
    /// Position of the first substituted character in that document
    pub original_start: Position,
    /// Region name, e.g. the copybook name
    pub name: Option<SmolStr>,
}

/// Position-mapping table produced by a preprocessor.
///
/// Offsets outside every entry belong to the main document at their
/// extended-text coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMapping {
    uri: SmolStr,
    entries: Vec<MappingEntry>,
}

impl DocumentMapping {
    pub fn new(uri: impl Into<SmolStr>) -> Self {
        Self {
            uri: uri.into(),
            entries: Vec::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn push(&mut self, entry: MappingEntry) {
        let at = self
            .entries
            .partition_point(|e| e.extended.start() <= entry.extended.start());
        self.entries.insert(at, entry);
    }

    pub fn with_entry(mut self, entry: MappingEntry) -> Self {
        self.push(entry);
        self
    }

    /// The entry whose range holds `offset`
    pub fn entry_at(&self, offset: TextSize) -> Option<&MappingEntry> {
        let after = self.entries.partition_point(|e| e.extended.start() <= offset);
        let entry = self.entries.get(after.checked_sub(1)?)?;
        entry.extended.contains(offset).then_some(entry)
    }
}

/// Text after substitution, with the mapping back to where it was written
#[derive(Debug, Clone)]
pub struct ExtendedDocument {
    text: String,
    line_index: LineIndex,
    mapping: DocumentMapping,
}

impl ExtendedDocument {
    pub fn new(text: impl Into<String>, mapping: DocumentMapping) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            text,
            line_index,
            mapping,
        }
    }

    /// A document with no substituted ranges
    pub fn plain(uri: impl Into<SmolStr>, text: impl Into<String>) -> Self {
        Self::new(text, DocumentMapping::new(uri))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mapping(&self) -> &DocumentMapping {
        &self.mapping
    }

    /// Original position of the character at `offset` and its document
    pub fn resolve(&self, offset: TextSize) -> (SmolStr, Position) {
        match self.mapping.entry_at(offset) {
            Some(entry) => {
                let start = usize::from(entry.extended.start());
                let end = usize::from(offset).min(self.text.len());
                let walked = self.text.get(start..end).unwrap_or_default();
                (entry.uri.clone(), entry.original_start.advance(walked))
            }
            None => (
                self.mapping.uri.clone(),
                self.line_index.position(&self.text, offset),
            ),
        }
    }

    /// Original location of the extended range `range`
    pub fn location_of(&self, range: TextRange) -> Location {
        let (uri, start) = self.resolve(range.start());
        let end = if range.is_empty() {
            start
        } else {
            let start_offset = usize::from(range.start());
            let end_offset = usize::from(range.end()).min(self.text.len());
            start.advance(self.text.get(start_offset..end_offset).unwrap_or_default())
        };
        Location::new(uri, Span::new(start, end))
    }

    /// Every character of the extended text with its provenance
    pub fn mapped_characters(&self) -> Vec<MappedCharacter> {
        let empty = Arc::new(FxHashMap::default());
        let mut characters = Vec::with_capacity(self.text.len());
        let mut buffer = [0u8; 4];
        let mut running: Option<(TextRange, Position)> = None;

        for (offset, ch) in self.text.char_indices() {
            let offset = TextSize::new(offset as u32);
            let encoded: &str = ch.encode_utf8(&mut buffer);
            let provenance = match self.mapping.entry_at(offset) {
                Some(entry) => {
                    let position = match running {
                        Some((range, position)) if range == entry.extended => position,
                        _ => entry.original_start,
                    };
                    running = Some((entry.extended, position.advance(encoded)));
                    let location =
                        Location::new(entry.uri.clone(), Span::new(position, position.advance(encoded)));
                    let initial_location_map = match &entry.name {
                        Some(name) => {
                            let mut map = FxHashMap::default();
                            map.insert(name.clone(), location.clone());
                            Arc::new(map)
                        }
                        None => empty.clone(),
                    };
                    Provenance {
                        original_position: position,
                        uri: entry.uri.clone(),
                        parent: Some(entry.extended),
                        instant_location: Some(location),
                        initial_location_map,
                    }
                }
                None => {
                    running = None;
                    let position = self.line_index.position(&self.text, offset);
                    Provenance {
                        original_position: position,
                        uri: self.mapping.uri.clone(),
                        parent: None,
                        instant_location: Some(Location::new(
                            self.mapping.uri.clone(),
                            Span::new(position, position.advance(encoded)),
                        )),
                        initial_location_map: empty.clone(),
                    }
                }
            };
            characters.push(MappedCharacter::new(ch, provenance));
        }
        characters
    }
}
