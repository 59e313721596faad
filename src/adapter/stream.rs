//! The character stream legacy tokens are stamped against.

use std::sync::Arc;

use rowan::{TextRange, TextSize};
use smol_str::SmolStr;

use super::legacy::{LegacyToken, TokenType};
use crate::base::{LineIndex, Position};
use crate::mapping::{ExtendedDocument, Location};

/// Read-only view of one source unit's text.
///
/// Created once per source unit from the parsed root's text; every legacy
/// token position comes from here.
#[derive(Debug, Clone)]
pub struct CharStream {
    text: Arc<str>,
    line_index: LineIndex,
    document: Option<Arc<ExtendedDocument>>,
}

impl CharStream {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            text,
            line_index,
            document: None,
        }
    }

    /// A stream over an extended document; tokens get original locations.
    pub fn with_document(document: Arc<ExtendedDocument>) -> Self {
        let mut stream = Self::new(document.text());
        stream.document = Some(document);
        stream
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn document(&self) -> Option<&Arc<ExtendedDocument>> {
        self.document.as_ref()
    }

    pub fn position(&self, offset: TextSize) -> Position {
        self.line_index.position(&self.text, offset)
    }

    /// Original location of `range`, when a mapping is present
    pub fn origin(&self, range: TextRange) -> Option<Location> {
        self.document.as_ref().map(|doc| doc.location_of(range))
    }

    pub fn token(&self, ty: TokenType, text: impl Into<SmolStr>, range: TextRange) -> LegacyToken {
        LegacyToken {
            ty,
            text: text.into(),
            position: self.position(range.start()),
            range,
            origin: self.origin(range),
        }
    }

    /// Synthetic end-of-input token
    pub fn eof(&self) -> LegacyToken {
        let end = TextSize::of(&*self.text);
        self.token(TokenType::Eof, "<EOF>", TextRange::empty(end))
    }

    /// Everything before `offset` as whitespace with the same line layout.
    ///
    /// Each character other than `\n` becomes one space, so a text placed
    /// after the prefix starts at the line and column of `offset`.
    pub fn prefix(&self, offset: TextSize) -> String {
        let end = usize::from(offset).min(self.text.len());
        self.text
            .get(..end)
            .unwrap_or_default()
            .chars()
            .map(|ch| if ch == '\n' { '\n' } else { ' ' })
            .collect()
    }
}

/// `text` with every character other than `\n` replaced by spaces of the
/// same UTF-8 length, so offsets and lines are unchanged
pub fn blank(text: &str) -> String {
    let mut blanked = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\n' {
            blanked.push('\n');
        } else {
            blanked.extend(std::iter::repeat_n(' ', ch.len_utf8()));
        }
    }
    blanked
}
