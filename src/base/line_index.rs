//! Offset to line/column conversion.

use rowan::TextSize;

use super::Position;

/// Line start table for one character stream.
///
/// Lines break on `\n` only; a `\r` before it stays part of the previous line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        Self { line_starts }
    }

    /// Resolve a byte offset into a full position.
    ///
    /// `text` must be the stream this index was built from.
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        let index = u32::from(offset);
        let line = match self.line_starts.binary_search(&index) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line] as usize;
        let end = (index as usize).min(text.len());
        let column = text
            .get(line_start..end)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(end - line_start);
        Position::new(line as u32, column as u32, index)
    }
}
