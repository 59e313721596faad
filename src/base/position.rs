/// Position tracking for tokens and CST nodes
///
/// Every position is zero-based and relative to a single character stream:
/// `line` and `column` locate the character for diagnostics and navigation,
/// `index` is its absolute offset in the stream.
use rowan::TextSize;

/// A position in source text (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    /// Character count from the start of the line
    pub column: u32,
    /// Byte offset from the start of the stream
    pub index: u32,
}

impl Position {
    pub fn new(line: u32, column: u32, index: u32) -> Self {
        Self {
            line,
            column,
            index,
        }
    }

    pub fn offset(&self) -> TextSize {
        TextSize::new(self.index)
    }

    /// Position immediately after `text`, assuming `text` starts here.
    ///
    /// A `\n` moves to the next line and resets the column.
    pub fn advance(self, text: &str) -> Self {
        let mut next = self;
        for ch in text.chars() {
            if ch == '\n' {
                next.line += 1;
                next.column = 0;
            } else {
                next.column += 1;
            }
        }
        next.index += text.len() as u32;
        next
    }
}

/// A span between two positions, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}
