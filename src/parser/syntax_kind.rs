//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the COBOL
//! syntax tree. Reserved words are not separate kinds: COBOL reserved-word
//! recognition depends on position, so the parser compares `WORD` text
//! case-insensitively instead.

/// All syntax kinds (tokens and nodes)
///
/// Tokens are leaf nodes (words, literals, punctuation, whitespace).
/// Nodes are composite (program units, divisions, sections, paragraphs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0, // space runs and newlines, one token each
    COMMENT,        // *> floating comment

    // =========================================================================
    // WORDS AND LITERALS
    // =========================================================================
    WORD,              // PROGRAM-ID, SECT1, 100-MAIN
    STRING_LITERAL,    // 'OUT', "OUT", X'0A'
    NUMERIC_LITERAL,   // 1.5 (sentence mode only)
    PICTURE_STRING,    // 9(5)V99
    COMMENT_ENTRY,     // AUTHOR. <comment entry>

    // =========================================================================
    // PUNCTUATION AND OPERATORS
    // =========================================================================
    DOT,        // .
    COMMA,      // ,
    SEMICOLON,  // ;
    COLON,      // :
    L_PAREN,    // (
    R_PAREN,    // )
    PLUS,       // +
    MINUS,      // -
    STAR,       // *
    STAR_STAR,  // **
    SLASH,      // /
    EQ,         // =
    LT,         // <
    GT,         // >
    LT_EQ,      // <=
    GT_EQ,      // >=
    LT_GT,      // <>
    AMP,        // &

    /// Opaque token for an unrecognized sequence
    ERROR,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_UNIT,
    PROGRAM_UNIT,
    IDENTIFICATION_DIVISION,
    PROGRAM_ID_PARAGRAPH,
    COMMENT_ENTRY_PARAGRAPH,
    ENVIRONMENT_DIVISION,
    DATA_DIVISION,
    PROCEDURE_DIVISION,
    SECTION,
    PARAGRAPH,
    SENTENCE,
    /// Replacement content of a program unit after adaptation
    ADAPTED_NODE,
    /// Tokens that could not be placed in any construct
    ERROR_NODE,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::COMMENT)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CobolLanguage {}

impl rowan::Language for CobolLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<CobolLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CobolLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CobolLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<CobolLanguage>;
