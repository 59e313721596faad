//! Syntactic contexts used to drive context-sensitive lexing
//!
//! The parser passes a [`GrammarRule`] to every lexer call. The lexer holds no
//! mode of its own, so the same input position can be tokenized differently
//! depending on what the parser expects there.

/// The syntactic unit the parser expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarRule {
    /// Between or at the start of program units
    ProgramUnit,
    /// Inside the IDENTIFICATION DIVISION
    IdentificationDivision,
    /// Inside the ENVIRONMENT DIVISION
    EnvironmentDivision,
    /// Inside the DATA DIVISION
    DataDivision,
    /// Inside the PROCEDURE DIVISION, between sentences
    ProcedureDivision,
    /// A procedure section header
    Section,
    /// A procedure paragraph header
    Paragraph,
    /// Inside a procedure sentence
    Sentence,
    /// The free-form body of an IDENTIFICATION paragraph such as AUTHOR
    CommentEntry,
    /// The operand of a PICTURE clause
    PictureString,
    /// An `END PROGRAM` trailer
    EndProgram,
}

/// How a context tokenizes characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexMode {
    /// COBOL words, literals and punctuation
    Word,
    /// Word mode plus numeric literals with a decimal point
    Sentence,
    /// Rest of the line as one token
    CommentEntry,
    /// One picture character-string
    Picture,
}

impl GrammarRule {
    pub fn lex_mode(self) -> LexMode {
        match self {
            Self::Sentence => LexMode::Sentence,
            Self::CommentEntry => LexMode::CommentEntry,
            Self::PictureString => LexMode::Picture,
            Self::ProgramUnit
            | Self::IdentificationDivision
            | Self::EnvironmentDivision
            | Self::DataDivision
            | Self::ProcedureDivision
            | Self::Section
            | Self::Paragraph
            | Self::EndProgram => LexMode::Word,
        }
    }

    /// Get a human-readable description of this context for diagnostics
    pub fn description(self) -> &'static str {
        match self {
            Self::ProgramUnit => "at program unit level",
            Self::IdentificationDivision => "in IDENTIFICATION DIVISION",
            Self::EnvironmentDivision => "in ENVIRONMENT DIVISION",
            Self::DataDivision => "in DATA DIVISION",
            Self::ProcedureDivision => "in PROCEDURE DIVISION",
            Self::Section => "in section header",
            Self::Paragraph => "in paragraph header",
            Self::Sentence => "in sentence",
            Self::CommentEntry => "in comment entry",
            Self::PictureString => "in PICTURE clause",
            Self::EndProgram => "in END PROGRAM",
        }
    }
}
