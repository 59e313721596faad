//! The four COBOL divisions and their header words.

use std::fmt;

use super::syntax_kind::SyntaxKind;

/// A top-level division of a program unit, in mandated order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DivisionKind {
    Identification,
    Environment,
    Data,
    Procedure,
}

impl DivisionKind {
    pub const ALL: [DivisionKind; 4] = [
        Self::Identification,
        Self::Environment,
        Self::Data,
        Self::Procedure,
    ];

    /// Match the word that precedes `DIVISION` in a header
    pub fn from_header_word(word: &str) -> Option<Self> {
        let kind = if word.eq_ignore_ascii_case("IDENTIFICATION") || word.eq_ignore_ascii_case("ID") {
            Self::Identification
        } else if word.eq_ignore_ascii_case("ENVIRONMENT") {
            Self::Environment
        } else if word.eq_ignore_ascii_case("DATA") {
            Self::Data
        } else if word.eq_ignore_ascii_case("PROCEDURE") {
            Self::Procedure
        } else {
            return None;
        };
        Some(kind)
    }

    pub fn syntax_kind(self) -> SyntaxKind {
        match self {
            Self::Identification => SyntaxKind::IDENTIFICATION_DIVISION,
            Self::Environment => SyntaxKind::ENVIRONMENT_DIVISION,
            Self::Data => SyntaxKind::DATA_DIVISION,
            Self::Procedure => SyntaxKind::PROCEDURE_DIVISION,
        }
    }

    pub fn from_syntax_kind(kind: SyntaxKind) -> Option<Self> {
        Self::ALL.into_iter().find(|division| division.syntax_kind() == kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Identification => "IDENTIFICATION",
            Self::Environment => "ENVIRONMENT",
            Self::Data => "DATA",
            Self::Procedure => "PROCEDURE",
        }
    }
}

impl fmt::Display for DivisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} DIVISION", self.name())
    }
}
