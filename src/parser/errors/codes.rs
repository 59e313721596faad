//! Error code definitions for parser and adapter diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical anomalies (opaque tokens)
//! - E02xx: Division structure (order, headers, separator periods)
//! - E03xx: Program identity (PROGRAM-ID, END PROGRAM)
//! - E04xx: Division sub-grammar re-parse failures
//! - E09xx: Generic/fallback diagnostics

use std::fmt;

/// Error codes for diagnostics
///
/// Each code identifies one kind of problem, enabling filtering and stable
/// message keys for downstream formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical anomalies
    // =========================================================================
    /// Unrecognized character sequence
    E0101,
    /// Alphanumeric literal without a closing quote
    E0102,

    // =========================================================================
    // E02xx: Division structure
    // =========================================================================
    /// Missing separator period
    E0201,
    /// Division appears out of order
    E0202,
    /// Division appears more than once in a program
    E0203,
    /// Program has no IDENTIFICATION DIVISION
    E0204,

    // =========================================================================
    // E03xx: Program identity
    // =========================================================================
    /// IDENTIFICATION DIVISION has no PROGRAM-ID paragraph
    E0301,
    /// PROGRAM-ID paragraph has no program name
    E0302,
    /// END PROGRAM name differs from PROGRAM-ID
    E0303,
    /// END PROGRAM without a program name
    E0304,

    // =========================================================================
    // E04xx: Division re-parse
    // =========================================================================
    /// Division text rejected by its sub-grammar
    E0401,

    // =========================================================================
    // E09xx: Generic
    // =========================================================================
    /// Unexpected token in current context
    E0901,
    /// Diagnostics were truncated
    E0902,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            Self::E0304 => "E0304",
            Self::E0401 => "E0401",
            Self::E0901 => "E0901",
            Self::E0902 => "E0902",
        }
    }

    /// Stable key for message lookup by a diagnostic formatter
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::E0101 => "lexer.unrecognizedSequence",
            Self::E0102 => "lexer.unclosedLiteral",
            Self::E0201 => "parser.missingPeriod",
            Self::E0202 => "parser.divisionOrder",
            Self::E0203 => "parser.duplicateDivision",
            Self::E0204 => "parser.missingIdentificationDivision",
            Self::E0301 => "parser.missingProgramId",
            Self::E0302 => "parser.missingProgramName",
            Self::E0303 => "parser.endProgramMismatch",
            Self::E0304 => "parser.missingEndProgramName",
            Self::E0401 => "adapter.divisionReparse",
            Self::E0901 => "parser.unexpectedToken",
            Self::E0902 => "parser.tooManyDiagnostics",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204 => "structural error",
            Self::E0301 | Self::E0302 | Self::E0303 | Self::E0304 => "program identity error",
            Self::E0401 => "division grammar error",
            Self::E0901 | Self::E0902 => "syntax error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "unrecognized character sequence",
            Self::E0102 => "alphanumeric literal is not closed",
            Self::E0201 => "missing separator period",
            Self::E0202 => "division out of order",
            Self::E0203 => "duplicate division",
            Self::E0204 => "missing IDENTIFICATION DIVISION",
            Self::E0301 => "missing PROGRAM-ID paragraph",
            Self::E0302 => "missing program name",
            Self::E0303 => "END PROGRAM name does not match PROGRAM-ID",
            Self::E0304 => "missing program name after END PROGRAM",
            Self::E0401 => "division does not match its grammar",
            Self::E0901 => "unexpected token",
            Self::E0902 => "too many diagnostics",
        }
    }

    /// Check if this is a lexical anomaly
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::E0101 | Self::E0102)
    }

    /// Check if this is a division structure diagnostic
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
