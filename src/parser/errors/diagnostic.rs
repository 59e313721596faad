//! Structured diagnostics
//!
//! Provides rich diagnostic information including:
//! - Error codes and message keys for categorization
//! - Severity levels
//! - Byte range plus line/column position
//! - The division a re-parse failure came from
//! - Hints and related source locations

use rowan::{TextRange, TextSize};

use super::codes::ErrorCode;
use crate::base::Position;
use crate::parser::DivisionKind;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// A problem that makes the program invalid
    #[default]
    Error,
    /// A problem that the front end can tolerate
    Warning,
    /// An informational note
    Hint,
}

impl Severity {
    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Hint => "hint",
        }
    }
}

/// Related location information for a diagnostic
///
/// Used to point to related source locations, e.g. the PROGRAM-ID that an
/// END PROGRAM name fails to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: String,
    pub range: TextRange,
}

impl RelatedInfo {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// One diagnostic entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,
    /// Source location
    pub range: TextRange,
    /// Line/column of `range.start()`
    pub position: Position,
    pub code: ErrorCode,
    pub severity: Severity,
    /// Division whose re-parse produced this diagnostic
    pub division: Option<DivisionKind>,
    pub hint: Option<String>,
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal information
    pub fn new(message: impl Into<String>, range: TextRange, position: Position, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            position,
            code,
            severity: Severity::Error,
            division: None,
            hint: None,
            related: vec![],
        }
    }

    /// Create a builder for more complex diagnostics
    pub fn builder(code: ErrorCode) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code)
    }

    /// Stable message key of the diagnostic's code
    pub fn message_key(&self) -> &'static str {
        self.code.message_key()
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_division(mut self, division: DivisionKind) -> Self {
        self.division = Some(division);
        self
    }

    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }

    pub fn has_related(&self) -> bool {
        !self.related.is_empty()
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = format!(
            "{}:{}: {} {}: {}",
            self.position.line + 1,
            self.position.column + 1,
            self.severity.as_str(),
            self.code,
            self.message
        );
        if let Some(division) = self.division {
            result.push_str(&format!(" (in {division})"));
        }
        if let Some(hint) = &self.hint {
            result.push_str(&format!("\n  hint: {hint}"));
        }
        result
    }
}

/// Builder for creating complex diagnostics
pub struct DiagnosticBuilder {
    code: ErrorCode,
    message: Option<String>,
    range: Option<TextRange>,
    position: Option<Position>,
    severity: Severity,
    division: Option<DivisionKind>,
    hint: Option<String>,
    related: Vec<RelatedInfo>,
}

impl DiagnosticBuilder {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
            range: None,
            position: None,
            severity: Severity::Error,
            division: None,
            hint: None,
            related: vec![],
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn division(mut self, division: DivisionKind) -> Self {
        self.division = Some(division);
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn related(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.related.push(RelatedInfo::new(message, range));
        self
    }

    /// Build the diagnostic
    ///
    /// Falls back to the code's default message, an empty range at the
    /// position (or offset zero), and the position of the range start.
    pub fn build(self) -> Diagnostic {
        let position = self.position.unwrap_or_else(|| {
            let index = self.range.map(|r| u32::from(r.start())).unwrap_or(0);
            Position::new(0, 0, index)
        });
        Diagnostic {
            message: self
                .message
                .unwrap_or_else(|| self.code.default_message().to_string()),
            range: self
                .range
                .unwrap_or_else(|| TextRange::empty(TextSize::new(position.index))),
            position,
            code: self.code,
            severity: self.severity,
            division: self.division,
            hint: self.hint,
            related: self.related,
        }
    }
}
