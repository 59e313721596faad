//! Parser options

use smol_str::SmolStr;

use super::errors::Severity;

/// Options controlling how strictly the parser reports structure problems
#[derive(Debug, Clone)]
pub struct ParserSettings {
    /// Report out-of-order and duplicate divisions as errors (otherwise warnings)
    pub strict_division_order: bool,
    /// Words that never open a procedure paragraph, even when followed
    /// directly by a period
    pub statement_verbs: Vec<SmolStr>,
    /// Keep at most this many diagnostics, plus one truncation note
    pub max_diagnostics: Option<usize>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            strict_division_order: true,
            statement_verbs: vec![
                SmolStr::new_static("EXIT"),
                SmolStr::new_static("GOBACK"),
                SmolStr::new_static("CONTINUE"),
            ],
            max_diagnostics: None,
        }
    }
}

impl ParserSettings {
    pub fn is_statement_verb(&self, word: &str) -> bool {
        self.statement_verbs
            .iter()
            .any(|verb| verb.eq_ignore_ascii_case(word))
    }

    /// Severity for division order and duplicate diagnostics
    pub fn division_order_severity(&self) -> Severity {
        if self.strict_division_order {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}
