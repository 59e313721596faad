//! Diagnostic assertion helpers.

use cobol_cst::parser::{Diagnostic, ErrorCode, Severity};

/// Codes of every diagnostic, in order
pub fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
    diagnostics.iter().map(|d| d.code).collect()
}

/// Find the first diagnostic with `code`, failing the test if there is none
pub fn expect_code(diagnostics: &[Diagnostic], code: ErrorCode) -> &Diagnostic {
    diagnostics.iter().find(|d| d.code == code).unwrap_or_else(|| {
        panic!(
            "Expected {code}, got:\n{}",
            diagnostics.iter().map(Diagnostic::format).collect::<Vec<_>>().join("\n")
        )
    })
}

/// Assert a list has no error-severity diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    assert!(
        errors.is_empty(),
        "Expected no errors, got {} error(s):\n{}",
        errors.len(),
        errors.iter().map(|e| e.format()).collect::<Vec<_>>().join("\n")
    );
}
