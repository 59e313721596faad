//! Division structure and program identity diagnostics

#![allow(clippy::unwrap_used)]

use cobol_cst::parser::{
    AstNode, CobolLexer, CobolParser, DivisionKind, ErrorCode, ParserSettings, Severity, parse,
};
use rstest::rstest;

use crate::helpers::diagnostic_helpers::{assert_no_errors, codes, expect_code};
use crate::helpers::source_fixtures::{FULL_PROGRAM, MINIMAL, NESTED, SIBLINGS};

#[rstest]
#[case(MINIMAL)]
#[case(FULL_PROGRAM)]
#[case(NESTED)]
#[case(SIBLINGS)]
fn well_formed_programs_have_no_diagnostics(#[case] source: &str) {
    let result = parse(source);
    assert!(result.diagnostics.is_empty(), "{:?}", codes(&result.diagnostics));
}

#[test]
fn divisions_in_order() {
    let result = parse(FULL_PROGRAM);
    let unit = result.source_unit().unwrap().program_units().next().unwrap();
    let kinds: Vec<_> = unit.divisions().map(|(kind, _)| kind).collect();
    assert_eq!(kinds, DivisionKind::ALL);
    assert_eq!(unit.name().as_deref(), Some("PAYROLL"));
}

#[rstest]
#[case(
    "ID DIVISION.\nPROGRAM-ID. A.\nPROCEDURE DIVISION.\n    STOP RUN.\nDATA DIVISION.\n",
    ErrorCode::E0202
)]
#[case(
    "ID DIVISION.\nPROGRAM-ID. A.\nDATA DIVISION.\nDATA DIVISION.\n",
    ErrorCode::E0203
)]
fn division_order_problems(#[case] source: &str, #[case] code: ErrorCode) {
    let result = parse(source);
    let diagnostic = expect_code(&result.diagnostics, code);
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(result.text(), source);

    let relaxed = ParserSettings {
        strict_division_order: false,
        ..Default::default()
    };
    let result = CobolParser::new(CobolLexer::new(source), relaxed).parse();
    assert_eq!(expect_code(&result.diagnostics, code).severity, Severity::Warning);
    assert_no_errors(&result.diagnostics);
}

#[test]
fn missing_identification_division() {
    let source = "PROCEDURE DIVISION.\n    STOP RUN.\n";
    let result = parse(source);
    let diagnostic = expect_code(&result.diagnostics, ErrorCode::E0204);
    assert_eq!(diagnostic.position.line, 0);
    assert_eq!(result.source_unit().unwrap().program_units().count(), 1);
}

#[rstest]
#[case("ID DIVISION.\nAUTHOR. ME.\n", ErrorCode::E0301)]
#[case("ID DIVISION.\nPROGRAM-ID.\nDATA DIVISION.\n", ErrorCode::E0302)]
#[case("ID DIVISION.\nPROGRAM-ID. A.\nEND PROGRAM.\n", ErrorCode::E0304)]
#[case("ID DIVISION\nPROGRAM-ID. A.\n", ErrorCode::E0201)]
fn program_identity_problems(#[case] source: &str, #[case] code: ErrorCode) {
    let result = parse(source);
    expect_code(&result.diagnostics, code);
    assert_eq!(result.text(), source);
}

#[test]
fn end_program_name_mismatch() {
    let source = "ID DIVISION.\nPROGRAM-ID. ALPHA.\nEND PROGRAM BETA.\n";
    let result = parse(source);
    let diagnostic = expect_code(&result.diagnostics, ErrorCode::E0303);
    assert_eq!(diagnostic.position.line, 2);
    assert_eq!(diagnostic.position.column, 12);
    assert!(diagnostic.has_hint());
    assert!(diagnostic.has_related());
    assert_eq!(diagnostic.message_key(), ErrorCode::E0303.message_key());
}

#[test]
fn end_program_name_is_case_insensitive() {
    let result = parse("ID DIVISION.\nPROGRAM-ID. Alpha.\nEND PROGRAM ALPHA.\n");
    assert!(result.diagnostics.is_empty());
}

#[test]
fn nested_program_is_child_of_outer_unit() {
    let result = parse(NESTED);
    let units: Vec<_> = result.source_unit().unwrap().program_units().collect();
    assert_eq!(units.len(), 1);

    let outer = &units[0];
    assert_eq!(outer.name().as_deref(), Some("OUTER"));
    let inner: Vec<_> = outer.nested_programs().collect();
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0].name().as_deref(), Some("INNER"));
    assert!(inner[0].to_text().trim_end().ends_with("END PROGRAM INNER."));
}

#[test]
fn sibling_programs_follow_end_program() {
    let result = parse(SIBLINGS);
    let names: Vec<_> = result
        .source_unit()
        .unwrap()
        .program_units()
        .filter_map(|unit| unit.name())
        .collect();
    assert_eq!(names, ["FIRST", "SECOND"]);
}

#[test]
fn unterminated_sentence_is_reported() {
    let source = "ID DIVISION.\nPROGRAM-ID. A.\nPROCEDURE DIVISION.\n    DISPLAY 'A'\nEND PROGRAM A.\n";
    let result = parse(source);
    expect_code(&result.diagnostics, ErrorCode::E0201);
    assert_eq!(result.text(), source);
}

#[test]
fn data_division_pictures_are_single_tokens() {
    let result = parse(FULL_PROGRAM);
    let pictures: Vec<_> = result
        .tokens
        .iter()
        .filter(|t| t.kind == cobol_cst::parser::SyntaxKind::PICTURE_STRING)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(pictures, ["X(80)", "9(5)", "9V99", "X(20)"]);
}
