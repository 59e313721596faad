//! Procedure division sections and paragraphs

#![allow(clippy::unwrap_used)]

use cobol_cst::parser::{
    AstNode, CobolLexer, CobolParser, ErrorCode, ParserSettings, ProcedureDivision, parse,
};
use smol_str::SmolStr;

use crate::helpers::source_fixtures::SECTST;

fn procedure_division(source: &str) -> ProcedureDivision {
    let result = parse(source);
    result
        .source_unit()
        .and_then(|su| su.program_units().next())
        .and_then(|pu| pu.procedure_division())
        .unwrap()
}

#[test]
fn sections_and_paragraphs_are_counted() {
    let result = parse(SECTST);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.text(), SECTST);

    let division = procedure_division(SECTST);
    assert_eq!(division.sections().count(), 2);
    assert_eq!(division.paragraphs().count(), 2);
    assert_eq!(division.sentences().count(), 2);
}

#[test]
fn section_ownership() {
    let division = procedure_division(SECTST);
    let sections: Vec<_> = division.sections().collect();
    let names: Vec<_> = sections.iter().filter_map(|s| s.name()).collect();
    assert_eq!(names, ["SECT1", "SECT2"]);

    let owned = |index: usize| -> Vec<SmolStr> {
        division
            .section_paragraphs(&sections[index])
            .iter()
            .filter_map(|p| p.name())
            .collect()
    };
    assert_eq!(owned(0), ["PARAG1"]);
    assert_eq!(owned(1), ["PARAG2"]);
    assert!(division.standalone_paragraphs().is_empty());

    assert_eq!(sections[0].sentences().count(), 1);
    let parag1 = division.paragraphs().next().unwrap();
    assert_eq!(parag1.sentences().count(), 2);
}

#[test]
fn sentence_text_is_exact() {
    let division = procedure_division(SECTST);
    let first = division.sentences().next().unwrap();
    assert_eq!(first.to_text().trim(), "DISPLAY 'OUT'.");
    assert!(first.is_terminated());
}

#[test]
fn custom_statement_verbs() {
    let source = "ID DIVISION.\nPROGRAM-ID. A.\nPROCEDURE DIVISION.\nP1.\n    NEXT SENTENCE.\n    RETURN.\n";
    let settings = ParserSettings {
        statement_verbs: vec![SmolStr::new("RETURN")],
        ..Default::default()
    };
    let result = CobolParser::new(CobolLexer::new(source), settings).parse();
    let division = result
        .source_unit()
        .and_then(|su| su.program_units().next())
        .and_then(|pu| pu.procedure_division())
        .unwrap();
    let names: Vec<_> = division.paragraphs().filter_map(|p| p.name()).collect();
    assert_eq!(names, ["P1"]);

    let default = procedure_division(source);
    let names: Vec<_> = default.paragraphs().filter_map(|p| p.name()).collect();
    assert_eq!(names, ["P1", "RETURN"]);
}

#[test]
fn section_with_priority() {
    let division = procedure_division("ID DIVISION.\nPROGRAM-ID. A.\nPROCEDURE DIVISION.\nINIT SECTION 10.\n    EXIT.\n");
    let section = division.sections().next().unwrap();
    assert_eq!(section.name().as_deref(), Some("INIT"));
    assert_eq!(section.sentences().count(), 1);
}

#[test]
fn unclosed_literal_does_not_end_the_sentence() {
    let source = "ID DIVISION.\nPROGRAM-ID. T.\nPROCEDURE DIVISION.\nP1.\n DISPLAY 'IT IS. OK\n STOP RUN.\n";
    let result = parse(source);
    assert_eq!(result.text(), source);
    let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [ErrorCode::E0102]);

    let division = procedure_division(source);
    let paragraph = division.paragraphs().next().unwrap();
    assert_eq!(paragraph.sentences().count(), 1);
}
