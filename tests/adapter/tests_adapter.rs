//! Tree adapter behaviour

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use cobol_cst::adapter::{
    AdaptedSourceUnit, AdapterError, CharStream, ParseTree, RuleKind, TreeAdapter, get_end_program_name,
};
use cobol_cst::parser::{AstNode, DivisionKind, ErrorCode, SyntaxKind, SyntaxNode, parse};
use rowan::GreenNodeBuilder;

use crate::helpers::source_fixtures::{FULL_PROGRAM, NESTED, SECTST, SIBLINGS};

fn adapt(source: &str) -> AdaptedSourceUnit {
    let result = parse(source);
    TreeAdapter::new(Arc::new(CharStream::new(source)))
        .adapt(&result.syntax())
        .unwrap()
}

fn end_program_name(source: &str) -> Option<String> {
    let result = parse(source);
    let unit = result.source_unit()?.program_units().next()?;
    get_end_program_name(&unit).map(|tokens| tokens.iter().map(|t| t.text().to_string()).collect())
}

#[test]
fn end_program_name_extraction() {
    assert_eq!(
        end_program_name("ID DIVISION.\nPROGRAM-ID. FOO.\nEND PROGRAM FOO.\n").as_deref(),
        Some("FOO")
    );
    assert_eq!(
        end_program_name("id division.\nprogram-id. foo.\nend program foo.").as_deref(),
        Some("foo")
    );
    assert_eq!(end_program_name("ID DIVISION.\nPROGRAM-ID. FOO.\n"), None);
}

#[test]
fn every_division_is_converted() {
    let adapted = adapt(FULL_PROGRAM);
    assert!(adapted.ok(), "{:?}", adapted.diagnostics);

    let unit = adapted.program_units().next().unwrap();
    let kinds: Vec<String> = unit.rules().map(|rule| rule.kind.to_string()).collect();
    assert_eq!(
        kinds,
        [
            "identification::identification_division",
            "environment::environment_division",
            "data::data_division",
            "ProcedureDivision",
            "EndProgramStatement",
        ]
    );
    assert!(!unit.has_exception());
}

#[test]
fn grammar_rules_reach_the_leaves() {
    let adapted = adapt(FULL_PROGRAM);
    let unit = adapted.program_units().next().unwrap();

    assert_eq!(unit.find_grammar_rule("program_name").unwrap().text(), "PAYROLL");
    assert_eq!(
        unit.find_grammar_rule("file_control_entry").unwrap().text(),
        "SELECT EMP-FILE ASSIGN TO 'EMP.DAT' ."
    );
    assert_eq!(unit.find_grammar_rule("picture_clause").unwrap().text(), "PIC X(80)");
    assert_eq!(
        unit.find_grammar_rule("comment_paragraph").unwrap().text(),
        "AUTHOR . J. SMITH, ACCOUNTING."
    );
}

#[test]
fn start_rule_wraps_compilation_unit() {
    let adapted = adapt(SECTST);
    assert_eq!(adapted.tree.kind, RuleKind::StartRule);
    assert_eq!(adapted.tree.children.len(), 2);
    assert!(matches!(&adapted.tree.children[0], ParseTree::Rule(r) if r.kind == RuleKind::CompilationUnit));

    let eof = adapted.tree.children[1].as_terminal().unwrap();
    assert!(eof.is_eof());
    assert_eq!(eof.range.start(), rowan::TextSize::of(SECTST));

    let start = adapted.tree.start.as_ref().unwrap();
    let stop = adapted.tree.stop.as_ref().unwrap();
    assert_eq!((start.text.as_str(), start.line(), start.column()), ("IDENTIFICATION", 0, 0));
    assert_eq!((stop.text.as_str(), stop.line(), stop.column()), (".", 12, 17));
}

#[test]
fn procedure_sections_are_projected() {
    let adapted = adapt(SECTST);
    let unit = adapted.program_units().next().unwrap();
    let division = unit.rules_of(&RuleKind::ProcedureDivision).next().unwrap();

    assert_eq!(division.rules_of(&RuleKind::ProcedureSection).count(), 2);
    assert_eq!(division.rules_of(&RuleKind::Sentence).count(), 2);
    let sect2 = division.rules_of(&RuleKind::ProcedureSection).nth(1).unwrap();
    let parag2 = sect2.rules_of(&RuleKind::Paragraph).next().unwrap();
    assert_eq!(parag2.text(), "PARAG2 . DISPLAY 'PARAG2' .");
}

#[test]
fn rewritten_tree_is_blank_with_adapted_nodes() {
    let adapted = adapt(NESTED);
    let root = adapted.root();
    let text = root.text().to_string();
    assert_eq!(text.len(), NESTED.len());
    assert_eq!(text.matches('\n').count(), NESTED.matches('\n').count());
    assert!(text.chars().all(|c| c == ' ' || c == '\n'));

    let units: Vec<SyntaxNode> = root
        .children()
        .filter(|n| n.kind() == SyntaxKind::PROGRAM_UNIT)
        .collect();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].children().count(), 1);
    let marker = units[0].first_child().unwrap();
    assert_eq!(marker.kind(), SyntaxKind::ADAPTED_NODE);
    assert_eq!(marker.text_range(), units[0].text_range());
}

#[test]
fn adapted_nodes_resolve_to_their_legacy_units() {
    let adapted = adapt(SIBLINGS);
    let units = adapted.adapted_units();
    assert_eq!(units.len(), 2);

    let names: Vec<String> = units
        .iter()
        .map(|(_, context)| context.find_grammar_rule("program_name").unwrap().text())
        .collect();
    assert_eq!(names, ["FIRST", "SECOND"]);
    for (node, context) in &units {
        let start = context.start.as_ref().unwrap();
        assert!(node.syntax().text_range().contains_range(start.range));
    }
}

#[test]
fn adapted_outer_unit_is_not_confused_with_nested() {
    let adapted = adapt(NESTED);
    let units = adapted.adapted_units();
    assert_eq!(units.len(), 1);
    let (_, outer) = &units[0];
    assert_eq!(outer.find_grammar_rule("program_name").unwrap().text(), "OUTER");
    assert_eq!(outer.rules_of(&RuleKind::ProgramUnit).count(), 1);
}

#[test]
fn original_tree_is_untouched() {
    let result = parse(NESTED);
    let root = result.syntax();
    TreeAdapter::new(Arc::new(CharStream::new(NESTED)))
        .adapt(&root)
        .unwrap();
    assert_eq!(root.text().to_string(), NESTED);
}

#[test]
fn nested_units_move_into_their_parent() {
    let adapted = adapt(NESTED);
    let units: Vec<_> = adapted.program_units().collect();
    assert_eq!(units.len(), 1);

    let outer = units[0];
    let inner = outer.rules_of(&RuleKind::ProgramUnit).next().unwrap();
    let name = |unit: &cobol_cst::RuleContext| {
        unit.rules_of(&RuleKind::EndProgramStatement)
            .next()
            .and_then(|s| s.rules_of(&RuleKind::ProgramName).next())
            .map(|n| n.text())
    };
    assert_eq!(name(outer).as_deref(), Some("OUTER"));
    assert_eq!(name(inner).as_deref(), Some("INNER"));
    assert_eq!(inner.start.as_ref().unwrap().line(), 4);
}

#[test]
fn siblings_stay_in_order() {
    let adapted = adapt(SIBLINGS);
    let names: Vec<_> = adapted
        .program_units()
        .filter_map(|unit| unit.find_grammar_rule("program_name"))
        .map(|name| name.text())
        .collect();
    assert_eq!(names, ["FIRST", "SECOND"]);
}

#[test]
fn reparse_failure_is_tagged_and_siblings_convert() {
    let source = "ID DIVISION.\nPROGRAM-ID. A.\nDATA DIVISION.\nBOGUS STUFF.\nPROCEDURE DIVISION.\n    STOP RUN.\n";
    let result = parse(source);
    assert!(result.diagnostics.is_empty());

    let adapted = TreeAdapter::new(Arc::new(CharStream::new(source)))
        .adapt(&result.syntax())
        .unwrap();
    assert_eq!(adapted.diagnostics.len(), 1);
    let diagnostic = &adapted.diagnostics[0];
    assert_eq!(diagnostic.code, ErrorCode::E0401);
    assert_eq!(diagnostic.division, Some(DivisionKind::Data));
    assert_eq!((diagnostic.position.line, diagnostic.position.column), (3, 0));
    assert!(!adapted.ok());

    let unit = adapted.program_units().next().unwrap();
    let data = unit.find_grammar_rule("data_division").unwrap();
    assert!(data.exception.is_some());
    assert_eq!(data.text(), "DATA DIVISION . BOGUS STUFF .");
    assert!(unit.find_grammar_rule("identification_division").unwrap().exception.is_none());
    assert_eq!(unit.rules_of(&RuleKind::ProcedureDivision).count(), 1);
}

#[test]
fn empty_division_is_an_invariant_violation() {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SyntaxKind::SOURCE_UNIT.into());
    builder.start_node(SyntaxKind::PROGRAM_UNIT.into());
    builder.start_node(SyntaxKind::DATA_DIVISION.into());
    builder.token(SyntaxKind::WHITESPACE.into(), "  ");
    builder.finish_node();
    builder.token(SyntaxKind::WORD.into(), "X");
    builder.finish_node();
    builder.finish_node();
    let root = SyntaxNode::new_root(builder.finish());

    let error = TreeAdapter::new(Arc::new(CharStream::new("  X")))
        .adapt(&root)
        .unwrap_err();
    assert_eq!(
        error,
        AdapterError::MissingStartToken {
            construct: "DATA",
            offset: 0.into(),
        }
    );
}

#[test]
fn empty_program_unit_is_an_invariant_violation() {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SyntaxKind::SOURCE_UNIT.into());
    builder.start_node(SyntaxKind::PROGRAM_UNIT.into());
    builder.token(SyntaxKind::WHITESPACE.into(), "\n");
    builder.finish_node();
    builder.finish_node();
    let root = SyntaxNode::new_root(builder.finish());

    let error = TreeAdapter::new(Arc::new(CharStream::new("\n")))
        .adapt(&root)
        .unwrap_err();
    assert!(matches!(error, AdapterError::MissingStartToken { construct: "program unit", .. }));
}
