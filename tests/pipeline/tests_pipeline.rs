#![allow(clippy::unwrap_used)]

use cobol_cst::parser::{ErrorCode, ParserSettings};
use cobol_cst::{Pipeline, RuleContext};

use crate::helpers::source_fixtures::{FULL_PROGRAM, MINIMAL, NESTED, SECTST, SIBLINGS};

fn program_name(unit: &RuleContext) -> String {
    unit.find_grammar_rule("program_name").unwrap().text()
}

#[test]
fn batch_results_keep_input_order() {
    let documents = [FULL_PROGRAM, SECTST, MINIMAL, NESTED, SIBLINGS];
    let results = Pipeline::default().run_all(&documents);
    assert_eq!(results.len(), documents.len());

    let names: Vec<String> = results
        .iter()
        .map(|result| {
            let output = result.as_ref().unwrap();
            assert!(output.ok(), "{:?}", output.diagnostics().collect::<Vec<_>>());
            program_name(output.adapted.program_units().next().unwrap())
        })
        .collect();
    assert_eq!(names, ["PAYROLL", "SECTST", "MINIMAL", "OUTER", "FIRST"]);
}

#[test]
fn batch_matches_sequential_runs() {
    let documents: Vec<String> = (0..16)
        .map(|i| format!("ID DIVISION.\nPROGRAM-ID. P{i}.\nPROCEDURE DIVISION.\n    DISPLAY {i}.\n"))
        .collect();
    let pipeline = Pipeline::default();

    let batch = pipeline.run_all(&documents);
    for (document, result) in documents.iter().zip(batch) {
        let parallel = result.unwrap();
        let sequential = pipeline.run(document).unwrap();
        assert_eq!(parallel.adapted.tree, sequential.adapted.tree);
        assert_eq!(parallel.parse.tokens, sequential.parse.tokens);
    }
}

#[test]
fn diagnostics_from_both_stages() {
    let source = "ID DIVISION.\nPROGRAM-ID. A.\nDATA DIVISION.\nBOGUS STUFF.\nPROCEDURE DIVISION.\n    STOP RUN.\nEND PROGRAM B.\n";
    let output = Pipeline::default().run(source).unwrap();

    let codes: Vec<ErrorCode> = output.diagnostics().map(|d| d.code).collect();
    assert_eq!(codes, [ErrorCode::E0303, ErrorCode::E0401]);
    assert!(!output.ok());
}

#[test]
fn settings_reach_the_parser() {
    let source = "ID DIVISION.\nPROGRAM-ID. A.\nPROCEDURE DIVISION.\nCHECK.\n    EXIT.\n";

    let plain = Pipeline::default().run(source).unwrap();
    let units = plain.parse.source_unit().unwrap();
    let division = units.program_units().next().unwrap().procedure_division().unwrap();
    assert_eq!(division.paragraphs().count(), 1);

    let mut settings = ParserSettings::default();
    settings.statement_verbs.push("CHECK".into());
    let custom = Pipeline::new(settings).run(source).unwrap();
    let units = custom.parse.source_unit().unwrap();
    let division = units.program_units().next().unwrap().procedure_division().unwrap();
    assert_eq!(division.paragraphs().count(), 0);
}
