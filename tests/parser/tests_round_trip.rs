//! Lossless reconstruction of arbitrary input

use cobol_cst::parser::{CstNode, parse};
use rstest::rstest;

use crate::helpers::source_fixtures::{FULL_PROGRAM, NESTED, SECTST, SIBLINGS};

#[rstest]
#[case::sectst(SECTST)]
#[case::full_program(FULL_PROGRAM)]
#[case::nested(NESTED)]
#[case::siblings(SIBLINGS)]
#[case::empty("")]
#[case::crlf("ID DIVISION.\r\nPROGRAM-ID. A.\r\n")]
#[case::tabs_and_form_feed("ID\tDIVISION.\x0C\nPROGRAM-ID.\tA.")]
#[case::garbage("§§ ??? 'unclosed\n\"also\n")]
#[case::no_divisions("DISPLAY 'X'. STOP RUN.")]
#[case::comments("*> header\nID DIVISION. *> trailing\nPROGRAM-ID. A.\n*> end")]
#[case::unicode("ID DIVISION.\nPROGRAM-ID. A.\nAUTHOR. Ünïcödé Ñame.\n")]
fn text_is_reconstructed_exactly(#[case] source: &str) {
    let result = parse(source);
    assert_eq!(result.text(), source);

    let root = CstNode::from_node(result.syntax());
    assert_eq!(root.to_text(), source);

    let consumed: String = result.tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(consumed, source);
}
