//! Lexer tests through the public pull API

#![allow(clippy::unwrap_used)]

use cobol_cst::parser::{CobolLexer, GrammarRule, SyntaxKind, tokenize};
use rstest::rstest;

#[test]
fn mixed_case_identification_header() {
    let tokens = tokenize("Id DIVISION. PROGRAM-ID. Pr1.", GrammarRule::IdentificationDivision);
    let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        texts,
        ["Id", " ", "DIVISION", ".", " ", "PROGRAM-ID", ".", " ", "Pr1", "."]
    );
}

#[test]
fn forward_consumes_all_input() {
    let source = "Id DIVISION. PROGRAM-ID. Pr1.";
    let mut lexer = CobolLexer::new(source);
    let mut count = 0;
    while lexer.has_more() {
        assert!(!lexer.forward(GrammarRule::IdentificationDivision).is_empty());
        count += 1;
    }
    assert_eq!(count, 10);
    assert!(lexer.forward(GrammarRule::IdentificationDivision).is_empty());
}

#[rstest]
#[case(GrammarRule::ProgramUnit)]
#[case(GrammarRule::Sentence)]
#[case(GrammarRule::CommentEntry)]
#[case(GrammarRule::PictureString)]
fn peek_is_idempotent(#[case] rule: GrammarRule) {
    let mut lexer = CobolLexer::new("05 A PIC 9(3)V9.\n");
    let first = lexer.peek(rule);
    for _ in 0..3 {
        assert_eq!(lexer.peek(rule), first);
    }
    let forwarded = lexer.forward(rule);
    assert_eq!(forwarded, first);
    let consumed: usize = forwarded.iter().map(|t| t.text.len()).sum();
    assert_eq!(lexer.position().index as usize, consumed);
}

#[test]
fn positions_are_monotonic() {
    let source = "A B\n  C\r\nD";
    let tokens = tokenize(source, GrammarRule::ProgramUnit);
    for pair in tokens.windows(2) {
        assert!(pair[1].index() > pair[0].index());
        if pair[0].is_newline() {
            assert_eq!(pair[1].line(), pair[0].line() + 1);
            assert_eq!(pair[1].column(), 0);
        }
    }
    let last = tokens.last().unwrap();
    assert_eq!((last.text.as_str(), last.line(), last.column()), ("D", 2, 0));
}

#[rstest]
#[case(GrammarRule::ProgramUnit, "1.5", &[SyntaxKind::WORD, SyntaxKind::DOT, SyntaxKind::WORD])]
#[case(GrammarRule::Sentence, "1.5", &[SyntaxKind::NUMERIC_LITERAL])]
#[case(GrammarRule::PictureString, "S9(3)V99", &[SyntaxKind::PICTURE_STRING])]
#[case(GrammarRule::CommentEntry, "J. SMITH, ACCOUNTING.", &[SyntaxKind::COMMENT_ENTRY])]
#[case(GrammarRule::ProgramUnit, "X'0A' *> c", &[SyntaxKind::STRING_LITERAL, SyntaxKind::WHITESPACE, SyntaxKind::COMMENT])]
fn kinds_depend_on_context(#[case] rule: GrammarRule, #[case] input: &str, #[case] expected: &[SyntaxKind]) {
    let kinds: Vec<_> = tokenize(input, rule).iter().map(|t| t.kind).collect();
    assert_eq!(kinds, expected);
}

#[test]
fn column_counts_characters() {
    let tokens = tokenize("'É' X", GrammarRule::ProgramUnit);
    let x = tokens.last().unwrap();
    assert_eq!(x.column(), 4);
    assert_eq!(x.index(), 5);
}
