//! Context-sensitive COBOL lexer
//!
//! Tokens are produced on demand: the parser asks for the next token batch
//! and says which [`GrammarRule`] it expects. Word-level tokenization is done
//! by a logos-generated tokenizer; the comment-entry and picture modes are
//! hand-written because their token boundaries depend on the context, not on
//! the characters alone.
//!
//! Whitespace is never skipped. Every run of spaces and every newline becomes
//! its own [`SyntaxKind::WHITESPACE`] token so the source can be rebuilt
//! byte for byte from the token stream.

use logos::Logos;
use smol_str::SmolStr;

use super::context::{GrammarRule, LexMode};
use super::syntax_kind::SyntaxKind;
use crate::base::{Position, TextRange, TextSize};

/// A token with its kind, text, position and producing context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub text: SmolStr,
    pub position: Position,
    pub rule: GrammarRule,
}

impl Token {
    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    pub fn index(&self) -> u32 {
        self.position.index
    }

    pub fn range(&self) -> TextRange {
        TextRange::at(self.position.offset(), TextSize::of(self.text.as_str()))
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == SyntaxKind::WHITESPACE
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    pub fn is_newline(&self) -> bool {
        self.kind == SyntaxKind::WHITESPACE && self.text.ends_with('\n')
    }

    /// Case-insensitive comparison against a COBOL word
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == SyntaxKind::WORD && self.text.eq_ignore_ascii_case(word)
    }
}

/// Pull-based lexer over one character stream.
///
/// The lexer state is only the current position, so cloning it gives an
/// independent cursor for lookahead.
#[derive(Debug, Clone)]
pub struct CobolLexer<'a> {
    source: &'a str,
    position: Position,
}

impl<'a> CobolLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: Position::default(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Position of the next character to be lexed
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn has_more(&self) -> bool {
        (self.position.index as usize) < self.source.len()
    }

    /// Return the next token batch for `rule` without advancing.
    pub fn peek(&self, rule: GrammarRule) -> Vec<Token> {
        self.scan(rule)
    }

    /// Return the next token batch for `rule` and advance past it.
    pub fn forward(&mut self, rule: GrammarRule) -> Vec<Token> {
        let batch = self.scan(rule);
        if let Some(last) = batch.last() {
            self.position = last.position.advance(&last.text);
            tracing::trace!(
                ?rule,
                kind = ?last.kind,
                line = last.position.line,
                column = last.position.column,
                "lexed token"
            );
        }
        batch
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position.index as usize..]
    }

    fn scan(&self, rule: GrammarRule) -> Vec<Token> {
        let rest = self.rest();
        if rest.is_empty() {
            return Vec::new();
        }
        let (kind, len) = scan_trivia(rest).unwrap_or_else(|| match rule.lex_mode() {
            LexMode::Word => scan_word(rest),
            LexMode::Sentence => scan_sentence(rest),
            LexMode::CommentEntry => (SyntaxKind::COMMENT_ENTRY, line_len(rest)),
            LexMode::Picture => scan_picture(rest),
        });
        vec![Token {
            kind,
            text: SmolStr::new(&rest[..len]),
            position: self.position,
            rule,
        }]
    }
}

/// Tokenize a whole string in a single context
pub fn tokenize(input: &str, rule: GrammarRule) -> Vec<Token> {
    let mut lexer = CobolLexer::new(input);
    let mut tokens = Vec::new();
    while lexer.has_more() {
        tokens.extend(lexer.forward(rule));
    }
    tokens
}

fn scan_trivia(rest: &str) -> Option<(SyntaxKind, usize)> {
    if rest.starts_with("\r\n") {
        return Some((SyntaxKind::WHITESPACE, 2));
    }
    if rest.starts_with('\n') || rest.starts_with('\r') {
        return Some((SyntaxKind::WHITESPACE, 1));
    }
    let spaces = rest
        .bytes()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\x0C'))
        .count();
    (spaces > 0).then_some((SyntaxKind::WHITESPACE, spaces))
}

fn scan_word(rest: &str) -> (SyntaxKind, usize) {
    let mut lexer = RawToken::lexer(rest);
    match lexer.next() {
        // A word never ends in a hyphen; the hyphens lex on their own
        Some(Ok(RawToken::Word)) => {
            let word = rest[..lexer.span().end].trim_end_matches('-');
            (SyntaxKind::WORD, word.len())
        }
        Some(Ok(raw)) => (raw.into(), lexer.span().end),
        Some(Err(())) | None => (SyntaxKind::ERROR, first_char_len(rest)),
    }
}

fn scan_sentence(rest: &str) -> (SyntaxKind, usize) {
    let (kind, len) = scan_word(rest);
    if kind != SyntaxKind::WORD || !rest[..len].bytes().all(|b| b.is_ascii_digit()) {
        return (kind, len);
    }
    let fraction = rest[len..]
        .strip_prefix('.')
        .map(|after| after.bytes().take_while(u8::is_ascii_digit).count())
        .unwrap_or(0);
    if fraction > 0 {
        (SyntaxKind::NUMERIC_LITERAL, len + 1 + fraction)
    } else {
        (SyntaxKind::NUMERIC_LITERAL, len)
    }
}

fn scan_picture(rest: &str) -> (SyntaxKind, usize) {
    let mut end = 0;
    for (offset, ch) in rest.char_indices() {
        if matches!(ch, ' ' | '\t' | '\x0C' | '\r' | '\n') {
            break;
        }
        if matches!(ch, '.' | ',' | ';') {
            let separator = rest[offset + 1..]
                .chars()
                .next()
                .is_none_or(char::is_whitespace);
            if separator {
                break;
            }
        }
        end = offset + ch.len_utf8();
    }
    if end == 0 {
        scan_word(rest)
    } else {
        (SyntaxKind::PICTURE_STRING, end)
    }
}

fn line_len(rest: &str) -> usize {
    rest.find(['\r', '\n']).unwrap_or(rest.len())
}

fn first_char_len(rest: &str) -> usize {
    rest.chars().next().map(char::len_utf8).unwrap_or(0)
}

/// Logos token enum for word mode - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum RawToken {
    #[regex(r"\*>[^\r\n]*")]
    Comment,

    #[regex(r"[A-Za-z0-9_][A-Za-z0-9_-]*")]
    Word,

    #[regex(r"[XxNnZzGgBb]?'([^'\r\n]|'')*'")]
    #[regex(r#"[XxNnZzGgBb]?"([^"\r\n]|"")*""#)]
    StringLiteral,

    /// A quote with no closing partner on the same line, up to the line end
    #[regex(r"[XxNnZzGgBb]?'([^'\r\n]|'')*")]
    #[regex(r#"[XxNnZzGgBb]?"([^"\r\n]|"")*"#)]
    UnclosedQuote,

    #[token("**")]
    StarStar,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<>")]
    LtGt,

    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&")]
    Amp,
}

impl From<RawToken> for SyntaxKind {
    fn from(token: RawToken) -> Self {
        use RawToken::*;
        match token {
            Comment => SyntaxKind::COMMENT,
            Word => SyntaxKind::WORD,
            StringLiteral => SyntaxKind::STRING_LITERAL,
            UnclosedQuote => SyntaxKind::ERROR,
            StarStar => SyntaxKind::STAR_STAR,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            LtGt => SyntaxKind::LT_GT,
            Dot => SyntaxKind::DOT,
            Comma => SyntaxKind::COMMA,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Amp => SyntaxKind::AMP,
        }
    }
}
