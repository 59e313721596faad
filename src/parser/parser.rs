//! Recursive descent parser for COBOL
//!
//! Pulls tokens from the [`CobolLexer`] one context at a time and builds a
//! rowan GreenNode tree. Every token the lexer returns, whitespace included,
//! is placed in the tree, so the CST text is always the input text.
//!
//! Structure problems never stop the parser; they become [`Diagnostic`]s and
//! the tree is built as far as the tokens allow.

use rowan::{GreenNode, GreenNodeBuilder, TextRange};
use smol_str::SmolStr;

use super::context::GrammarRule;
use super::division::DivisionKind;
use super::errors::{Diagnostic, ErrorCode, Severity};
use super::lexer::{CobolLexer, Token};
use super::settings::ParserSettings;
use super::syntax_kind::{SyntaxKind, SyntaxNode};
use super::ast::{AstNode, SourceUnit};
use crate::base::Position;

/// Paragraphs of the IDENTIFICATION DIVISION whose bodies are comment entries
const COMMENT_ENTRY_PARAGRAPHS: &[&str] = &[
    "AUTHOR",
    "INSTALLATION",
    "DATE-WRITTEN",
    "DATE-COMPILED",
    "SECURITY",
    "REMARKS",
];

/// Words allowed between the program name and the closing period of PROGRAM-ID
const PROGRAM_ID_ATTRIBUTES: &[&str] = &["IS", "COMMON", "INITIAL", "RECURSIVE", "PROGRAM"];

/// Parse result containing the green tree, diagnostics and consumed tokens
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub green: GreenNode,
    pub diagnostics: Vec<Diagnostic>,
    /// Every token the parser consumed, in source order
    pub tokens: Vec<Token>,
}

impl ParseResult {
    /// Get the root syntax node
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn source_unit(&self) -> Option<SourceUnit> {
        SourceUnit::cast(self.syntax())
    }

    /// Check if parsing produced no error-severity diagnostics
    pub fn ok(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Reconstructed source text
    pub fn text(&self) -> String {
        self.syntax().text().to_string()
    }
}

/// Parse COBOL source with default settings
pub fn parse(input: &str) -> ParseResult {
    CobolParser::new(CobolLexer::new(input), ParserSettings::default()).parse()
}

/// Name and location of the PROGRAM-ID of an open program unit
#[derive(Debug, Clone, Default)]
struct ProgramIdentity {
    name: Option<SmolStr>,
    range: Option<TextRange>,
}

/// The parser state
pub struct CobolParser<'a> {
    lexer: CobolLexer<'a>,
    settings: ParserSettings,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Vec<Diagnostic>,
    tokens: Vec<Token>,
    /// Innermost program unit last
    programs: Vec<ProgramIdentity>,
    truncated: bool,
}

impl<'a> CobolParser<'a> {
    pub fn new(lexer: CobolLexer<'a>, settings: ParserSettings) -> Self {
        Self {
            lexer,
            settings,
            builder: GreenNodeBuilder::new(),
            diagnostics: Vec::new(),
            tokens: Vec::new(),
            programs: Vec::new(),
            truncated: false,
        }
    }

    pub fn parse(mut self) -> ParseResult {
        self.parse_source_unit();
        self.finish()
    }

    fn finish(mut self) -> ParseResult {
        if self.truncated {
            let position = self.lexer.position();
            self.diagnostics.push(
                Diagnostic::builder(ErrorCode::E0902)
                    .message("too many diagnostics, later ones were dropped")
                    .position(position)
                    .severity(Severity::Hint)
                    .build(),
            );
        }
        ParseResult {
            green: self.builder.finish(),
            diagnostics: self.diagnostics,
            tokens: self.tokens,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn at_eof(&self) -> bool {
        !self.lexer.has_more()
    }

    fn current(&self, rule: GrammarRule) -> Option<Token> {
        self.lexer.peek(rule).into_iter().next()
    }

    /// The next `n` non-trivia tokens, lexed in `rule`, without advancing
    fn lookahead(&self, rule: GrammarRule, n: usize) -> Vec<Token> {
        let mut lexer = self.lexer.clone();
        let mut significant = Vec::with_capacity(n);
        while significant.len() < n && lexer.has_more() {
            significant.extend(lexer.forward(rule).into_iter().filter(|t| !t.is_trivia()));
        }
        significant.truncate(n);
        significant
    }

    fn nth(&self, rule: GrammarRule, n: usize) -> Option<Token> {
        self.lookahead(rule, n + 1).into_iter().nth(n)
    }

    fn at_word(&self, rule: GrammarRule, word: &str) -> bool {
        self.nth(rule, 0).is_some_and(|t| t.is_word(word))
    }

    fn at_kind(&self, rule: GrammarRule, kind: SyntaxKind) -> bool {
        self.nth(rule, 0).is_some_and(|t| t.kind == kind)
    }

    /// `<division-name> DIVISION` at the next significant token
    fn division_header_at(&self) -> Option<DivisionKind> {
        let next = self.lookahead(GrammarRule::ProgramUnit, 2);
        match next.as_slice() {
            [name, division] if name.kind == SyntaxKind::WORD && division.is_word("DIVISION") => {
                DivisionKind::from_header_word(&name.text)
            }
            _ => None,
        }
    }

    fn at_division_header(&self) -> bool {
        self.division_header_at().is_some()
    }

    fn at_end_program(&self) -> bool {
        let next = self.lookahead(GrammarRule::EndProgram, 2);
        matches!(next.as_slice(), [end, program] if end.is_word("END") && program.is_word("PROGRAM"))
    }

    /// Any token that closes the construct currently being parsed
    fn at_unit_boundary(&self) -> bool {
        self.at_eof() || self.at_division_header() || self.at_end_program()
    }

    fn at_section_header(&self) -> bool {
        let next = self.lookahead(GrammarRule::Section, 2);
        matches!(next.as_slice(), [name, section] if name.kind == SyntaxKind::WORD && section.is_word("SECTION"))
    }

    fn at_paragraph_header(&self) -> bool {
        let next = self.lookahead(GrammarRule::Paragraph, 2);
        match next.as_slice() {
            [name, dot] => {
                name.kind == SyntaxKind::WORD
                    && dot.kind == SyntaxKind::DOT
                    && !self.settings.is_statement_verb(&name.text)
            }
            _ => false,
        }
    }

    fn at_identification_paragraph(&self) -> bool {
        let next = self.lookahead(GrammarRule::IdentificationDivision, 2);
        match next.as_slice() {
            [name, dot] if dot.kind == SyntaxKind::DOT => {
                name.is_word("PROGRAM-ID") || is_comment_entry_keyword(name)
            }
            _ => false,
        }
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Consume the next token batch for `rule` into the tree
    fn bump(&mut self, rule: GrammarRule) -> Option<Token> {
        let batch = self.lexer.forward(rule);
        let mut last = None;
        for token in batch {
            self.builder.token(token.kind.into(), token.text.as_str());
            if token.kind == SyntaxKind::ERROR {
                self.report_opaque(&token);
            }
            self.tokens.push(token.clone());
            last = Some(token);
        }
        last
    }

    fn bump_trivia(&mut self, rule: GrammarRule) {
        while self.current(rule).is_some_and(|t| t.is_trivia()) {
            self.bump(rule);
        }
    }

    /// Consume trivia, then the next token if it is `word`
    fn eat_word(&mut self, rule: GrammarRule, word: &str) -> bool {
        if self.at_word(rule, word) {
            self.bump_trivia(rule);
            self.bump(rule);
            true
        } else {
            false
        }
    }

    /// Consume trivia and a separator period, reporting a missing one
    fn expect_dot(&mut self, rule: GrammarRule, after: &str) -> bool {
        if self.at_kind(rule, SyntaxKind::DOT) {
            self.bump_trivia(rule);
            self.bump(rule);
            true
        } else {
            self.error_here(ErrorCode::E0201, format!("expected '.' after {after}"));
            false
        }
    }

    /// Force-skip a token when a loop iteration made no progress
    fn ensure_progress(&mut self, before: Position, rule: GrammarRule) {
        if self.lexer.position() == before && !self.at_eof() {
            let text = self
                .current(rule)
                .map(|t| t.text.to_string())
                .unwrap_or_default();
            self.error_here(ErrorCode::E0901, format!("unexpected '{text}'"));
            self.bump(rule);
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        match self.settings.max_diagnostics {
            Some(max) if self.diagnostics.len() >= max => self.truncated = true,
            _ => self.diagnostics.push(diagnostic),
        }
    }

    fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, token: &Token) {
        let diagnostic = Diagnostic::builder(code)
            .message(message)
            .range(token.range())
            .position(token.position)
            .build();
        self.push_diagnostic(diagnostic);
    }

    /// Report at the next significant token, or at the current position
    fn error_here(&mut self, code: ErrorCode, message: impl Into<String>) {
        match self.nth(GrammarRule::ProgramUnit, 0) {
            Some(token) => self.error_at(code, message, &token),
            None => {
                let position = self.lexer.position();
                let diagnostic = Diagnostic::builder(code)
                    .message(message)
                    .position(position)
                    .build();
                self.push_diagnostic(diagnostic);
            }
        }
    }

    fn report_opaque(&mut self, token: &Token) {
        let literal = token
            .text
            .trim_start_matches(['X', 'x', 'N', 'n', 'Z', 'z', 'G', 'g', 'B', 'b']);
        if literal.starts_with(['\'', '"']) {
            self.error_at(ErrorCode::E0102, "alphanumeric literal is not closed", token);
        } else {
            self.error_at(
                ErrorCode::E0101,
                format!("unrecognized character sequence '{}'", token.text),
                token,
            );
        }
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceUnit = ProgramUnit*
    fn parse_source_unit(&mut self) {
        self.start_node(SyntaxKind::SOURCE_UNIT);
        loop {
            let before = self.lexer.position();
            self.bump_trivia(GrammarRule::ProgramUnit);
            if self.at_eof() {
                break;
            }
            self.parse_program_unit();
            self.ensure_progress(before, GrammarRule::ProgramUnit);
        }
        self.finish_node();
    }

    /// ProgramUnit = IdentificationDivision EnvironmentDivision? DataDivision?
    ///               ProcedureDivision? ProgramUnit* EndProgram?
    fn parse_program_unit(&mut self) {
        self.start_node(SyntaxKind::PROGRAM_UNIT);
        let start = self.nth(GrammarRule::ProgramUnit, 0);
        self.programs.push(ProgramIdentity::default());
        tracing::trace!(depth = self.programs.len(), "program unit start");

        let mut seen: Vec<DivisionKind> = Vec::new();
        loop {
            let before = self.lexer.position();
            self.bump_trivia(GrammarRule::ProgramUnit);
            if self.at_eof() {
                break;
            }
            if self.at_end_program() {
                if self.end_program_closes_enclosing() {
                    break;
                }
                self.parse_end_program();
                break;
            }
            match self.division_header_at() {
                Some(DivisionKind::Identification) if !seen.is_empty() => {
                    self.parse_program_unit();
                }
                Some(division) => {
                    self.check_division_order(division, &seen);
                    seen.push(division);
                    self.parse_division(division);
                }
                None => self.parse_stray_sentence(GrammarRule::ProgramUnit),
            }
            self.ensure_progress(before, GrammarRule::ProgramUnit);
        }

        if !seen.contains(&DivisionKind::Identification) {
            let message = "program unit has no IDENTIFICATION DIVISION";
            match start {
                Some(token) => self.error_at(ErrorCode::E0204, message, &token),
                None => self.error_here(ErrorCode::E0204, message),
            }
        }
        self.programs.pop();
        self.finish_node();
    }

    fn check_division_order(&mut self, division: DivisionKind, seen: &[DivisionKind]) {
        let Some(token) = self.nth(GrammarRule::ProgramUnit, 0) else {
            return;
        };
        let severity = self.settings.division_order_severity();
        let diagnostic = if seen.contains(&division) {
            Diagnostic::builder(ErrorCode::E0203).message(format!("duplicate {division}"))
        } else if seen.iter().any(|prev| *prev > division) {
            Diagnostic::builder(ErrorCode::E0202).message(format!("{division} is out of order"))
        } else {
            return;
        };
        let diagnostic = diagnostic
            .range(token.range())
            .position(token.position)
            .severity(severity)
            .build();
        self.push_diagnostic(diagnostic);
    }

    /// An `END PROGRAM` naming an enclosing program, not the current one,
    /// closes the current unit without being consumed.
    fn end_program_closes_enclosing(&self) -> bool {
        let Some((current, enclosing)) = self.programs.split_last() else {
            return false;
        };
        let Some(name) = self.nth(GrammarRule::EndProgram, 2).map(|t| program_name(&t.text)) else {
            return false;
        };
        let names_match = |identity: &ProgramIdentity| {
            identity
                .name
                .as_ref()
                .is_some_and(|n| n.eq_ignore_ascii_case(&name))
        };
        !names_match(current) && enclosing.iter().any(names_match)
    }

    /// EndProgram = 'END' 'PROGRAM' name '.'
    fn parse_end_program(&mut self) {
        let rule = GrammarRule::EndProgram;
        self.bump_trivia(rule);
        self.bump(rule);
        self.eat_word(rule, "PROGRAM");

        let name = self
            .nth(rule, 0)
            .filter(|t| matches!(t.kind, SyntaxKind::WORD | SyntaxKind::STRING_LITERAL));
        match name {
            Some(_) => {
                self.bump_trivia(rule);
                if let Some(token) = self.bump(rule) {
                    self.check_end_program_name(&token);
                }
            }
            None => self.error_here(ErrorCode::E0304, "expected a program name after END PROGRAM"),
        }
        self.expect_dot(rule, "END PROGRAM");
        self.bump_trivia(GrammarRule::ProgramUnit);
    }

    fn check_end_program_name(&mut self, token: &Token) {
        let Some(identity) = self.programs.last().cloned() else {
            return;
        };
        let Some(expected) = identity.name else {
            return;
        };
        let found = program_name(&token.text);
        if found.eq_ignore_ascii_case(&expected) {
            return;
        }
        let mut builder = Diagnostic::builder(ErrorCode::E0303)
            .message(format!("END PROGRAM {found} does not match PROGRAM-ID {expected}"))
            .range(token.range())
            .position(token.position)
            .hint(format!("use END PROGRAM {expected}"));
        if let Some(range) = identity.range {
            builder = builder.related("PROGRAM-ID declared here", range);
        }
        self.push_diagnostic(builder.build());
    }

    fn parse_division(&mut self, division: DivisionKind) {
        let rule = division_rule(division);
        self.start_node(division.syntax_kind());
        tracing::debug!(%division, line = self.lexer.position().line, "division start");

        self.bump_trivia(rule);
        self.bump(rule);
        self.eat_word(rule, "DIVISION");
        if division == DivisionKind::Procedure
            && (self.at_word(rule, "USING") || self.at_word(rule, "RETURNING"))
        {
            self.parse_header_phrase(rule);
        }
        self.expect_dot(rule, &division.to_string());

        match division {
            DivisionKind::Identification => self.parse_identification_body(),
            DivisionKind::Environment => self.parse_sentence_body(rule, false),
            DivisionKind::Data => self.parse_sentence_body(rule, true),
            DivisionKind::Procedure => self.parse_procedure_body(),
        }
        self.finish_node();
    }

    /// `USING ...` and `RETURNING ...` up to the header period
    fn parse_header_phrase(&mut self, rule: GrammarRule) {
        while !self.at_kind(rule, SyntaxKind::DOT) && !self.at_unit_boundary() {
            self.bump_trivia(rule);
            if self.at_eof() {
                break;
            }
            self.bump(rule);
        }
    }

    fn parse_identification_body(&mut self) {
        let rule = GrammarRule::IdentificationDivision;
        let header = self.tokens.iter().rev().find(|t| !t.is_trivia()).cloned();
        let mut has_program_id = false;
        loop {
            let before = self.lexer.position();
            self.bump_trivia(rule);
            if self.at_unit_boundary() {
                break;
            }
            if self.at_word(rule, "PROGRAM-ID") {
                has_program_id = true;
                self.parse_program_id();
            } else if self.at_identification_paragraph() {
                self.parse_comment_entry_paragraph();
            } else {
                self.parse_stray_sentence(rule);
            }
            self.ensure_progress(before, rule);
        }
        if !has_program_id {
            let message = "IDENTIFICATION DIVISION has no PROGRAM-ID paragraph";
            match header {
                Some(token) => self.error_at(ErrorCode::E0301, message, &token),
                None => self.error_here(ErrorCode::E0301, message),
            }
        }
    }

    /// ProgramId = 'PROGRAM-ID' '.' name ('IS'? attribute* 'PROGRAM'?) '.'
    fn parse_program_id(&mut self) {
        let rule = GrammarRule::IdentificationDivision;
        self.start_node(SyntaxKind::PROGRAM_ID_PARAGRAPH);
        self.bump_trivia(rule);
        self.bump(rule);
        self.expect_dot(rule, "PROGRAM-ID");

        let name = self.nth(rule, 0).filter(|t| {
            matches!(t.kind, SyntaxKind::WORD | SyntaxKind::STRING_LITERAL)
        });
        match name {
            Some(token) if !self.at_division_header() => {
                self.bump_trivia(rule);
                self.bump(rule);
                tracing::debug!(name = %token.text, "program-id");
                if let Some(identity) = self.programs.last_mut() {
                    identity.name = Some(program_name(&token.text));
                    identity.range = Some(token.range());
                }
                while PROGRAM_ID_ATTRIBUTES.iter().any(|word| self.at_word(rule, word)) {
                    self.bump_trivia(rule);
                    self.bump(rule);
                }
                self.expect_dot(rule, "the program name");
            }
            _ => self.error_here(ErrorCode::E0302, "expected a program name after PROGRAM-ID"),
        }
        self.finish_node();
    }

    /// CommentEntryParagraph = keyword '.' comment-entry*
    fn parse_comment_entry_paragraph(&mut self) {
        let rule = GrammarRule::IdentificationDivision;
        self.start_node(SyntaxKind::COMMENT_ENTRY_PARAGRAPH);
        self.bump_trivia(rule);
        self.bump(rule);
        self.expect_dot(rule, "the paragraph name");

        while let Some(token) = self.current(GrammarRule::CommentEntry) {
            if token.is_whitespace() {
                self.bump(GrammarRule::CommentEntry);
                continue;
            }
            if self.at_division_header() || self.at_end_program() || self.at_identification_paragraph() {
                break;
            }
            self.bump(GrammarRule::CommentEntry);
        }
        self.finish_node();
    }

    /// Period-terminated entries of the ENVIRONMENT and DATA divisions
    fn parse_sentence_body(&mut self, rule: GrammarRule, pictures: bool) {
        loop {
            let before = self.lexer.position();
            self.bump_trivia(rule);
            if self.at_unit_boundary() {
                break;
            }
            self.parse_sentence(GrammarRule::Sentence, SyntaxKind::SENTENCE, pictures);
            self.ensure_progress(before, rule);
        }
    }

    fn parse_procedure_body(&mut self) {
        let rule = GrammarRule::ProcedureDivision;
        loop {
            let before = self.lexer.position();
            self.bump_trivia(rule);
            if self.at_unit_boundary() {
                break;
            }
            if self.at_section_header() {
                self.parse_section();
            } else if self.at_paragraph_header() {
                self.parse_paragraph();
            } else {
                self.parse_sentence(GrammarRule::Sentence, SyntaxKind::SENTENCE, false);
            }
            self.ensure_progress(before, rule);
        }
    }

    /// Section = name 'SECTION' priority? '.' Sentence*
    fn parse_section(&mut self) {
        let rule = GrammarRule::Section;
        self.start_node(SyntaxKind::SECTION);
        self.bump_trivia(rule);
        if let Some(name) = self.bump(rule) {
            tracing::debug!(name = %name.text, line = name.line(), "section");
        }
        self.eat_word(rule, "SECTION");
        if self
            .nth(rule, 0)
            .is_some_and(|t| t.kind == SyntaxKind::WORD && t.text.bytes().all(|b| b.is_ascii_digit()))
        {
            self.bump_trivia(rule);
            self.bump(rule);
        }
        self.expect_dot(rule, "the section header");
        self.parse_procedure_sentences();
        self.finish_node();
    }

    /// Paragraph = name '.' Sentence*
    fn parse_paragraph(&mut self) {
        let rule = GrammarRule::Paragraph;
        self.start_node(SyntaxKind::PARAGRAPH);
        self.bump_trivia(rule);
        if let Some(name) = self.bump(rule) {
            tracing::debug!(name = %name.text, line = name.line(), "paragraph");
        }
        self.expect_dot(rule, "the paragraph name");
        self.parse_procedure_sentences();
        self.finish_node();
    }

    /// Sentences up to the next section, paragraph or division boundary
    fn parse_procedure_sentences(&mut self) {
        let rule = GrammarRule::ProcedureDivision;
        loop {
            let before = self.lexer.position();
            self.bump_trivia(rule);
            if self.at_unit_boundary() || self.at_section_header() || self.at_paragraph_header() {
                break;
            }
            self.parse_sentence(GrammarRule::Sentence, SyntaxKind::SENTENCE, false);
            self.ensure_progress(before, rule);
        }
    }

    /// Tokens outside of any construct, up to the next period
    fn parse_stray_sentence(&mut self, rule: GrammarRule) {
        self.error_here(ErrorCode::E0901, format!("unexpected text {}", rule.description()));
        self.parse_sentence(rule, SyntaxKind::ERROR_NODE, false);
    }

    /// Sentence = token* '.'
    ///
    /// Stops early, without a period, before a division header or
    /// `END PROGRAM` once at least one token has been consumed. With
    /// `pictures`, the operand of a PIC clause is lexed as a picture string.
    fn parse_sentence(&mut self, rule: GrammarRule, kind: SyntaxKind, pictures: bool) {
        self.start_node(kind);
        let mut consumed = false;
        let mut terminated = false;
        while let Some(token) = self.current(rule) {
            if token.is_trivia() {
                self.bump(rule);
                continue;
            }
            if consumed && (self.at_division_header() || self.at_end_program()) {
                break;
            }
            consumed = true;
            if token.kind == SyntaxKind::DOT {
                self.bump(rule);
                terminated = true;
                break;
            }
            let is_picture = pictures && (token.is_word("PIC") || token.is_word("PICTURE"));
            self.bump(rule);
            if is_picture {
                self.eat_word(rule, "IS");
                self.bump_trivia(GrammarRule::PictureString);
                if self
                    .current(GrammarRule::PictureString)
                    .is_some_and(|t| t.kind == SyntaxKind::PICTURE_STRING)
                {
                    self.bump(GrammarRule::PictureString);
                }
            }
        }
        if consumed && !terminated && kind == SyntaxKind::SENTENCE {
            self.error_here(ErrorCode::E0201, "expected '.' at the end of the sentence");
        }
        self.finish_node();
    }
}

fn division_rule(division: DivisionKind) -> GrammarRule {
    match division {
        DivisionKind::Identification => GrammarRule::IdentificationDivision,
        DivisionKind::Environment => GrammarRule::EnvironmentDivision,
        DivisionKind::Data => GrammarRule::DataDivision,
        DivisionKind::Procedure => GrammarRule::ProcedureDivision,
    }
}

fn is_comment_entry_keyword(token: &Token) -> bool {
    COMMENT_ENTRY_PARAGRAPHS.iter().any(|word| token.is_word(word))
}

/// Program name as written, without the quotes of a literal name
pub(crate) fn program_name(text: &str) -> SmolStr {
    let unquoted = text
        .strip_prefix(['\'', '"'])
        .and_then(|rest| rest.strip_suffix(['\'', '"']))
        .unwrap_or(text);
    SmolStr::new(unquoted)
}
