//! Procedure division projection
//!
//! The procedure division has no sub-grammar of its own; an implementation of
//! [`ProcedureDivisionAdapter`] turns its CST into legacy contexts directly.

use rowan::NodeOrToken;

use super::error::AdapterError;
use super::legacy::{RuleContext, RuleKind};
use super::stream::CharStream;
use super::{legacy_token, significant_tokens};
use crate::parser::{AstNode, ProcedureDivision, Sentence, SyntaxKind, SyntaxNode, SyntaxToken};

/// Converts a procedure division into its legacy context
pub trait ProcedureDivisionAdapter: Send + Sync {
    fn adapt(&self, division: &ProcedureDivision, stream: &CharStream) -> Result<RuleContext, AdapterError>;
}

/// Projects the header, sections, paragraphs and sentences as they appear in
/// the CST. Statements inside a sentence stay flat terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralProcedureAdapter;

impl ProcedureDivisionAdapter for StructuralProcedureAdapter {
    fn adapt(&self, division: &ProcedureDivision, stream: &CharStream) -> Result<RuleContext, AdapterError> {
        let node = division.syntax();
        let mut context = RuleContext::new(RuleKind::ProcedureDivision);

        let header = tokens_context(
            RuleKind::ProcedureDivisionHeader,
            significant_tokens(node),
            stream,
        );
        if header.start.is_none() {
            return Err(AdapterError::missing_start(
                "procedure division",
                node.text_range().start(),
            ));
        }
        context.push_rule(header);

        // Paragraphs after a section header belong to that section
        let mut section: Option<RuleContext> = None;
        for child in node.children() {
            let converted = match child.kind() {
                SyntaxKind::SECTION => {
                    if let Some(done) = section.take() {
                        context.push_rule(close(done));
                    }
                    section = Some(self.section(&child, stream)?);
                    continue;
                }
                SyntaxKind::PARAGRAPH => self.paragraph(&child, stream)?,
                SyntaxKind::SENTENCE => sentence(&child, stream),
                _ => tokens_context(RuleKind::Unrecognized, significant_descendants(&child), stream),
            };
            match section.as_mut() {
                Some(open) => open.push_rule(converted),
                None => context.push_rule(converted),
            }
        }
        if let Some(done) = section.take() {
            context.push_rule(close(done));
        }

        context.bound_by_terminals();
        tracing::trace!(
            sections = context.rules_of(&RuleKind::ProcedureSection).count(),
            "procedure division adapted"
        );
        Ok(context)
    }
}

impl StructuralProcedureAdapter {
    fn section(&self, node: &SyntaxNode, stream: &CharStream) -> Result<RuleContext, AdapterError> {
        let header = tokens_context(RuleKind::ProcedureSectionHeader, significant_tokens(node), stream);
        if header.start.is_none() {
            return Err(AdapterError::missing_start("section", node.text_range().start()));
        }
        let mut section = RuleContext::new(RuleKind::ProcedureSection);
        section.push_rule(header);
        for child in node.children() {
            section.push_rule(sentence(&child, stream));
        }
        Ok(section)
    }

    fn paragraph(&self, node: &SyntaxNode, stream: &CharStream) -> Result<RuleContext, AdapterError> {
        let mut tokens = significant_tokens(node);
        let name = tokens
            .next()
            .ok_or_else(|| AdapterError::missing_start("paragraph", node.text_range().start()))?;

        let mut paragraph = RuleContext::new(RuleKind::Paragraph);
        paragraph.push_rule(tokens_context(RuleKind::ParagraphName, [name], stream));
        for token in tokens {
            paragraph.push_token(legacy_token(stream, &token));
        }
        for child in node.children() {
            paragraph.push_rule(sentence(&child, stream));
        }
        paragraph.bound_by_terminals();
        Ok(paragraph)
    }
}

fn sentence(node: &SyntaxNode, stream: &CharStream) -> RuleContext {
    let tokens: Vec<SyntaxToken> = match Sentence::cast(node.clone()) {
        Some(sentence) => sentence.tokens().collect(),
        None => significant_descendants(node).collect(),
    };
    let kind = if node.kind() == SyntaxKind::SENTENCE {
        RuleKind::Sentence
    } else {
        RuleKind::Unrecognized
    };
    tokens_context(kind, tokens, stream)
}

fn close(mut section: RuleContext) -> RuleContext {
    section.bound_by_terminals();
    section
}

fn tokens_context(
    kind: RuleKind,
    tokens: impl IntoIterator<Item = SyntaxToken>,
    stream: &CharStream,
) -> RuleContext {
    let mut context = RuleContext::new(kind);
    for token in tokens {
        context.push_token(legacy_token(stream, &token));
    }
    context.bound_by_terminals();
    context
}

fn significant_descendants(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .filter(|token| !token.kind().is_trivia())
}
