//! CST to legacy parse-tree adapter
//!
//! The analysis stage downstream consumes grammar-shaped parse trees. The
//! adapter produces them from the lossless CST:
//!
//! ```text
//! CST (SourceUnit)
//!     ↓  innermost program units first
//! ProgramUnit → RuleContext, unit text replaced by blanks
//!     ↓
//! Divisions:
//!   IDENTIFICATION / ENVIRONMENT / DATA → pest re-parse of
//!       (blank prefix + division text)
//!   PROCEDURE → ProcedureDivisionAdapter
//!     ↓
//! StartRule(CompilationUnit, <EOF>)
//! ```
//!
//! Every legacy token is stamped against one [`CharStream`] built from the
//! original text, so lines and columns in the legacy tree are those of the
//! source. Sub-grammar failures become diagnostics; a CST that breaks the
//! parser's invariants is an [`AdapterError`].

mod error;
mod grammar;
mod legacy;
mod procedure;
mod stream;

use std::sync::Arc;

use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange};
use rustc_hash::FxHashMap;

pub use error::AdapterError;
pub use grammar::{DivisionGrammar, Projection, ReparseFailure};
pub use legacy::{LegacyToken, ParseTree, RuleContext, RuleKind, Terminals, TokenType};
pub use procedure::{ProcedureDivisionAdapter, StructuralProcedureAdapter};
pub use stream::{CharStream, blank};

use crate::parser::{
    AdaptedNode, AstNode, Diagnostic, DivisionKind, ErrorCode, ProcedureDivision, ProgramUnit, Severity,
    SourceUnit, SyntaxKind, SyntaxNode, SyntaxToken,
};

/// Result of adapting one source unit
#[derive(Debug, Clone)]
pub struct AdaptedSourceUnit {
    /// `StartRule` context: the compilation unit followed by `<EOF>`
    pub tree: RuleContext,
    /// CST after every program unit was replaced by its adapted node
    pub green: GreenNode,
    /// Re-parse failures, in the order divisions were adapted
    pub diagnostics: Vec<Diagnostic>,
    pub stream: Arc<CharStream>,
}

impl AdaptedSourceUnit {
    pub fn compilation_unit(&self) -> Option<&RuleContext> {
        self.tree.rules_of(&RuleKind::CompilationUnit).next()
    }

    /// Top-level program units
    pub fn program_units(&self) -> impl Iterator<Item = &RuleContext> {
        self.compilation_unit()
            .into_iter()
            .flat_map(|unit| unit.rules_of(&RuleKind::ProgramUnit))
    }

    /// Root of the rewritten CST
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Adapted nodes of the rewritten CST, each with its legacy program unit
    pub fn adapted_units(&self) -> Vec<(AdaptedNode, &RuleContext)> {
        let Some(source) = SourceUnit::cast(self.root()) else {
            return Vec::new();
        };
        source
            .program_units()
            .filter_map(|unit| unit.adapted())
            .filter_map(|node| {
                let context = self.rule_context(&node)?;
                Some((node, context))
            })
            .collect()
    }

    /// Legacy program unit an adapted node stands for.
    ///
    /// The node covers the text of the unit it replaced; nested units start
    /// after their parent, so the earliest unit inside that range is the one.
    pub fn rule_context(&self, node: &AdaptedNode) -> Option<&RuleContext> {
        let range = node.syntax().text_range();
        let mut units = Vec::new();
        collect_units(&self.tree, &mut units);
        units
            .into_iter()
            .filter_map(|unit| {
                let start = unit.start.as_ref()?.range;
                range.contains_range(start).then_some((start.start(), unit))
            })
            .min_by_key(|(start, _)| *start)
            .map(|(_, unit)| unit)
    }

    /// Check if every division matched its grammar
    pub fn ok(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

/// Converts a CST into legacy parse trees
pub struct TreeAdapter<P = StructuralProcedureAdapter> {
    stream: Arc<CharStream>,
    procedure: P,
    diagnostics: Vec<Diagnostic>,
}

impl TreeAdapter {
    pub fn new(stream: Arc<CharStream>) -> Self {
        Self::with_procedure_adapter(stream, StructuralProcedureAdapter)
    }
}

impl<P: ProcedureDivisionAdapter> TreeAdapter<P> {
    pub fn with_procedure_adapter(stream: Arc<CharStream>, procedure: P) -> Self {
        Self {
            stream,
            procedure,
            diagnostics: Vec::new(),
        }
    }

    /// Adapt the tree rooted at `root`.
    ///
    /// `root` itself is left untouched; the rewritten CST is returned in
    /// [`AdaptedSourceUnit::root`].
    pub fn adapt(mut self, root: &SyntaxNode) -> Result<AdaptedSourceUnit, AdapterError> {
        // Preorder reversed: every nested unit comes before its parent
        let units: Vec<TextRange> = root
            .descendants()
            .filter(|node| node.kind() == SyntaxKind::PROGRAM_UNIT)
            .map(|node| node.text_range())
            .collect();

        let mut converted: FxHashMap<TextRange, RuleContext> = FxHashMap::default();
        let mut green = root.green().into_owned();
        for range in units.into_iter().rev() {
            let current = SyntaxNode::new_root(green.clone());
            let unit = current
                .descendants()
                .find(|node| node.kind() == SyntaxKind::PROGRAM_UNIT && node.text_range() == range)
                .ok_or(AdapterError::UnconvertedProgramUnit { range })?;
            let context = self.program_unit(&unit, &mut converted)?;
            converted.insert(range, context);
            green = rewrite_program_unit(&unit);
        }

        let current = SyntaxNode::new_root(green.clone());
        let tree = self.start_rule(root, &current, &mut converted)?;
        Ok(AdaptedSourceUnit {
            tree,
            green,
            diagnostics: self.diagnostics,
            stream: self.stream,
        })
    }

    fn start_rule(
        &self,
        original: &SyntaxNode,
        current: &SyntaxNode,
        converted: &mut FxHashMap<TextRange, RuleContext>,
    ) -> Result<RuleContext, AdapterError> {
        let mut compilation_unit = RuleContext::new(RuleKind::CompilationUnit);
        for element in current.children_with_tokens() {
            match element {
                NodeOrToken::Node(node) if node.kind() == SyntaxKind::PROGRAM_UNIT => {
                    let range = node.text_range();
                    let context = converted
                        .remove(&range)
                        .ok_or(AdapterError::UnconvertedProgramUnit { range })?;
                    compilation_unit.push_rule(context);
                }
                NodeOrToken::Node(node) => {
                    compilation_unit.push_rule(self.unrecognized(&node));
                }
                NodeOrToken::Token(token) if !token.kind().is_trivia() => {
                    compilation_unit.push_token(legacy_token(&self.stream, &token));
                }
                NodeOrToken::Token(_) => {}
            }
        }
        compilation_unit.bound_by_terminals();

        let mut start = RuleContext::new(RuleKind::StartRule);
        start.push_rule(compilation_unit);
        start.push_token(self.stream.eof());

        // Bounds come from the tree before any unit was blanked
        let mut tokens = significant_descendant_tokens(original);
        start.start = tokens.next().map(|token| legacy_token(&self.stream, &token));
        start.stop = tokens
            .last()
            .map(|token| legacy_token(&self.stream, &token))
            .or_else(|| start.start.clone());
        Ok(start)
    }

    fn program_unit(
        &mut self,
        unit: &SyntaxNode,
        converted: &mut FxHashMap<TextRange, RuleContext>,
    ) -> Result<RuleContext, AdapterError> {
        let offset = unit.text_range().start();
        let first = significant_descendant_tokens(unit)
            .next()
            .ok_or_else(|| AdapterError::missing_start("program unit", offset))?;
        let last = significant_descendant_tokens(unit)
            .last()
            .ok_or_else(|| AdapterError::missing_stop("program unit", offset))?;

        let start = legacy_token(&self.stream, &first);
        tracing::trace!(line = start.line(), column = start.column(), "adapting program unit");

        let mut context = RuleContext::new(RuleKind::ProgramUnit);
        let mut trailer: Vec<SyntaxToken> = Vec::new();
        for element in unit.children_with_tokens() {
            match element {
                NodeOrToken::Node(node) => {
                    if node.kind() == SyntaxKind::PROGRAM_UNIT {
                        let range = node.text_range();
                        let nested = converted
                            .remove(&range)
                            .ok_or(AdapterError::UnconvertedProgramUnit { range })?;
                        context.push_rule(nested);
                    } else if let Some(division) = DivisionKind::from_syntax_kind(node.kind()) {
                        let division = self.division(division, &node)?;
                        context.push_rule(division);
                    } else {
                        context.push_rule(self.unrecognized(&node));
                    }
                }
                NodeOrToken::Token(token) if !token.kind().is_trivia() => trailer.push(token),
                NodeOrToken::Token(_) => {}
            }
        }
        if !trailer.is_empty() {
            self.end_program(&mut context, trailer);
        }

        context.start = Some(start);
        context.stop = Some(legacy_token(&self.stream, &last));
        Ok(context)
    }

    /// Tokens directly under a unit: `END PROGRAM name .`, anything before
    /// `END` is unrecognized
    fn end_program(&self, unit: &mut RuleContext, tokens: Vec<SyntaxToken>) {
        let end = tokens
            .iter()
            .position(|token| token.text().eq_ignore_ascii_case("END"))
            .unwrap_or(tokens.len());
        let (stray, statement) = tokens.split_at(end);

        if !stray.is_empty() {
            let mut unrecognized = RuleContext::new(RuleKind::Unrecognized);
            for token in stray {
                unrecognized.push_token(legacy_token(&self.stream, token));
            }
            unrecognized.bound_by_terminals();
            unit.push_rule(unrecognized);
        }
        if statement.is_empty() {
            return;
        }

        let mut context = RuleContext::new(RuleKind::EndProgramStatement);
        let mut name = RuleContext::new(RuleKind::ProgramName);
        for (index, token) in statement.iter().enumerate() {
            let terminal = legacy_token(&self.stream, token);
            if index < 2 {
                context.push_token(terminal);
            } else if token.kind() == SyntaxKind::DOT {
                if !name.children.is_empty() {
                    name.bound_by_terminals();
                    context.push_rule(std::mem::replace(&mut name, RuleContext::new(RuleKind::ProgramName)));
                }
                context.push_token(terminal);
            } else {
                name.push_token(terminal);
            }
        }
        if !name.children.is_empty() {
            name.bound_by_terminals();
            context.push_rule(name);
        }
        context.bound_by_terminals();
        unit.push_rule(context);
    }

    fn division(&mut self, division: DivisionKind, node: &SyntaxNode) -> Result<RuleContext, AdapterError> {
        let offset = node.text_range().start();
        let first = significant_descendant_tokens(node)
            .next()
            .ok_or_else(|| AdapterError::missing_start(division.name(), offset))?;
        significant_descendant_tokens(node)
            .last()
            .ok_or_else(|| AdapterError::missing_stop(division.name(), offset))?;

        let Some(grammar) = DivisionGrammar::for_division(division) else {
            let procedure = ProcedureDivision::cast(node.clone())
                .ok_or_else(|| AdapterError::missing_start(division.name(), offset))?;
            return self.procedure.adapt(&procedure, &self.stream);
        };

        // Padding covers everything before the first token of the division
        let start = first.text_range().start();
        let prefix = self.stream.prefix(start);
        let text = node.text().to_string();
        let leading = usize::from(start - offset);
        let input = format!("{prefix}{}", text.get(leading..).unwrap_or_default());
        let projection = Projection::new(&self.stream, grammar, prefix.len(), start);

        match grammar.reparse(&input, &projection) {
            Ok(context) => {
                tracing::debug!(%division, rules = context.children.len(), "division re-parsed");
                Ok(context)
            }
            Err(failure) => {
                tracing::warn!(%division, offset = ?failure.offset, message = %failure.message, "division re-parse failed");
                self.report_failure(division, &failure);
                let mut context = RuleContext::grammar(grammar.name(), grammar.division_rule());
                for token in significant_descendant_tokens(node) {
                    context.push_token(legacy_token(&self.stream, &token));
                }
                context.bound_by_terminals();
                context.exception = Some(failure.message);
                Ok(context)
            }
        }
    }

    fn report_failure(&mut self, division: DivisionKind, failure: &ReparseFailure) {
        let position = self.stream.position(failure.offset);
        let diagnostic = Diagnostic::builder(ErrorCode::E0401)
            .message(format!("{division} does not match its grammar"))
            .range(TextRange::empty(failure.offset))
            .position(position)
            .severity(Severity::Error)
            .division(division)
            .hint(failure.message.clone())
            .build();
        self.diagnostics.push(diagnostic);
    }

    fn unrecognized(&self, node: &SyntaxNode) -> RuleContext {
        let mut context = RuleContext::new(RuleKind::Unrecognized);
        for token in significant_descendant_tokens(node) {
            context.push_token(legacy_token(&self.stream, &token));
        }
        context.bound_by_terminals();
        context
    }
}

/// Replace a program unit's children with one adapted node holding a blank
/// of the same length; returns the green root of the new tree
fn rewrite_program_unit(unit: &SyntaxNode) -> GreenNode {
    let blanked = blank(&unit.text().to_string());
    let whitespace = GreenToken::new(SyntaxKind::WHITESPACE.into(), &blanked);
    let adapted = GreenNode::new(SyntaxKind::ADAPTED_NODE.into(), [NodeOrToken::Token(whitespace)]);
    let replacement = GreenNode::new(SyntaxKind::PROGRAM_UNIT.into(), [NodeOrToken::Node(adapted)]);
    unit.replace_with(replacement)
}

fn collect_units<'a>(context: &'a RuleContext, units: &mut Vec<&'a RuleContext>) {
    for rule in context.rules() {
        if rule.kind == RuleKind::ProgramUnit {
            units.push(rule);
        }
        collect_units(rule, units);
    }
}

/// Name tokens of a unit's `END PROGRAM` trailer.
///
/// Looks for `END` among the unit's own tokens, skips the word after it and
/// collects what follows up to the period. Floating comments are skipped like
/// whitespace. `None` when there is no `END` or no name.
pub fn get_end_program_name(unit: &ProgramUnit) -> Option<Vec<SyntaxToken>> {
    let name: Vec<SyntaxToken> = significant_tokens(unit.syntax())
        .skip_while(|token| !token.text().eq_ignore_ascii_case("END"))
        .skip(2)
        .take_while(|token| token.kind() != SyntaxKind::DOT)
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Every token of the tree except whitespace, in legacy form, then `<EOF>`
pub fn adapt_tokens(root: &SyntaxNode, stream: &CharStream) -> Vec<LegacyToken> {
    root.descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .filter(|token| token.kind() != SyntaxKind::WHITESPACE)
        .map(|token| legacy_token(stream, &token))
        .chain(std::iter::once(stream.eof()))
        .collect()
}

pub(crate) fn legacy_token(stream: &CharStream, token: &SyntaxToken) -> LegacyToken {
    stream.token(TokenType::Syntax(token.kind()), token.text(), token.text_range())
}

/// Non-trivia tokens directly under `node`
pub(crate) fn significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .filter(|token| !token.kind().is_trivia())
}

fn significant_descendant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .filter(|token| !token.kind().is_trivia())
}
