//! Parse trees in the shape the grammar-driven analysis stage consumes.
//!
//! A [`RuleContext`] is one applied grammar rule: its kind, the first and last
//! token it covers, and its ordered children. Leaves are [`LegacyToken`]s
//! whose positions are always in the coordinates of the original source.

use std::fmt;

use rowan::TextRange;
use smol_str::SmolStr;

use crate::base::Position;
use crate::mapping::Location;
use crate::parser::SyntaxKind;

/// What a legacy token was lexed as
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Copied from a CST token
    Syntax(SyntaxKind),
    /// Leaf rule of a division grammar
    Grammar(SmolStr),
    /// End of input
    Eof,
}

/// A leaf of a legacy parse tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyToken {
    pub ty: TokenType,
    pub text: SmolStr,
    /// Line/column/index in the character stream
    pub position: Position,
    pub range: TextRange,
    /// Where the token was written, when the stream carries a mapping
    pub origin: Option<Location>,
}

impl LegacyToken {
    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    pub fn is_eof(&self) -> bool {
        self.ty == TokenType::Eof
    }
}

/// The grammar rule a context was produced by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKind {
    StartRule,
    CompilationUnit,
    ProgramUnit,
    EndProgramStatement,
    ProgramName,
    ProcedureDivision,
    ProcedureDivisionHeader,
    ProcedureSection,
    ProcedureSectionHeader,
    Paragraph,
    ParagraphName,
    Sentence,
    /// Text no construct could claim
    Unrecognized,
    /// A rule of one of the division grammars
    Grammar { grammar: &'static str, rule: SmolStr },
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grammar { grammar, rule } => write!(f, "{grammar}::{rule}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A child of a rule context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree {
    Rule(RuleContext),
    Terminal(LegacyToken),
}

impl ParseTree {
    pub fn as_rule(&self) -> Option<&RuleContext> {
        match self {
            Self::Rule(rule) => Some(rule),
            Self::Terminal(_) => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&LegacyToken> {
        match self {
            Self::Terminal(token) => Some(token),
            Self::Rule(_) => None,
        }
    }
}

/// One applied rule with its token bounds and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleContext {
    pub kind: RuleKind,
    pub start: Option<LegacyToken>,
    pub stop: Option<LegacyToken>,
    pub children: Vec<ParseTree>,
    /// Message of a failed division re-parse
    pub exception: Option<String>,
}

impl RuleContext {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            start: None,
            stop: None,
            children: Vec::new(),
            exception: None,
        }
    }

    pub fn grammar(grammar: &'static str, rule: impl Into<SmolStr>) -> Self {
        Self::new(RuleKind::Grammar {
            grammar,
            rule: rule.into(),
        })
    }

    pub fn push_rule(&mut self, rule: RuleContext) {
        self.children.push(ParseTree::Rule(rule));
    }

    pub fn push_token(&mut self, token: LegacyToken) {
        self.children.push(ParseTree::Terminal(token));
    }

    /// Set start and stop from the first and last terminal below this context
    pub fn bound_by_terminals(&mut self) {
        self.start = self.terminals().next().cloned();
        self.stop = self.terminals().last().cloned();
    }

    /// Direct child contexts
    pub fn rules(&self) -> impl Iterator<Item = &RuleContext> {
        self.children.iter().filter_map(ParseTree::as_rule)
    }

    /// Direct child contexts of `kind`
    pub fn rules_of<'a>(&'a self, kind: &'a RuleKind) -> impl Iterator<Item = &'a RuleContext> + 'a {
        self.rules().filter(move |rule| &rule.kind == kind)
    }

    /// Depth-first search for the first context whose grammar rule is `name`
    pub fn find_grammar_rule(&self, name: &str) -> Option<&RuleContext> {
        if matches!(&self.kind, RuleKind::Grammar { rule, .. } if rule == name) {
            return Some(self);
        }
        self.rules().find_map(|child| child.find_grammar_rule(name))
    }

    /// Every leaf below this context, in order
    pub fn terminals(&self) -> Terminals<'_> {
        Terminals {
            stack: vec![self.children.iter()],
        }
    }

    /// Leaf texts joined by single spaces
    pub fn text(&self) -> String {
        self.terminals()
            .filter(|t| !t.is_eof())
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn has_exception(&self) -> bool {
        self.exception.is_some() || self.rules().any(RuleContext::has_exception)
    }

    /// Indented outline of the tree, one context or terminal per line
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.kind.to_string());
        if let Some(exception) = &self.exception {
            out.push_str(&format!(" !{exception}"));
        }
        out.push('\n');
        for child in &self.children {
            match child {
                ParseTree::Rule(rule) => rule.write_tree(out, depth + 1),
                ParseTree::Terminal(token) => {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str(&format!("{:?}\n", token.text.as_str()));
                }
            }
        }
    }
}

/// Depth-first iterator over the leaves of a context
pub struct Terminals<'a> {
    stack: Vec<std::slice::Iter<'a, ParseTree>>,
}

impl<'a> Iterator for Terminals<'a> {
    type Item = &'a LegacyToken;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let children = self.stack.last_mut()?;
            match children.next() {
                Some(ParseTree::Terminal(token)) => return Some(token),
                Some(ParseTree::Rule(rule)) => self.stack.push(rule.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
