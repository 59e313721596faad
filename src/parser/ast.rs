//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for COBOL syntax nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.

use smol_str::SmolStr;

use super::division::DivisionKind;
use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Depth-first concatenation of every leaf below this node
    fn to_text(&self) -> String {
        self.syntax().text().to_string()
    }
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// Non-trivia tokens directly under `node`
fn significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
}

/// First direct token child, used as the name of headers
fn first_word(node: &SyntaxNode) -> Option<SyntaxToken> {
    significant_tokens(node).next().filter(|t| t.kind() == SyntaxKind::WORD)
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceUnit, SOURCE_UNIT);

impl SourceUnit {
    /// Top-level program units, in source order
    pub fn program_units(&self) -> impl Iterator<Item = ProgramUnit> + '_ {
        self.0.children().filter_map(ProgramUnit::cast)
    }
}

// ============================================================================
// Program units
// ============================================================================

ast_node!(ProgramUnit, PROGRAM_UNIT);

impl ProgramUnit {
    pub fn identification_division(&self) -> Option<IdentificationDivision> {
        self.0.children().find_map(IdentificationDivision::cast)
    }

    pub fn environment_division(&self) -> Option<EnvironmentDivision> {
        self.0.children().find_map(EnvironmentDivision::cast)
    }

    pub fn data_division(&self) -> Option<DataDivision> {
        self.0.children().find_map(DataDivision::cast)
    }

    pub fn procedure_division(&self) -> Option<ProcedureDivision> {
        self.0.children().find_map(ProcedureDivision::cast)
    }

    /// Division nodes in source order
    pub fn divisions(&self) -> impl Iterator<Item = (DivisionKind, SyntaxNode)> + '_ {
        self.0
            .children()
            .filter_map(|node| DivisionKind::from_syntax_kind(node.kind()).map(|kind| (kind, node)))
    }

    /// Program units declared inside this one
    pub fn nested_programs(&self) -> impl Iterator<Item = ProgramUnit> + '_ {
        self.0.children().filter_map(ProgramUnit::cast)
    }

    /// PROGRAM-ID name, without quotes
    pub fn name(&self) -> Option<SmolStr> {
        self.identification_division()?.program_id()?.name()
    }

    /// Replacement node left by adaptation
    pub fn adapted(&self) -> Option<AdaptedNode> {
        self.0.children().find_map(AdaptedNode::cast)
    }
}

// ============================================================================
// Divisions
// ============================================================================

ast_node!(IdentificationDivision, IDENTIFICATION_DIVISION);

impl IdentificationDivision {
    pub fn program_id(&self) -> Option<ProgramIdParagraph> {
        self.0.children().find_map(ProgramIdParagraph::cast)
    }
}

ast_node!(ProgramIdParagraph, PROGRAM_ID_PARAGRAPH);

impl ProgramIdParagraph {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.0)
            .skip_while(|t| t.kind() != SyntaxKind::DOT)
            .nth(1)
            .filter(|t| matches!(t.kind(), SyntaxKind::WORD | SyntaxKind::STRING_LITERAL))
    }

    pub fn name(&self) -> Option<SmolStr> {
        self.name_token()
            .map(|token| super::parser::program_name(token.text()))
    }
}

ast_node!(EnvironmentDivision, ENVIRONMENT_DIVISION);
ast_node!(DataDivision, DATA_DIVISION);

impl EnvironmentDivision {
    pub fn entries(&self) -> impl Iterator<Item = Sentence> + '_ {
        self.0.children().filter_map(Sentence::cast)
    }
}

impl DataDivision {
    pub fn entries(&self) -> impl Iterator<Item = Sentence> + '_ {
        self.0.children().filter_map(Sentence::cast)
    }
}

ast_node!(ProcedureDivision, PROCEDURE_DIVISION);

impl ProcedureDivision {
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.0.children().filter_map(Section::cast)
    }

    /// Every paragraph of the division, in source order
    pub fn paragraphs(&self) -> impl Iterator<Item = Paragraph> + '_ {
        self.0.children().filter_map(Paragraph::cast)
    }

    /// Sentences that precede every section and paragraph
    pub fn sentences(&self) -> impl Iterator<Item = Sentence> + '_ {
        self.0.children().filter_map(Sentence::cast)
    }

    /// Paragraphs that appear before the first section
    pub fn standalone_paragraphs(&self) -> Vec<Paragraph> {
        self.0
            .children()
            .take_while(|node| node.kind() != SyntaxKind::SECTION)
            .filter_map(Paragraph::cast)
            .collect()
    }

    /// Paragraphs owned by `section`: those following it up to the next section
    pub fn section_paragraphs(&self, section: &Section) -> Vec<Paragraph> {
        self.0
            .children()
            .skip_while(|node| node != section.syntax())
            .skip(1)
            .take_while(|node| node.kind() != SyntaxKind::SECTION)
            .filter_map(Paragraph::cast)
            .collect()
    }
}

// ============================================================================
// Procedure structure
// ============================================================================

ast_node!(Section, SECTION);

impl Section {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_word(&self.0)
    }

    pub fn name(&self) -> Option<SmolStr> {
        self.name_token().map(|t| SmolStr::new(t.text()))
    }

    pub fn sentences(&self) -> impl Iterator<Item = Sentence> + '_ {
        self.0.children().filter_map(Sentence::cast)
    }
}

ast_node!(Paragraph, PARAGRAPH);

impl Paragraph {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_word(&self.0)
    }

    pub fn name(&self) -> Option<SmolStr> {
        self.name_token().map(|t| SmolStr::new(t.text()))
    }

    pub fn sentences(&self) -> impl Iterator<Item = Sentence> + '_ {
        self.0.children().filter_map(Sentence::cast)
    }
}

ast_node!(Sentence, SENTENCE);

impl Sentence {
    pub fn tokens(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        significant_tokens(&self.0)
    }

    pub fn is_terminated(&self) -> bool {
        significant_tokens(&self.0)
            .last()
            .is_some_and(|t| t.kind() == SyntaxKind::DOT)
    }
}

ast_node!(AdaptedNode, ADAPTED_NODE);

// ============================================================================
// Any node or token
// ============================================================================

/// Every kind of CST element, typed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CstNode {
    SourceUnit(SourceUnit),
    ProgramUnit(ProgramUnit),
    IdentificationDivision(IdentificationDivision),
    ProgramIdParagraph(ProgramIdParagraph),
    EnvironmentDivision(EnvironmentDivision),
    DataDivision(DataDivision),
    ProcedureDivision(ProcedureDivision),
    Section(Section),
    Paragraph(Paragraph),
    Sentence(Sentence),
    AdaptedNode(AdaptedNode),
    /// Comment-entry paragraphs and error nodes
    Other(SyntaxNode),
    Token(SyntaxToken),
}

impl CstNode {
    pub fn from_node(node: SyntaxNode) -> Self {
        match node.kind() {
            SyntaxKind::SOURCE_UNIT => Self::SourceUnit(SourceUnit(node)),
            SyntaxKind::PROGRAM_UNIT => Self::ProgramUnit(ProgramUnit(node)),
            SyntaxKind::IDENTIFICATION_DIVISION => {
                Self::IdentificationDivision(IdentificationDivision(node))
            }
            SyntaxKind::PROGRAM_ID_PARAGRAPH => Self::ProgramIdParagraph(ProgramIdParagraph(node)),
            SyntaxKind::ENVIRONMENT_DIVISION => Self::EnvironmentDivision(EnvironmentDivision(node)),
            SyntaxKind::DATA_DIVISION => Self::DataDivision(DataDivision(node)),
            SyntaxKind::PROCEDURE_DIVISION => Self::ProcedureDivision(ProcedureDivision(node)),
            SyntaxKind::SECTION => Self::Section(Section(node)),
            SyntaxKind::PARAGRAPH => Self::Paragraph(Paragraph(node)),
            SyntaxKind::SENTENCE => Self::Sentence(Sentence(node)),
            SyntaxKind::ADAPTED_NODE => Self::AdaptedNode(AdaptedNode(node)),
            _ => Self::Other(node),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Token(token) => token.kind(),
            node => node.as_node().map(|n| n.kind()).unwrap_or(SyntaxKind::ERROR),
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        let node = match self {
            Self::SourceUnit(n) => n.syntax(),
            Self::ProgramUnit(n) => n.syntax(),
            Self::IdentificationDivision(n) => n.syntax(),
            Self::ProgramIdParagraph(n) => n.syntax(),
            Self::EnvironmentDivision(n) => n.syntax(),
            Self::DataDivision(n) => n.syntax(),
            Self::ProcedureDivision(n) => n.syntax(),
            Self::Section(n) => n.syntax(),
            Self::Paragraph(n) => n.syntax(),
            Self::Sentence(n) => n.syntax(),
            Self::AdaptedNode(n) => n.syntax(),
            Self::Other(n) => n,
            Self::Token(_) => return None,
        };
        Some(node)
    }

    /// Ordered children, tokens included
    pub fn children(&self) -> Vec<CstNode> {
        let Some(node) = self.as_node() else {
            return Vec::new();
        };
        node.children_with_tokens()
            .map(|element| match element {
                rowan::NodeOrToken::Node(node) => CstNode::from_node(node),
                rowan::NodeOrToken::Token(token) => CstNode::Token(token),
            })
            .collect()
    }

    pub fn to_text(&self) -> String {
        match self {
            Self::Token(token) => token.text().to_string(),
            node => node
                .as_node()
                .map(|n| n.text().to_string())
                .unwrap_or_default(),
        }
    }
}
