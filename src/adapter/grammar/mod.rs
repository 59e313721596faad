//! Division sub-grammars
//!
//! The IDENTIFICATION, ENVIRONMENT and DATA divisions are re-parsed with pest
//! grammars that share `common.pest`. The input is the division text behind a
//! whitespace prefix that reproduces everything before the division, so pest
//! spans line up with the original lines and columns. Byte offsets are moved
//! back into the stream by a [`Projection`].

use pest::iterators::Pair;
use pest::{Parser, RuleType};
use rowan::{TextRange, TextSize};

use super::legacy::{ParseTree, RuleContext, TokenType};
use super::stream::CharStream;
use crate::parser::DivisionKind;

mod identification {
    #[derive(pest_derive::Parser)]
    #[grammar = "adapter/grammar/common.pest"]
    #[grammar = "adapter/grammar/identification.pest"]
    pub struct IdentificationGrammar;
}

mod environment {
    #[derive(pest_derive::Parser)]
    #[grammar = "adapter/grammar/common.pest"]
    #[grammar = "adapter/grammar/environment.pest"]
    pub struct EnvironmentGrammar;
}

mod data {
    #[derive(pest_derive::Parser)]
    #[grammar = "adapter/grammar/common.pest"]
    #[grammar = "adapter/grammar/data.pest"]
    pub struct DataGrammar;
}

/// A division that has its own grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DivisionGrammar {
    Identification,
    Environment,
    Data,
}

/// Why a division did not match its grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReparseFailure {
    pub message: String,
    /// Offset of the failure in the stream
    pub offset: TextSize,
}

impl DivisionGrammar {
    pub fn for_division(division: DivisionKind) -> Option<Self> {
        match division {
            DivisionKind::Identification => Some(Self::Identification),
            DivisionKind::Environment => Some(Self::Environment),
            DivisionKind::Data => Some(Self::Data),
            DivisionKind::Procedure => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Identification => "identification",
            Self::Environment => "environment",
            Self::Data => "data",
        }
    }

    /// Name of the rule that spans the whole division
    pub fn division_rule(self) -> &'static str {
        match self {
            Self::Identification => "identification_division",
            Self::Environment => "environment_division",
            Self::Data => "data_division",
        }
    }

    /// Parse padded division text into a legacy context
    pub fn reparse(self, input: &str, projection: &Projection<'_>) -> Result<RuleContext, ReparseFailure> {
        match self {
            Self::Identification => run::<identification::IdentificationGrammar, _>(
                identification::Rule::identification_unit,
                input,
                projection,
            ),
            Self::Environment => run::<environment::EnvironmentGrammar, _>(
                environment::Rule::environment_unit,
                input,
                projection,
            ),
            Self::Data => run::<data::DataGrammar, _>(data::Rule::data_unit, input, projection),
        }
    }
}

/// Moves offsets of the padded input back into the character stream
pub struct Projection<'a> {
    stream: &'a CharStream,
    grammar: DivisionGrammar,
    /// Length of the whitespace prefix in the padded input
    padding: usize,
    /// Stream offset of the division's first byte
    base: TextSize,
}

impl<'a> Projection<'a> {
    pub fn new(stream: &'a CharStream, grammar: DivisionGrammar, padding: usize, base: TextSize) -> Self {
        Self {
            stream,
            grammar,
            padding,
            base,
        }
    }

    pub fn offset(&self, input_offset: usize) -> TextSize {
        self.base + TextSize::new(input_offset.saturating_sub(self.padding) as u32)
    }

    fn range(&self, start: usize, end: usize) -> TextRange {
        TextRange::new(self.offset(start), self.offset(end))
    }
}

fn run<P, R>(rule: R, input: &str, projection: &Projection<'_>) -> Result<RuleContext, ReparseFailure>
where
    P: Parser<R>,
    R: RuleType,
{
    let mut pairs = P::parse(rule, input).map_err(|error| {
        let at = match error.location {
            pest::error::InputLocation::Pos(pos) => pos,
            pest::error::InputLocation::Span((start, _)) => start,
        };
        ReparseFailure {
            message: format!("{}", error.variant),
            offset: projection.offset(at),
        }
    })?;

    // unit = SOI ~ division ~ EOI; the division is the first inner pair
    let division = pairs
        .next()
        .and_then(|unit| unit.into_inner().next())
        .ok_or_else(|| ReparseFailure {
            message: "empty division".to_string(),
            offset: projection.base,
        })?;

    Ok(match build(division, projection) {
        ParseTree::Rule(context) => context,
        ParseTree::Terminal(token) => {
            let mut context = RuleContext::grammar(projection.grammar.name(), projection.grammar.division_rule());
            context.push_token(token);
            context.bound_by_terminals();
            context
        }
    })
}

/// Rules with inner pairs become contexts, leaves become terminals
fn build<R: RuleType>(pair: Pair<'_, R>, projection: &Projection<'_>) -> ParseTree {
    let rule = format!("{:?}", pair.as_rule());
    let span = pair.as_span();
    let mut inner = pair.into_inner().peekable();

    if inner.peek().is_none() {
        let range = projection.range(span.start(), span.end());
        return ParseTree::Terminal(projection.stream.token(
            TokenType::Grammar(rule.into()),
            span.as_str(),
            range,
        ));
    }

    let mut context = RuleContext::grammar(projection.grammar.name(), rule);
    for child in inner {
        context.children.push(build(child, projection));
    }
    context.bound_by_terminals();
    ParseTree::Rule(context)
}
