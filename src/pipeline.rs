//! Lex, parse and adapt one document.
//!
//! A [`Pipeline`] holds only settings. Every run builds its own lexer, parser,
//! adapter and character stream, so documents share no mutable state and
//! [`Pipeline::run_all`] can process them in parallel.

use std::sync::Arc;

use rayon::prelude::*;

use crate::adapter::{AdaptedSourceUnit, AdapterError, CharStream, TreeAdapter};
use crate::mapping::ExtendedDocument;
use crate::parser::{CobolLexer, CobolParser, Diagnostic, ParseResult, ParserSettings};

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The CST as parsed, before adaptation
    pub parse: ParseResult,
    pub adapted: AdaptedSourceUnit,
}

impl PipelineOutput {
    /// Parser diagnostics followed by re-parse diagnostics
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.parse.diagnostics.iter().chain(&self.adapted.diagnostics)
    }

    pub fn ok(&self) -> bool {
        self.parse.ok() && self.adapted.ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    settings: ParserSettings,
}

impl Pipeline {
    pub fn new(settings: ParserSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Run on plain source text
    pub fn run(&self, text: &str) -> Result<PipelineOutput, AdapterError> {
        self.run_with_stream(Arc::new(CharStream::new(text)))
    }

    /// Run on substituted text; legacy tokens carry their original locations
    pub fn run_document(&self, document: Arc<ExtendedDocument>) -> Result<PipelineOutput, AdapterError> {
        self.run_with_stream(Arc::new(CharStream::with_document(document)))
    }

    /// Run every document in parallel, results in input order
    pub fn run_all<T>(&self, documents: &[T]) -> Vec<Result<PipelineOutput, AdapterError>>
    where
        T: AsRef<str> + Sync,
    {
        tracing::debug!(documents = documents.len(), "pipeline batch");
        documents
            .par_iter()
            .map(|document| self.run(document.as_ref()))
            .collect()
    }

    fn run_with_stream(&self, stream: Arc<CharStream>) -> Result<PipelineOutput, AdapterError> {
        let parse = CobolParser::new(CobolLexer::new(stream.text()), self.settings.clone()).parse();
        tracing::trace!(diagnostics = parse.diagnostics.len(), "parsed");
        let adapted = TreeAdapter::new(stream).adapt(&parse.syntax())?;
        Ok(PipelineOutput { parse, adapted })
    }
}
