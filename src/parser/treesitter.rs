//! Tree-sitter based extractor implementation.
//!
//! This module provides a generic tree-sitter extractor that is configured
//! for each language by a [`LanguageProvider`].

use std::collections::BTreeMap;

use regex::Regex;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser as TsParser, Query, QueryCursor};

use super::names::{recover_name, resolve_name, NameCapture};
use super::{CaptureRole, LanguageInitError, QuerySpec, SyntaxExtractor};
use crate::model::{Candidate, Span, ANONYMOUS};

/// A grammar together with the extensions parsed by it.
pub struct Grammar {
    pub extensions: &'static [&'static str],
    pub language: Language,
}

/// Declarative description of one supported language.
///
/// Adding a language means adding one implementation of this trait and
/// listing it in `languages::providers`.
pub trait LanguageProvider: Send + Sync {
    /// Returns the language identifier (e.g., "python").
    fn language_id(&self) -> &'static str;

    /// Grammars for this language, each with the extensions it handles.
    fn grammars(&self) -> Vec<Grammar>;

    /// Construct queries in priority order. When several queries report the
    /// same span, the earlier query's kind is kept.
    fn queries(&self) -> &'static [QuerySpec];

    /// Regex fallbacks for names, first capture group is the name.
    fn name_patterns(&self) -> &'static [Regex];

    /// Words a fallback pattern may capture that are never names.
    fn reserved_words(&self) -> &'static [&'static str] {
        &[]
    }
}

struct CompiledQuery {
    label: &'static str,
    query: Query,
}

/// Tree-sitter based extractor for one grammar.
pub struct TreeSitterExtractor {
    language_id: &'static str,
    language: Language,
    queries: Vec<CompiledQuery>,
    name_patterns: &'static [Regex],
    reserved_words: &'static [&'static str],
}

impl TreeSitterExtractor {
    /// Load the grammar and compile every query of the provider.
    ///
    /// Queries that fail to compile are skipped; the extractor is only
    /// rejected when the grammar itself is unusable or nothing compiled.
    pub fn compile(
        provider: &dyn LanguageProvider,
        language: &Language,
    ) -> Result<Self, LanguageInitError> {
        let language_id = provider.language_id();

        TsParser::new()
            .set_language(language)
            .map_err(|e| LanguageInitError::Grammar {
                language: language_id,
                message: e.to_string(),
            })?;

        let mut queries = Vec::with_capacity(provider.queries().len());
        for spec in provider.queries() {
            match Query::new(language, spec.source) {
                Ok(query) => queries.push(CompiledQuery {
                    label: spec.label,
                    query,
                }),
                Err(e) => {
                    tracing::warn!(
                        language = language_id,
                        query = spec.label,
                        error = %e,
                        "query failed to compile, skipping"
                    );
                }
            }
        }

        if queries.is_empty() {
            return Err(LanguageInitError::NoQueries {
                language: language_id,
            });
        }

        tracing::debug!(
            language = language_id,
            queries = queries.len(),
            "language backend ready"
        );

        Ok(Self {
            language_id,
            language: language.clone(),
            queries,
            name_patterns: provider.name_patterns(),
            reserved_words: provider.reserved_words(),
        })
    }

    /// Parse source code and return the tree.
    fn parse(&self, source: &[u8]) -> anyhow::Result<tree_sitter::Tree> {
        let mut parser = TsParser::new();
        parser.set_language(&self.language)?;
        parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse source"))
    }
}

/// A construct match before name resolution.
struct RawConstruct {
    span: Span,
    kind: String,
    query: &'static str,
}

impl SyntaxExtractor for TreeSitterExtractor {
    fn language(&self) -> &str {
        self.language_id
    }

    fn query_labels(&self) -> Vec<&'static str> {
        self.queries.iter().map(|q| q.label).collect()
    }

    fn extract(&self, source: &str) -> anyhow::Result<Vec<Candidate>> {
        let bytes = source.as_bytes();
        let tree = self.parse(bytes)?;
        let root = tree.root_node();

        // First pass: every query, every capture. Names are collected for
        // the whole file before any construct is resolved because a name can
        // be reported by a different query than its construct.
        let mut constructs = Vec::new();
        let mut names: BTreeMap<Span, String> = BTreeMap::new();

        for compiled in &self.queries {
            let capture_names = compiled.query.capture_names();
            let mut cursor = QueryCursor::new();
            let mut matches = cursor.matches(&compiled.query, root, bytes);

            while let Some(m) = matches.next() {
                for capture in m.captures {
                    let span = Span::from_node(capture.node);
                    match CaptureRole::from_capture(capture_names[capture.index as usize]) {
                        CaptureRole::Name => {
                            let text = capture.node.utf8_text(bytes).unwrap_or("").trim();
                            if !text.is_empty() {
                                names.entry(span).or_insert_with(|| text.to_string());
                            }
                        }
                        CaptureRole::Construct(kind) => constructs.push(RawConstruct {
                            span,
                            kind: kind.to_string(),
                            query: compiled.label,
                        }),
                        CaptureRole::Ignored => {}
                    }
                }
            }
        }

        // Second pass: attach names. BTreeMap order is start-byte order,
        // which resolve_name relies on.
        let names: Vec<NameCapture> = names
            .into_iter()
            .map(|(span, text)| NameCapture { span, text })
            .collect();
        let mut spans: Vec<Span> = constructs.iter().map(|raw| raw.span).collect();
        spans.sort();
        spans.dedup();

        let candidates = constructs
            .into_iter()
            .map(|raw| {
                let name = match resolve_name(&raw.span, &names, &spans) {
                    Some(n) => n.to_string(),
                    None => {
                        let text = source.get(raw.span.start_byte..raw.span.end_byte).unwrap_or("");
                        recover_name(text, self.name_patterns, self.reserved_words)
                            .unwrap_or_else(|| ANONYMOUS.to_string())
                    }
                };
                Candidate {
                    name,
                    kind: raw.kind,
                    span: raw.span,
                    query: raw.query,
                }
            })
            .collect();

        Ok(candidates)
    }
}
