//! Language-agnostic extraction interface for function-like constructs.
//!
//! This module provides:
//! - `SyntaxExtractor` trait: turns source text into raw construct candidates
//! - `LanguageRegistry`: extension-based extractor lookup, built once per process
//! - Tree-sitter implementations for the supported languages

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::model::Candidate;

pub mod names;

#[cfg(feature = "tree-sitter")]
pub mod treesitter;

#[cfg(feature = "tree-sitter")]
pub mod languages;

/// A named syntax query registered for a language.
///
/// Every capture named `name` marks a construct name; any other capture
/// marks a construct whose kind is the capture name. Captures starting with
/// `_` are helpers and carry no role.
#[derive(Debug, Clone, Copy)]
pub struct QuerySpec {
    /// Short label used in logs (e.g. "class_method").
    pub label: &'static str,
    /// Tree-sitter query source.
    pub source: &'static str,
}

/// Role of a single query capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRole<'a> {
    /// The capture is the construct's name.
    Name,
    /// The capture is a construct of the given kind.
    Construct(&'a str),
    /// Helper capture; ignored.
    Ignored,
}

impl<'a> CaptureRole<'a> {
    /// Classify a capture by its name.
    pub fn from_capture(capture_name: &'a str) -> Self {
        match capture_name {
            "name" => CaptureRole::Name,
            n if n.is_empty() || n.starts_with('_') => CaptureRole::Ignored,
            kind => CaptureRole::Construct(kind),
        }
    }
}

/// Errors raised while bringing up a language backend.
///
/// These never abort a scan; the affected language is left unregistered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageInitError {
    #[error("grammar for {language} failed to load: {message}")]
    Grammar {
        language: &'static str,
        message: String,
    },
    #[error("no query for {language} compiled")]
    NoQueries { language: &'static str },
}

/// Extractor trait for locating function-like constructs in one file.
pub trait SyntaxExtractor: Send + Sync {
    /// Return the language this extractor handles (e.g., "python").
    fn language(&self) -> &str;

    /// Labels of the queries that will run, in registration order.
    fn query_labels(&self) -> Vec<&'static str>;

    /// Extract raw, possibly duplicated candidates with names resolved.
    ///
    /// An error means the text could not be parsed at all; callers treat it
    /// as an empty result for the file.
    fn extract(&self, source: &str) -> anyhow::Result<Vec<Candidate>>;
}

/// Maps file extensions to extractors.
///
/// The registry holds no mutable state once built and can be shared freely
/// across threads.
#[derive(Clone, Default)]
pub struct LanguageRegistry {
    extractors: BTreeMap<String, Arc<dyn SyntaxExtractor>>,
    failures: Vec<LanguageInitError>,
}

impl LanguageRegistry {
    /// Build a registry with every language compiled into this binary.
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::empty();
        #[cfg(feature = "tree-sitter")]
        languages::register_all(&mut registry);
        registry
    }

    /// A registry with no languages. Scans using it skip function analysis.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register an extractor for a file extension.
    /// Extension should include the dot (e.g., ".py").
    pub fn register(&mut self, ext: &str, extractor: Arc<dyn SyntaxExtractor>) {
        self.extractors.insert(normalize_extension(ext), extractor);
    }

    /// Record a language that failed to initialize.
    pub fn record_failure(&mut self, error: LanguageInitError) {
        tracing::warn!(error = %error, "language backend unavailable");
        self.failures.push(error);
    }

    /// Compile a provider and register it for all of its extensions.
    ///
    /// A grammar group that fails is recorded and skipped; the remaining
    /// groups and languages are unaffected.
    #[cfg(feature = "tree-sitter")]
    pub fn register_provider(&mut self, provider: &dyn treesitter::LanguageProvider) {
        for grammar in provider.grammars() {
            match treesitter::TreeSitterExtractor::compile(provider, &grammar.language) {
                Ok(extractor) => {
                    let extractor: Arc<dyn SyntaxExtractor> = Arc::new(extractor);
                    for ext in grammar.extensions {
                        self.register(ext, Arc::clone(&extractor));
                    }
                }
                Err(e) => self.record_failure(e),
            }
        }
    }

    /// Get an extractor for the given extension ("py" or ".py", any case).
    pub fn for_extension(&self, ext: &str) -> Option<&dyn SyntaxExtractor> {
        self.extractors
            .get(&normalize_extension(ext))
            .map(|e| e.as_ref())
    }

    /// Get an extractor for a path based on its extension.
    pub fn for_path(&self, path: &Path) -> Option<&dyn SyntaxExtractor> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        self.for_extension(ext)
    }

    /// True iff at least one language initialized successfully.
    pub fn is_available(&self) -> bool {
        !self.extractors.is_empty()
    }

    /// Return all registered file extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        self.extractors.keys().map(|k| k.as_str()).collect()
    }

    /// Return the distinct registered languages, sorted.
    pub fn languages(&self) -> BTreeSet<&str> {
        self.extractors.values().map(|e| e.language()).collect()
    }

    /// Languages that failed to initialize.
    pub fn failures(&self) -> &[LanguageInitError] {
        &self.failures
    }
}

impl std::fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageRegistry")
            .field("extensions", &self.extensions())
            .field("failures", &self.failures)
            .finish()
    }
}

/// Lowercase an extension and make sure it carries a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
