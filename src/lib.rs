//! Algoscan - function inventory and algorithm classification.
//!
//! Algoscan walks a source tree, extracts every function-like construct
//! with tree-sitter queries, and scores each one on how likely it is to
//! implement nontrivial logic rather than plumbing.
//!
//! # Architecture
//!
//! - `parser`: language registry, tree-sitter query engine, per-language providers
//! - `dedup`: collapses candidates reported by overlapping queries
//! - `slice`: recovers a function's source text by line range
//! - `classify`: heuristic scoring against a configurable rule table
//! - `analyzer`: the per-file pipeline
//! - `scan`: repository traversal and scan byproducts
//! - `config`: YAML configuration
//! - `report`: output formatting (pretty, JSON)
//!
//! # Adding a New Language
//!
//! See `src/parser/languages/` for examples. Implement the
//! `LanguageProvider` trait and list it in `languages::providers`.

pub mod analyzer;
pub mod classify;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod model;
pub mod parser;
pub mod report;
pub mod scan;
pub mod slice;

pub use analyzer::Analyzer;
pub use classify::{Classification, Classifier, RuleTable};
pub use config::ScanConfig;
pub use dedup::dedup_candidates;
pub use model::{
    Candidate, ClassificationMode, FileAnalysis, FunctionRecord, LanguageStats,
    RepositoryAnalysis, Span,
};
pub use parser::{LanguageInitError, LanguageRegistry, SyntaxExtractor};
pub use scan::{ScanError, ScanResult, ScanWarning, Scanner};
pub use slice::extract_lines;

/// Analyze one file with every compiled-in language and the default rules.
///
/// Convenience entry point for ad hoc use outside a repository scan.
/// `content` overrides reading the file from disk.
pub fn analyze_single_file(
    path: &std::path::Path,
    content: Option<&str>,
    include_source: bool,
) -> Result<Option<FileAnalysis>, ScanError> {
    Analyzer::default()
        .include_source(include_source)
        .analyze_file(path, content)
}
