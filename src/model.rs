//! Data model for function inventories.
//!
//! Every structure here is created fresh per scan and never mutated once it
//! has been returned to the caller. Maps are `BTreeMap` so serialized output
//! does not depend on hash iteration order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name assigned when neither structural nor fallback name resolution succeeds.
pub const ANONYMOUS: &str = "anonymous";

/// Divisor used to map an unbounded classifier score into `[0, 1]`.
pub const SCORE_SCALE: f64 = 10.0;

/// Source location span with byte offsets and 1-indexed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// End line (1-indexed), never less than `start_line`.
    pub end_line: usize,
}

impl Span {
    pub fn new(start_byte: usize, end_byte: usize, start_line: usize, end_line: usize) -> Self {
        Self {
            start_byte,
            end_byte,
            start_line,
            end_line: end_line.max(start_line),
        }
    }

    /// Create a span from a tree-sitter node.
    #[cfg(feature = "tree-sitter")]
    pub fn from_node(node: tree_sitter::Node) -> Self {
        // tree-sitter rows are 0-indexed
        Self::new(
            node.start_byte(),
            node.end_byte(),
            node.start_position().row + 1,
            node.end_position().row + 1,
        )
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        other.start_byte >= self.start_byte && other.end_byte <= self.end_byte
    }

    /// Number of lines covered, at least 1.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_line, self.end_line)
    }
}

/// An unresolved match produced directly by one syntax query.
///
/// Candidates may repeat: several queries can report the same construct.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Resolved name, or [`ANONYMOUS`].
    pub name: String,
    /// Construct kind declared by the query capture (e.g. "method").
    pub kind: String,
    pub span: Span,
    /// Label of the query that produced the match.
    pub query: &'static str,
}

/// One detected function, method, or class-as-container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_line: usize,
    pub end_line: usize,
    pub line_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    pub is_algorithm: bool,
    /// Classifier score floored at zero; unbounded above.
    pub algorithm_score: f64,
    pub classification_reason: String,
}

impl FunctionRecord {
    /// Create an unclassified record covering `start_line..=end_line`.
    pub fn new(name: impl Into<String>, kind: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        let end_line = end_line.max(start_line);
        Self {
            name: name.into(),
            kind: kind.into(),
            start_line,
            end_line,
            line_count: end_line - start_line + 1,
            source_text: None,
            is_algorithm: false,
            algorithm_score: 0.0,
            classification_reason: String::new(),
        }
    }

    /// The `(start_line, end_line)` pair used as the deduplication key.
    pub fn span_key(&self) -> (usize, usize) {
        (self.start_line, self.end_line)
    }

    /// Whether the name could not be resolved.
    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS
    }

    /// Score clamped into `[0, 1]` for storage layers that expect a ratio.
    pub fn persisted_score(&self) -> f64 {
        (self.algorithm_score / SCORE_SCALE).clamp(0.0, 1.0)
    }
}

/// Which signals the classifier had available for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Source slices were extracted; every signal group applied.
    Full,
    /// No source text; only name and size signals applied.
    NameOnly,
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationMode::Full => write!(f, "full"),
            ClassificationMode::NameOnly => write!(f, "name_only"),
        }
    }
}

/// Analysis of one scanned file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: String,
    pub language: String,
    pub function_count: usize,
    pub algorithm_count: usize,
    /// Ordered by `start_line` ascending.
    pub functions: Vec<FunctionRecord>,
    pub breakdown: BTreeMap<String, usize>,
    pub algorithm_breakdown: BTreeMap<String, usize>,
    pub classification_mode: ClassificationMode,
    /// Set when the extractor failed on this file; `functions` is then empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl FileAnalysis {
    /// Build a file analysis from classified records, deriving every count.
    pub fn new(
        path: impl Into<String>,
        language: impl Into<String>,
        functions: Vec<FunctionRecord>,
        classification_mode: ClassificationMode,
    ) -> Self {
        let mut breakdown = BTreeMap::new();
        let mut algorithm_breakdown = BTreeMap::new();
        let mut algorithm_count = 0;

        for func in &functions {
            *breakdown.entry(func.kind.clone()).or_insert(0) += 1;
            if func.is_algorithm {
                algorithm_count += 1;
                *algorithm_breakdown.entry(func.kind.clone()).or_insert(0) += 1;
            }
        }

        Self {
            path: path.into(),
            language: language.into(),
            function_count: functions.len(),
            algorithm_count,
            functions,
            breakdown,
            algorithm_breakdown,
            classification_mode,
            parse_error: None,
        }
    }

    /// An empty analysis for a file the extractor could not process.
    pub fn failed(
        path: impl Into<String>,
        language: impl Into<String>,
        classification_mode: ClassificationMode,
        error: impl Into<String>,
    ) -> Self {
        let mut analysis = Self::new(path, language, Vec::new(), classification_mode);
        analysis.parse_error = Some(error.into());
        analysis
    }

    /// Iterate over the functions classified as algorithmic.
    pub fn algorithms(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.functions.iter().filter(|f| f.is_algorithm)
    }
}

/// Per-language tallies within a repository analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub files: usize,
    pub functions: usize,
    pub algorithms: usize,
}

/// Aggregate over all analyzed files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryAnalysis {
    pub total_functions: usize,
    pub total_algorithms: usize,
    pub total_files: usize,
    pub languages: BTreeMap<String, LanguageStats>,
    pub files: Vec<FileAnalysis>,
}

impl RepositoryAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one file, keeping totals and per-language tallies consistent.
    pub fn add_file(&mut self, analysis: FileAnalysis) {
        self.total_files += 1;
        self.total_functions += analysis.function_count;
        self.total_algorithms += analysis.algorithm_count;

        let stats = self.languages.entry(analysis.language.clone()).or_default();
        stats.files += 1;
        stats.functions += analysis.function_count;
        stats.algorithms += analysis.algorithm_count;

        self.files.push(analysis);
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: RepositoryAnalysis) {
        for file in other.files {
            self.add_file(file);
        }
    }

    /// Whether the per-language tallies sum to the totals.
    pub fn is_consistent(&self) -> bool {
        let (files, functions, algorithms) = self
            .languages
            .values()
            .fold((0, 0, 0), |(f, fu, a), s| (f + s.files, fu + s.functions, a + s.algorithms));

        files == self.total_files
            && functions == self.total_functions
            && algorithms == self.total_algorithms
            && self.total_files == self.files.len()
    }
}
