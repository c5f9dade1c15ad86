//! Repository scanning.
//!
//! The scanner walks a source tree, prunes ignored directories before
//! descending into them, and runs the per-file analyzer on every eligible
//! file. Individual file failures are recorded as warnings; only an
//! invalid root aborts a scan.

pub mod summary;
pub mod tree;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::analyzer::{read_text, Analyzer};
use crate::classify::Classifier;
use crate::config::ScanConfig;
use crate::model::{FileAnalysis, RepositoryAnalysis};
use crate::parser::{normalize_extension, LanguageRegistry};

pub use summary::{category_for, count_by_category, file_section, BANNER_WIDTH};

/// Errors raised while scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root {} does not exist or is not a directory", .0.display())]
    InvalidRoot(PathBuf),

    #[error("invalid exclude pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    Decode { path: PathBuf },

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A non-fatal problem with one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanWarning {
    pub path: String,
    pub message: String,
}

/// Everything a scan produces.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Eligible files in traversal order.
    pub file_paths: Vec<PathBuf>,
    /// File counts per category plus `total`.
    pub file_counts: BTreeMap<String, usize>,
    pub directory_tree: String,
    /// Every readable file wrapped in a `FILE:` banner.
    pub file_contents: String,
    /// Unicode scalar values across all readable files.
    pub total_characters: usize,
    /// `None` when no language backend is available.
    pub function_analysis: Option<RepositoryAnalysis>,
    pub warnings: Vec<ScanWarning>,
}

/// Per-file output, produced in any order and folded in traversal order.
struct FileOutcome {
    relative: String,
    content: Result<String, ScanError>,
    analysis: Option<FileAnalysis>,
}

/// Walks a repository and analyzes every eligible file.
pub struct Scanner {
    config: ScanConfig,
    analyzer: Analyzer,
    excludes: GlobSet,
}

impl Scanner {
    /// Create a scanner with every compiled-in language.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        Self::with_registry(config, LanguageRegistry::new())
    }

    /// Create a scanner with an explicit language registry.
    pub fn with_registry(config: ScanConfig, registry: LanguageRegistry) -> Result<Self, ScanError> {
        let classifier = Classifier::new(config.rule_table());
        let analyzer = Analyzer::new(registry, classifier).include_source(config.include_source);
        let excludes = build_excludes(&config.exclude_patterns)?;
        Ok(Self {
            config,
            analyzer,
            excludes,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Scan the tree rooted at `root`.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::InvalidRoot(root.to_path_buf()));
        }
        info!(root = %root.display(), "scanning repository");

        let mut warnings = Vec::new();
        let file_paths = self.find_target_files(root, &mut warnings);
        let file_counts = count_by_category(&file_paths);
        let directory_tree = tree::render(root, &self.config);

        let outcomes: Vec<FileOutcome> = if self.config.parallel {
            file_paths.par_iter().map(|p| self.process(root, p)).collect()
        } else {
            file_paths.iter().map(|p| self.process(root, p)).collect()
        };

        let mut function_analysis = if self.analyzer.is_available() {
            Some(RepositoryAnalysis::new())
        } else {
            warn!("no language backend available, skipping function analysis");
            None
        };
        let mut file_contents = String::new();
        let mut total_characters = 0;

        for outcome in outcomes {
            let content = match outcome.content {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %outcome.relative, error = %e, "skipping file");
                    warnings.push(ScanWarning {
                        path: outcome.relative,
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            total_characters += content.chars().count();
            file_contents.push_str(&file_section(&outcome.relative, &content));

            if let (Some(repo), Some(analysis)) = (function_analysis.as_mut(), outcome.analysis) {
                if let Some(error) = &analysis.parse_error {
                    warnings.push(ScanWarning {
                        path: outcome.relative.clone(),
                        message: format!("parse failed: {}", error),
                    });
                }
                repo.add_file(analysis);
            }
        }

        if let Some(repo) = &function_analysis {
            info!(
                files = repo.total_files,
                functions = repo.total_functions,
                algorithms = repo.total_algorithms,
                "function analysis complete"
            );
        }

        Ok(ScanResult {
            file_paths,
            file_counts,
            directory_tree,
            file_contents,
            total_characters,
            function_analysis,
            warnings,
        })
    }

    /// Walk the tree, pruning ignored directories, and collect files with
    /// an accepted extension that no exclude pattern matches.
    fn find_target_files(&self, root: &Path, warnings: &mut Vec<ScanWarning>) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // The root is never pruned, whatever its name
                e.depth() == 0
                    || !(e.file_type().is_dir()
                        && self.config.is_ignored_dir(&e.file_name().to_string_lossy()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| relative_display(root, p))
                        .unwrap_or_default();
                    let error = ScanError::from(e);
                    warn!(path = %path, error = %error, "skipping unreadable path");
                    warnings.push(ScanWarning {
                        path,
                        message: error.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let accepted = extension_of(path).is_some_and(|ext| self.config.accepts_extension(&ext));
            if !accepted {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.excludes.is_match(relative) {
                debug!(path = %relative.display(), "excluded by pattern");
                continue;
            }
            files.push(path.to_path_buf());
        }

        files
    }

    fn process(&self, root: &Path, path: &Path) -> FileOutcome {
        let relative = relative_display(root, path);
        let content = read_text(path);

        let analysis = match (&content, extension_of(path)) {
            (Ok(text), Some(ext)) if self.analyzer.is_available() => {
                self.analyzer.analyze_source(&relative, &ext, text)
            }
            _ => None,
        };

        FileOutcome {
            relative,
            content,
            analysis,
        }
    }
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ScanError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ScanError::Pattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Normalized extension of a path (lower-case, leading dot).
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(normalize_extension)
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
