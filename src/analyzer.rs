//! Per-file analysis pipeline.
//!
//! extract -> dedup -> slice -> classify, for a single file. Used by the
//! scanner for every eligible file and directly for ad hoc analysis.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::dedup::dedup_candidates;
use crate::model::{ClassificationMode, FileAnalysis};
use crate::parser::{normalize_extension, LanguageRegistry, SyntaxExtractor};
use crate::scan::ScanError;
use crate::slice::extract_lines;

/// Runs extraction and classification for individual files.
#[derive(Debug, Clone)]
pub struct Analyzer {
    registry: LanguageRegistry,
    classifier: Classifier,
    include_source: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(LanguageRegistry::new(), Classifier::default())
    }
}

impl Analyzer {
    pub fn new(registry: LanguageRegistry, classifier: Classifier) -> Self {
        Self {
            registry,
            classifier,
            include_source: false,
        }
    }

    /// Carry each function's source text through the pipeline.
    ///
    /// Without source text the classifier runs in name-only mode.
    pub fn include_source(mut self, include: bool) -> Self {
        self.include_source = include;
        self
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Whether any language backend is usable.
    pub fn is_available(&self) -> bool {
        self.registry.is_available()
    }

    /// Analyze one file, reading it from disk unless `content` is given.
    ///
    /// Returns `Ok(None)` for extensions no language handles. Read and
    /// decode failures are returned as errors for the caller to record;
    /// parse failures yield an empty analysis with `parse_error` set.
    pub fn analyze_file(
        &self,
        path: &Path,
        content: Option<&str>,
    ) -> Result<Option<FileAnalysis>, ScanError> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Ok(None);
        };
        let ext = normalize_extension(ext);
        if self.registry.for_extension(&ext).is_none() {
            return Ok(None);
        }

        let display = path.display().to_string();
        match content {
            Some(text) => Ok(self.analyze_source(&display, &ext, text)),
            None => {
                let text = read_text(path)?;
                Ok(self.analyze_source(&display, &ext, &text))
            }
        }
    }

    /// Analyze in-memory source text as if it came from a file with the
    /// given extension.
    pub fn analyze_source(&self, path: &str, extension: &str, source: &str) -> Option<FileAnalysis> {
        let extractor = self.registry.for_extension(extension)?;
        Some(self.run(path, extractor, source))
    }

    fn run(&self, path: &str, extractor: &dyn SyntaxExtractor, source: &str) -> FileAnalysis {
        let language = extractor.language();
        let mode = if self.include_source {
            ClassificationMode::Full
        } else {
            ClassificationMode::NameOnly
        };

        let candidates = match extractor.extract(source) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(path, error = %e, "failed to parse file, reporting no functions");
                return FileAnalysis::failed(path, language, mode, e.to_string());
            }
        };

        let mut functions = dedup_candidates(candidates);
        for func in &mut functions {
            if self.include_source {
                let code = extract_lines(source, func.start_line, func.end_line);
                self.classifier.apply(func, &code, language);
                func.source_text = Some(code);
            } else {
                self.classifier.apply(func, "", language);
            }
        }

        let analysis = FileAnalysis::new(path, language, functions, mode);
        debug!(
            path,
            language,
            functions = analysis.function_count,
            algorithms = analysis.algorithm_count,
            "analyzed file"
        );
        analysis
    }
}

/// Read a file as UTF-8 text.
pub(crate) fn read_text(path: &Path) -> Result<String, ScanError> {
    let bytes = fs::read(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| ScanError::Decode {
        path: path.to_path_buf(),
    })
}
