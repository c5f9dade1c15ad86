//! Scan configuration.
//!
//! Loaded from YAML. Every field is optional in the file; missing fields
//! take the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::RuleTable;

/// Config file names looked up in the working directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["algoscan.yaml", ".algoscan.yaml"];

/// Extensions scanned by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".py", ".ts", ".jsx", ".tsx"];

/// Directory names never descended into by default.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    "dist",
    "build",
    ".next",
    "coverage",
    ".pytest_cache",
    "venv",
    "env",
    ".env",
    "logs",
    "tmp",
    "temp",
    ".cache",
    ".idea",
    ".vscode",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_extensions() -> Vec<String> {
    owned(DEFAULT_EXTENSIONS)
}

fn default_ignore_dirs() -> Vec<String> {
    owned(DEFAULT_IGNORE_DIRS)
}

/// Top-level scan configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScanConfig {
    /// File extensions to analyze, with leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Directory names pruned during traversal.
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
    /// Glob patterns for files to skip, matched against the path relative
    /// to the scan root (e.g. "**/generated/**").
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Carry function source text through the pipeline.
    #[serde(default)]
    pub include_source: bool,
    /// Analyze files on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub follow_links: bool,
    /// Classifier policy override; defaults apply when absent.
    #[serde(default)]
    pub rules: Option<RuleTable>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_dirs: default_ignore_dirs(),
            exclude_patterns: Vec::new(),
            include_source: false,
            parallel: false,
            follow_links: false,
            rules: None,
        }
    }
}

impl ScanConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to null rather than an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ScanConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Serialize to YAML, e.g. for `algoscan init`.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The effective classifier rules.
    pub fn rule_table(&self) -> RuleTable {
        self.rules.clone().unwrap_or_default()
    }

    /// Whether `name` is one of the ignored directory names.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignore_dirs.iter().any(|d| d == name)
    }

    /// Whether a file with this extension (leading dot, any case) is scanned.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Validate a config.
pub fn validate(config: &ScanConfig) -> anyhow::Result<()> {
    if config.extensions.is_empty() {
        anyhow::bail!("extensions must not be empty");
    }
    for ext in &config.extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            anyhow::bail!("invalid extension {:?}, must start with '.'", ext);
        }
    }

    for dir in &config.ignore_dirs {
        if dir.is_empty() || dir.contains('/') || dir.contains('\\') {
            anyhow::bail!("invalid ignore_dirs entry {:?}, must be a bare directory name", dir);
        }
    }

    for pattern in &config.exclude_patterns {
        if let Err(e) = globset::Glob::new(pattern) {
            anyhow::bail!("invalid exclude pattern {:?}: {}", pattern, e);
        }
    }

    if let Some(rules) = &config.rules {
        rules.validate()?;
    }

    Ok(())
}

/// Find a config file: first in the working directory, then in the user
/// config directory. Returns `None` when there is none.
pub fn discover() -> Option<PathBuf> {
    for name in DEFAULT_CONFIG_NAMES {
        let path = PathBuf::from(name);
        if path.is_file() {
            return Some(path);
        }
    }

    let user = user_config_path()?;
    user.is_file().then_some(user)
}

/// `<config dir>/algoscan/config.yaml` for the current user.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "algoscan").map(|dirs| dirs.config_dir().join("config.yaml"))
}
