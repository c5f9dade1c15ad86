//! Scoring rule table for the algorithm classifier.
//!
//! The weights here are a default policy chosen empirically. Every value
//! can be replaced through the `rules` section of the config file without
//! touching extraction or traversal.

use serde::{Deserialize, Serialize};

/// Default signal weights.
pub mod weights {
    pub const UTILITY_NAME: f64 = -2.0;
    pub const ALGORITHM_NAME: f64 = 3.0;
    pub const BUSINESS_NAME: f64 = 2.0;

    pub const LOOP: f64 = 1.5;
    pub const LOOP_CAP: f64 = 4.0;
    pub const NESTED_LOOP: f64 = 2.0;

    pub const RECURSION: f64 = 2.5;

    pub const ARITHMETIC: f64 = 0.3;
    pub const CONDITIONAL: f64 = 0.5;
    pub const DATA_STRUCTURE: f64 = 0.8;
    pub const DENSITY_CAP: f64 = 2.0;

    pub const LONG_FUNCTION: f64 = 1.0;
    pub const SHORT_FUNCTION: f64 = -1.0;

    pub const MAGIC_METHOD: f64 = -2.0;
}

/// Default decision threshold on the raw score.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Default number of reason phrases kept.
pub const DEFAULT_MAX_REASONS: usize = 3;

/// Substring patterns matched against the lower-cased function name.
/// Each matching pattern contributes `weight` once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRule {
    /// Phrase prefix for reasons, e.g. "utility pattern".
    pub label: String,
    pub patterns: Vec<String>,
    pub weight: f64,
}

/// Token counts over the lower-cased code, scored when the count exceeds
/// `min_count`: `min(weight * count, cap)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityRule {
    /// Phrase suffix for reasons, e.g. "conditional statements".
    pub label: String,
    pub patterns: Vec<String>,
    pub weight: f64,
    pub cap: f64,
    pub min_count: usize,
}

/// Loop keywords and higher-order iteration calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopRule {
    pub keywords: Vec<String>,
    pub iteration_calls: Vec<String>,
    pub weight: f64,
    pub cap: f64,
    /// Flat bonus when more than one loop construct is present.
    pub nested_bonus: f64,
}

/// Function length thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRule {
    /// Bonus applies when `line_count > long_lines`.
    pub long_lines: usize,
    pub long_bonus: f64,
    /// Penalty applies when `line_count < short_lines`.
    pub short_lines: usize,
    pub short_penalty: f64,
}

/// Penalty for names matching a language-specific convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguagePenalty {
    pub language: String,
    pub name_contains: String,
    pub weight: f64,
    pub reason: String,
}

/// Full scoring policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    pub utility_names: NameRule,
    pub algorithm_names: NameRule,
    pub business_names: NameRule,
    pub loops: LoopRule,
    pub recursion_weight: f64,
    pub arithmetic: DensityRule,
    pub conditionals: DensityRule,
    pub data_structures: DensityRule,
    pub size: SizeRule,
    pub language_penalties: Vec<LanguagePenalty>,
    /// `is_algorithm` is `raw_score > threshold`.
    pub threshold: f64,
    pub max_reasons: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            utility_names: NameRule {
                label: "utility pattern".to_string(),
                patterns: strings(&[
                    "get", "set", "is", "has", "can", "should", "will", "init", "setup", "config",
                    "load", "save", "read", "write", "parse", "format", "convert", "transform",
                    "validate", "helper", "util", "tool", "wrapper", "handler", "log", "print",
                    "debug", "trace", "error", "test", "mock", "stub", "fixture",
                ]),
                weight: weights::UTILITY_NAME,
            },
            algorithm_names: NameRule {
                label: "algorithm pattern".to_string(),
                patterns: strings(&[
                    "sort", "search", "find", "calculate", "compute", "solve", "optimize",
                    "minimize", "maximize", "process", "analyze", "algorithm", "recursive",
                    "iterate", "traverse", "walk", "dfs", "bfs", "dijkstra", "binary", "merge",
                    "quick", "heap", "tree", "graph", "dynamic", "greedy", "backtrack",
                ]),
                weight: weights::ALGORITHM_NAME,
            },
            business_names: NameRule {
                label: "business logic pattern".to_string(),
                patterns: strings(&[
                    "business", "logic", "rule", "policy", "workflow", "process", "calculate",
                    "compute", "determine", "evaluate", "assess", "analyze", "validate",
                ]),
                weight: weights::BUSINESS_NAME,
            },
            loops: LoopRule {
                keywords: strings(&["for ", "for(", "while ", "while(", "foreach"]),
                iteration_calls: strings(&["map(", "filter(", "reduce("]),
                weight: weights::LOOP,
                cap: weights::LOOP_CAP,
                nested_bonus: weights::NESTED_LOOP,
            },
            recursion_weight: weights::RECURSION,
            arithmetic: DensityRule {
                label: "mathematical operations".to_string(),
                patterns: strings(&[
                    "+", "-", "*", "/", "%", "**", "pow(", "sqrt(", "abs(", "min(", "max(",
                ]),
                weight: weights::ARITHMETIC,
                cap: weights::DENSITY_CAP,
                min_count: 3,
            },
            conditionals: DensityRule {
                label: "conditional statements".to_string(),
                patterns: strings(&[
                    "if ", "if(", "elif ", "else:", "else ", "else{", "switch", "case", "?",
                    "and ", "or ", "&&", "||",
                ]),
                weight: weights::CONDITIONAL,
                cap: weights::DENSITY_CAP,
                min_count: 2,
            },
            data_structures: DensityRule {
                label: "data structure operations".to_string(),
                patterns: strings(&[
                    "append(", "push(", "pop(", "insert(", "remove(", "sort()", "reverse()",
                ]),
                weight: weights::DATA_STRUCTURE,
                cap: weights::DENSITY_CAP,
                min_count: 1,
            },
            size: SizeRule {
                long_lines: 10,
                long_bonus: weights::LONG_FUNCTION,
                short_lines: 3,
                short_penalty: weights::SHORT_FUNCTION,
            },
            language_penalties: vec![LanguagePenalty {
                language: "python".to_string(),
                name_contains: "__".to_string(),
                weight: weights::MAGIC_METHOD,
                reason: "magic method detected".to_string(),
            }],
            threshold: DEFAULT_THRESHOLD,
            max_reasons: DEFAULT_MAX_REASONS,
        }
    }
}

impl RuleTable {
    /// Check that every weight is a finite number.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut values = vec![
            ("utility_names.weight", self.utility_names.weight),
            ("algorithm_names.weight", self.algorithm_names.weight),
            ("business_names.weight", self.business_names.weight),
            ("loops.weight", self.loops.weight),
            ("loops.cap", self.loops.cap),
            ("loops.nested_bonus", self.loops.nested_bonus),
            ("recursion_weight", self.recursion_weight),
            ("arithmetic.weight", self.arithmetic.weight),
            ("arithmetic.cap", self.arithmetic.cap),
            ("conditionals.weight", self.conditionals.weight),
            ("conditionals.cap", self.conditionals.cap),
            ("data_structures.weight", self.data_structures.weight),
            ("data_structures.cap", self.data_structures.cap),
            ("size.long_bonus", self.size.long_bonus),
            ("size.short_penalty", self.size.short_penalty),
            ("threshold", self.threshold),
        ];
        for penalty in &self.language_penalties {
            values.push(("language_penalties.weight", penalty.weight));
        }

        for (field, value) in values {
            if !value.is_finite() {
                anyhow::bail!("rule weight {} must be finite, got {}", field, value);
            }
        }
        Ok(())
    }
}
