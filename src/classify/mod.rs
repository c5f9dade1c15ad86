//! Heuristic algorithm classification.
//!
//! Each function gets a score from independent signal groups: name
//! patterns, loop constructs, recursion, arithmetic density, conditional
//! density, data-structure operations, size, and language conventions.
//! A function is algorithmic when the raw score exceeds the rule table's
//! threshold. When no source text is available only the name and size
//! signals apply.

pub mod rules;

use once_cell::sync::Lazy;

use crate::model::FunctionRecord;

pub use rules::{DensityRule, LanguagePenalty, LoopRule, NameRule, RuleTable, SizeRule};

/// Reason text used when no signal fired.
pub const NO_PATTERNS_REASON: &str = "no specific patterns detected";

static DEFAULT_RULES: Lazy<RuleTable> = Lazy::new(RuleTable::default);

/// Outcome of classifying one function.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub is_algorithm: bool,
    /// Raw score floored at zero.
    pub score: f64,
    /// Sum of all signal contributions, may be negative.
    pub raw_score: f64,
    /// Up to `max_reasons` phrases, strongest first, joined by "; ".
    pub reason: String,
}

/// One fired signal.
#[derive(Debug, Clone)]
struct Signal {
    contribution: f64,
    reason: String,
}

/// Scores functions against a [`RuleTable`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleTable,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.clone())
    }
}

impl Classifier {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Classify a function. `code` may be empty, in which case only the
    /// name and size signals are evaluated.
    pub fn classify(&self, record: &FunctionRecord, code: &str, language: &str) -> Classification {
        let mut signals = Vec::new();
        let name = record.name.to_lowercase();

        self.name_signals(&name, &mut signals);

        if !code.is_empty() {
            let code_lower = code.to_lowercase();
            self.loop_signals(&code_lower, &mut signals);
            if !record.is_anonymous() {
                self.recursion_signal(&record.name, code, &code_lower, &mut signals);
            }
            for rule in [
                &self.rules.arithmetic,
                &self.rules.conditionals,
                &self.rules.data_structures,
            ] {
                density_signal(rule, &code_lower, &mut signals);
            }
        }

        self.size_signal(record.line_count, &mut signals);

        for penalty in &self.rules.language_penalties {
            if penalty.language == language && record.name.contains(&penalty.name_contains) {
                signals.push(Signal {
                    contribution: penalty.weight,
                    reason: penalty.reason.clone(),
                });
            }
        }

        let raw_score: f64 = signals.iter().map(|s| s.contribution).sum();
        Classification {
            is_algorithm: raw_score > self.rules.threshold,
            score: raw_score.max(0.0),
            raw_score,
            reason: self.summarize(signals),
        }
    }

    /// Classify and write the outcome back into `record`.
    pub fn apply(&self, record: &mut FunctionRecord, code: &str, language: &str) {
        let result = self.classify(record, code, language);
        record.is_algorithm = result.is_algorithm;
        record.algorithm_score = result.score;
        record.classification_reason = result.reason;
    }

    fn name_signals(&self, name: &str, signals: &mut Vec<Signal>) {
        for rule in [
            &self.rules.utility_names,
            &self.rules.algorithm_names,
            &self.rules.business_names,
        ] {
            for pattern in &rule.patterns {
                if name.contains(pattern.as_str()) {
                    signals.push(Signal {
                        contribution: rule.weight,
                        reason: format!("{} '{}' in name", rule.label, pattern),
                    });
                }
            }
        }
    }

    fn loop_signals(&self, code: &str, signals: &mut Vec<Signal>) {
        let rule = &self.rules.loops;
        let keyword_loops: usize = rule.keywords.iter().map(|k| count_token(code, k)).sum();
        let call_loops: usize = rule.iteration_calls.iter().map(|k| count_token(code, k)).sum();
        let total = keyword_loops + call_loops;
        if total == 0 {
            return;
        }

        signals.push(Signal {
            contribution: (rule.weight * total as f64).min(rule.cap),
            reason: format!("{} loop(s) detected", total),
        });
        if total > 1 && keyword_loops > 0 {
            signals.push(Signal {
                contribution: rule.nested_bonus,
                reason: "nested loops detected".to_string(),
            });
        }
    }

    fn recursion_signal(&self, name: &str, code: &str, code_lower: &str, signals: &mut Vec<Signal>) {
        // The definition itself accounts for one occurrence
        if count_word(code, name) >= 2 && count_token(code_lower, "return") > 0 {
            signals.push(Signal {
                contribution: self.rules.recursion_weight,
                reason: "recursion detected".to_string(),
            });
        }
    }

    fn size_signal(&self, line_count: usize, signals: &mut Vec<Signal>) {
        let rule = &self.rules.size;
        if line_count > rule.long_lines {
            signals.push(Signal {
                contribution: rule.long_bonus,
                reason: format!("substantial function ({} lines)", line_count),
            });
        } else if line_count < rule.short_lines {
            signals.push(Signal {
                contribution: rule.short_penalty,
                reason: format!("very short function ({} lines)", line_count),
            });
        }
    }

    fn summarize(&self, mut signals: Vec<Signal>) -> String {
        if signals.is_empty() {
            return NO_PATTERNS_REASON.to_string();
        }
        signals.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
        signals
            .into_iter()
            .take(self.rules.max_reasons)
            .map(|s| s.reason)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn density_signal(rule: &DensityRule, code: &str, signals: &mut Vec<Signal>) {
    let count: usize = rule.patterns.iter().map(|p| count_token(code, p)).sum();
    if count > rule.min_count {
        signals.push(Signal {
            contribution: (rule.weight * count as f64).min(rule.cap),
            reason: format!("{} {}", count, rule.label),
        });
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Count non-overlapping occurrences of `token` in `haystack`.
///
/// Tokens that begin with a word character only count at a word start, so
/// `"or "` does not match inside `"for "`.
pub fn count_token(haystack: &str, token: &str) -> usize {
    let Some(first) = token.chars().next() else {
        return 0;
    };
    let needs_boundary = is_word_char(first);

    haystack
        .match_indices(token)
        .filter(|(idx, _)| {
            !needs_boundary || !haystack[..*idx].chars().next_back().is_some_and(is_word_char)
        })
        .count()
}

/// Count whole-word occurrences of `word` in `haystack`.
pub fn count_word(haystack: &str, word: &str) -> usize {
    if word.is_empty() {
        return 0;
    }
    haystack
        .match_indices(word)
        .filter(|(idx, m)| {
            let before = haystack[..*idx].chars().next_back();
            let after = haystack[idx + m.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str, code: &str, language: &str) -> Classification {
        let lines = code.lines().count().max(1);
        let record = FunctionRecord::new(name, "function", 1, lines);
        Classifier::default().classify(&record, code, language)
    }

    #[test]
    fn test_short_getter_is_not_algorithmic() {
        let code = "def get_value(self):\n    return self._value";
        let result = classify("get_value", code, "python");

        assert!(!result.is_algorithm);
        assert_eq!(result.score, 0.0);
        assert!(result.raw_score < 0.0);
        assert!(result.reason.contains("utility pattern 'get' in name"));
    }

    #[test]
    fn test_recursive_quicksort_is_algorithmic() {
        let code = "\
def quicksort(arr):
    if len(arr) <= 1:
        return arr
    pivot = arr[len(arr) // 2]
    left = []
    right = []
    for x in arr:
        for y in [pivot]:
            if x < y:
                left.append(x)
            else:
                right.append(x)
    return quicksort(left) + [pivot] + quicksort(right)";
        let result = classify("quicksort", code, "python");

        assert!(result.is_algorithm);
        assert!(result.raw_score > 5.0);
        assert_eq!(result.score, result.raw_score);
        assert_eq!(result.reason.split("; ").count(), 3);
    }

    #[test]
    fn test_reasons_ordered_by_strength() {
        let code = "\
def quicksort(arr):
    return quicksort(arr[1:])";
        let result = classify("quicksort", code, "python");

        // Name bonuses (3.0) outrank recursion (2.5) and the short penalty (1.0)
        let reasons: Vec<_> = result.reason.split("; ").collect();
        assert_eq!(reasons[0], "algorithm pattern 'sort' in name");
        assert_eq!(reasons[1], "algorithm pattern 'quick' in name");
        assert_eq!(reasons[2], "recursion detected");
    }

    #[test]
    fn test_name_only_mode() {
        let record = FunctionRecord::new("binary_search", "function", 1, 12);
        let result = Classifier::default().classify(&record, "", "python");

        // 'binary' + 'search' + substantial size
        assert!(result.is_algorithm);
        assert!((result.raw_score - 7.0).abs() < 1e-9);
        assert!(!result.reason.contains("loop"));
    }

    #[test]
    fn test_no_signals() {
        let record = FunctionRecord::new("zzz", "function", 1, 5);
        let result = Classifier::default().classify(&record, "", "python");

        assert!(!result.is_algorithm);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.reason, NO_PATTERNS_REASON);
    }

    #[test]
    fn test_single_mention_is_not_recursion() {
        let code = "def walker(n):\n    x = n\n    return x";
        let result = classify("walker", code, "python");
        assert!(!result.reason.contains("recursion"));
    }

    #[test]
    fn test_python_magic_method_penalty() {
        let record = FunctionRecord::new("__init__", "method", 1, 5);
        let py = Classifier::default().classify(&record, "", "python");
        let js = Classifier::default().classify(&record, "", "javascript");

        assert!((js.raw_score - py.raw_score - 2.0).abs() < 1e-9);
        assert!(py.reason.contains("magic method detected"));
    }

    #[test]
    fn test_apply_writes_back() {
        let mut record = FunctionRecord::new("get_value", "method", 1, 2);
        Classifier::default().apply(&mut record, "", "python");
        assert!(!record.is_algorithm);
        assert_eq!(record.algorithm_score, 0.0);
        assert!(!record.classification_reason.is_empty());
    }

    #[test]
    fn test_custom_threshold() {
        let rules = RuleTable {
            threshold: 100.0,
            ..Default::default()
        };
        let record = FunctionRecord::new("binary_search", "function", 1, 12);
        let result = Classifier::new(rules).classify(&record, "", "python");
        assert!(!result.is_algorithm);
        assert!(result.score > 0.0);
    }

    #[test]
    fn test_count_token_word_start() {
        assert_eq!(count_token("for x in xs: pass", "or "), 0);
        assert_eq!(count_token("a or b", "or "), 1);
        assert_eq!(count_token("elif x:\n    pass", "if "), 0);
        assert_eq!(count_token("x.map(f).map(g)", "map("), 2);
        assert_eq!(count_token("a + b + c", "+"), 2);
        assert_eq!(count_token("abc", ""), 0);
    }

    #[test]
    fn test_conditional_tokens_need_delimiters() {
        let count = |code: &str| -> usize {
            DEFAULT_RULES
                .conditionals
                .patterns
                .iter()
                .map(|p| count_token(code, p))
                .sum()
        };

        assert_eq!(count("elsewhere = elsewise"), 0);
        assert_eq!(count("if x:\n    y\nelse:\n    z"), 2);
        assert_eq!(count("if (a) {\n} else {\n}\nif (b) {\n} else{\n}"), 4);

        let code = "def route(x):\n    elsewhere = x\n    elsewise = elsewhere\n    return elsewise";
        assert!(!classify("route", code, "python").reason.contains("conditional"));
    }

    #[test]
    fn test_count_word() {
        assert_eq!(count_word("fib(n - 1) + fib(n - 2)", "fib"), 2);
        assert_eq!(count_word("fibonacci(n)", "fib"), 0);
        assert_eq!(count_word("", "fib"), 0);
    }
}
