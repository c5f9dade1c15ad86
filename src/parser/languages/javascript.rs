//! JavaScript language configuration for tree-sitter extraction.

use regex::Regex;

use crate::parser::treesitter::{Grammar, LanguageProvider};
use crate::parser::QuerySpec;

/// Construct queries for JavaScript, narrowest first.
///
/// Declarator and pair queries precede the bare `function_expression`
/// query so that a named binding wins over the anonymous expression on the
/// same lines.
static QUERIES: &[QuerySpec] = &[
    QuerySpec {
        label: "method",
        source: r#"(method_definition name: (property_identifier) @name) @method"#,
    },
    QuerySpec {
        label: "async_function",
        source: r#"(function_declaration "async" name: (identifier) @name) @async_function"#,
    },
    QuerySpec {
        label: "function",
        source: r#"(function_declaration name: (identifier) @name) @function"#,
    },
    QuerySpec {
        label: "generator",
        source: r#"(generator_function_declaration name: (identifier) @name) @function"#,
    },
    QuerySpec {
        label: "arrow_function",
        source: r#"(variable_declarator name: (identifier) @name value: (arrow_function)) @arrow_function"#,
    },
    QuerySpec {
        label: "named_function_expression",
        source: r#"(variable_declarator name: (identifier) @name value: (function_expression)) @function_expr"#,
    },
    QuerySpec {
        label: "object_method",
        source: r#"(pair key: (property_identifier) @name value: [(function_expression) (arrow_function)]) @object_method"#,
    },
    QuerySpec {
        label: "function_expression",
        source: r#"(function_expression name: (identifier)? @name) @function_expr"#,
    },
    QuerySpec {
        label: "class",
        source: r#"(class_declaration name: (identifier) @name) @class"#,
    },
];

lazy_static::lazy_static! {
    /// Fallback name patterns, anchored at the construct start.
    pub(crate) static ref NAME_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\A\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([\w$]+)").unwrap(),
        Regex::new(r"\A\s*([\w$]+)\s*=\s*(?:async\s+)?function\b").unwrap(),
        Regex::new(r"\A\s*([\w$]+)\s*=\s*(?:async\s*)?\(").unwrap(),
        Regex::new(r"\A\s*(?:async\s+)?(?:static\s+)?(?:get\s+|set\s+)?\*?\s*([\w$]+)\s*\(").unwrap(),
        Regex::new(r"\A\s*class\s+([\w$]+)").unwrap(),
    ];
}

pub(crate) static RESERVED: &[&str] = &[
    "function", "async", "await", "class", "return", "if", "for", "while", "switch", "catch",
    "new", "typeof", "static", "get", "set", "export", "default",
];

/// JavaScript language provider (.js, .jsx, .mjs).
pub struct JavaScriptProvider;

impl LanguageProvider for JavaScriptProvider {
    fn language_id(&self) -> &'static str {
        "javascript"
    }

    fn grammars(&self) -> Vec<Grammar> {
        vec![Grammar {
            extensions: &[".js", ".jsx", ".mjs"],
            language: tree_sitter_javascript::LANGUAGE.into(),
        }]
    }

    fn queries(&self) -> &'static [QuerySpec] {
        QUERIES
    }

    fn name_patterns(&self) -> &'static [Regex] {
        &NAME_PATTERNS
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }
}
