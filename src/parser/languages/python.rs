//! Python language configuration for tree-sitter extraction.

use regex::Regex;

use crate::parser::treesitter::{Grammar, LanguageProvider};
use crate::parser::QuerySpec;

/// Construct queries for Python, narrowest first.
///
/// Methods come before plain functions so a function defined in a class
/// body is reported as a method. Classes are not containers here: only
/// their methods are inventoried.
static QUERIES: &[QuerySpec] = &[
    QuerySpec {
        label: "class_method",
        source: r#"
(class_definition
  body: (block
    (function_definition name: (identifier) @name) @method))
"#,
    },
    QuerySpec {
        label: "decorated_class_method",
        source: r#"
(class_definition
  body: (block
    (decorated_definition
      definition: (function_definition name: (identifier) @name) @method)))
"#,
    },
    QuerySpec {
        label: "async_function",
        source: r#"(function_definition "async" name: (identifier) @name) @async_function"#,
    },
    QuerySpec {
        label: "function",
        source: r#"(function_definition name: (identifier) @name) @function"#,
    },
    QuerySpec {
        label: "named_lambda",
        source: r#"(assignment left: (identifier) @name right: (lambda)) @lambda"#,
    },
    QuerySpec {
        label: "lambda",
        source: r#"(lambda) @lambda"#,
    },
];

lazy_static::lazy_static! {
    /// Fallback name patterns, anchored at the construct start.
    static ref NAME_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\A\s*(?:async\s+)?def\s+(\w+)").unwrap(),
        Regex::new(r"\A\s*class\s+(\w+)").unwrap(),
        Regex::new(r"\A\s*(\w+)\s*=\s*lambda\b").unwrap(),
    ];
}

static RESERVED: &[&str] = &["def", "class", "lambda", "async", "return", "if", "for", "while"];

/// Python language provider.
pub struct PythonProvider;

impl LanguageProvider for PythonProvider {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn grammars(&self) -> Vec<Grammar> {
        vec![Grammar {
            extensions: &[".py"],
            language: tree_sitter_python::LANGUAGE.into(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::dedup_candidates;
    use crate::parser::treesitter::TreeSitterExtractor;
    use crate::parser::SyntaxExtractor;

    fn extractor() -> TreeSitterExtractor {
        let provider = PythonProvider;
        let grammar = provider.grammars().remove(0);
        TreeSitterExtractor::compile(&provider, &grammar.language).unwrap()
    }

    #[test]
    fn test_all_queries_compile() {
        assert_eq!(extractor().query_labels().len(), QUERIES.len());
    }

    #[test]
    fn test_python_functions_and_methods() {
        let source = r#"def greet(name):
    print("hi", name)
    return name

class Calculator:
    def add(self, a, b):
        return a + b

    def subtract(self, a, b):
        return a - b
"#;

        let records = dedup_candidates(extractor().extract(source).unwrap());
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.name.as_str(), r.kind.as_str(), r.start_line, r.end_line))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("greet", "function", 1, 3),
                ("add", "method", 6, 7),
                ("subtract", "method", 9, 10),
            ]
        );
    }

    #[test]
    fn test_python_async_and_decorated() {
        let source = r#"async def fetch(url):
    return await get(url)

class Service:
    @staticmethod
    def build():
        return Service()
"#;

        let records = dedup_candidates(extractor().extract(source).unwrap());
        assert!(records
            .iter()
            .any(|r| r.name == "fetch" && r.kind == "async_function"));
        assert!(records.iter().any(|r| r.name == "build" && r.kind == "method"));
    }

    #[test]
    fn test_python_lambdas() {
        let source = "square = lambda x: x * x\nitems.sort(key=lambda i: i[0])\n";

        let records = dedup_candidates(extractor().extract(source).unwrap());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "square");
        assert_eq!(records[0].kind, "lambda");
        assert_eq!(records[1].name, "anonymous");
    }

    #[test]
    fn test_python_nested_function_keeps_own_name() {
        let source = r#"def outer():
    def inner():
        return 1
    return inner
"#;

        let records = dedup_candidates(extractor().extract(source).unwrap());
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
    }

    #[test]
    fn test_python_lambda_callbacks_stay_anonymous() {
        let source = r#"def register(app):
    app.on(
        lambda event: handle(
            event,
            fallback=lambda e: e,
        )
    )
    key = lambda item: item[0]
"#;

        let records = dedup_candidates(extractor().extract(source).unwrap());
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.name.as_str(), r.start_line, r.end_line))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("register", 1, 8),
                ("anonymous", 3, 6),
                ("anonymous", 5, 5),
                ("key", 8, 8),
            ]
        );
    }

    #[test]
    fn test_python_invalid_text_yields_nothing() {
        let records = dedup_candidates(extractor().extract("@@@ ))) ((( $$$ !!!").unwrap());
        assert!(records.is_empty());
    }
}
