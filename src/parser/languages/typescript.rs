//! TypeScript language configuration for tree-sitter extraction.
//!
//! `.ts` and `.tsx` use separate grammars but share one query set.

use regex::Regex;

use crate::parser::treesitter::{Grammar, LanguageProvider};
use crate::parser::QuerySpec;

use super::javascript;

/// Construct queries for TypeScript. Class names are `type_identifier`
/// nodes in this grammar.
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
        source: r#"(class_declaration name: (type_identifier) @name) @class"#,
    },
    QuerySpec {
        label: "abstract_class",
        source: r#"(abstract_class_declaration name: (type_identifier) @name) @class"#,
    },
];

lazy_static::lazy_static! {
    /// TypeScript adds access modifiers and `abstract` in front of members.
    static ref NAME_PATTERNS: Vec<Regex> = {
        let mut patterns = vec![
            Regex::new(r"\A\s*(?:export\s+)?(?:abstract\s+)?class\s+([\w$]+)").unwrap(),
            Regex::new(
                r"\A\s*(?:(?:public|private|protected|readonly|abstract|override)\s+)+(?:async\s+)?(?:static\s+)?([\w$]+)\s*[(<]",
            )
            .unwrap(),
        ];
        patterns.extend(javascript::NAME_PATTERNS.iter().cloned());
        patterns
    };
}

/// TypeScript language provider (.ts, .tsx).
pub struct TypeScriptProvider;

impl LanguageProvider for TypeScriptProvider {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn grammars(&self) -> Vec<Grammar> {
        vec![
            Grammar {
                extensions: &[".ts"],
                language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            },
            Grammar {
                extensions: &[".tsx"],
                language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            },
        ]
    }

    fn queries(&self) -> &'static [QuerySpec] {
        QUERIES
    }

    fn name_patterns(&self) -> &'static [Regex] {
        &NAME_PATTERNS
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        javascript::RESERVED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::dedup_candidates;
    use crate::model::FunctionRecord;
    use crate::parser::treesitter::TreeSitterExtractor;
    use crate::parser::SyntaxExtractor;

    fn extract_with(grammar_index: usize, source: &str) -> Vec<FunctionRecord> {
        let provider = TypeScriptProvider;
        let grammar = provider.grammars().remove(grammar_index);
        let extractor = TreeSitterExtractor::compile(&provider, &grammar.language).unwrap();
        assert_eq!(extractor.query_labels().len(), QUERIES.len());
        dedup_candidates(extractor.extract(source).unwrap())
    }

    #[test]
    fn test_typescript_class_and_methods() {
        let source = r#"export class Queue<T> {
  private items: T[] = [];

  push(item: T): void {
    this.items.push(item);
  }

  async drain(): Promise<T[]> {
    return this.items.splice(0);
  }
}

export function binarySearch(xs: number[], target: number): number {
  return -1;
}
"#;

        let records = extract_with(0, source);
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.name.as_str(), r.kind.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Queue", "class"),
                ("push", "method"),
                ("drain", "method"),
                ("binarySearch", "function"),
            ]
        );
    }

    #[test]
    fn test_tsx_component() {
        let source = r#"const Button = (props: { label: string }) => {
  return <button>{props.label}</button>;
};
"#;

        let records = extract_with(1, source);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Button");
        assert_eq!(records[0].kind, "arrow_function");
    }
}
