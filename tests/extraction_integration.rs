//! Integration tests for the extraction pipeline across languages.

#![cfg(feature = "tree-sitter")]

use std::collections::HashSet;
use std::path::PathBuf;

use algoscan::{dedup_candidates, FunctionRecord, LanguageRegistry};

fn testdata(rel: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("sample_repo")
        .join(rel);
    std::fs::read_to_string(path).expect("fixture should exist")
}

fn extract(registry: &LanguageRegistry, ext: &str, source: &str) -> Vec<FunctionRecord> {
    let extractor = registry
        .for_extension(ext)
        .unwrap_or_else(|| panic!("no extractor for {}", ext));
    dedup_candidates(extractor.extract(source).expect("extraction should not fail"))
}

#[test]
fn test_registry_languages() {
    let registry = LanguageRegistry::new();

    assert!(registry.is_available());
    assert!(registry.failures().is_empty());
    let languages: Vec<_> = registry.languages().into_iter().collect();
    assert_eq!(languages, vec!["javascript", "python", "typescript"]);
    for ext in [".py", ".js", ".jsx", ".mjs", ".ts", ".tsx"] {
        assert!(registry.for_extension(ext).is_some(), "missing {}", ext);
    }
    assert!(registry.for_extension(".rb").is_none());
}

#[test]
fn test_records_are_unique_and_ordered() {
    let registry = LanguageRegistry::new();
    let fixtures = [
        (".py", "app/algorithms.py"),
        (".py", "app/shapes.py"),
        (".js", "web/util.js"),
        (".ts", "web/queue.ts"),
    ];

    for (ext, rel) in fixtures {
        let records = extract(&registry, ext, &testdata(rel));
        assert!(!records.is_empty(), "{} produced nothing", rel);

        let keys: HashSet<_> = records.iter().map(|r| r.span_key()).collect();
        assert_eq!(keys.len(), records.len(), "duplicate spans in {}", rel);

        assert!(
            records.windows(2).all(|w| w[0].start_line <= w[1].start_line),
            "{} not ordered",
            rel
        );
        for r in &records {
            assert!(r.start_line >= 1);
            assert!(r.end_line >= r.start_line);
            assert_eq!(r.line_count, r.end_line - r.start_line + 1);
        }
    }
}

#[test]
fn test_extraction_is_idempotent() {
    let registry = LanguageRegistry::new();
    let source = testdata("web/util.js");

    let first = extract(&registry, ".js", &source);
    let second = extract(&registry, ".js", &source);
    assert_eq!(first, second);
}

#[test]
fn test_invalid_text_degrades_gracefully() {
    let registry = LanguageRegistry::new();
    let garbage = "@@@ ))) ((( $$$ !!! }}} {{{ <<< >>>";

    for ext in [".py", ".js", ".ts", ".tsx"] {
        assert!(extract(&registry, ext, garbage).is_empty(), "{}", ext);
    }
}

#[test]
fn test_overlapping_queries_report_once() {
    let registry = LanguageRegistry::new();
    let source = "async function area(r) {\n  return 3.14 * r * r;\n}\n";

    let records = extract(&registry, ".js", source);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "area");
    assert_eq!(records[0].kind, "async_function");
    assert_eq!(records[0].span_key(), (1, 3));
}

#[test]
fn test_python_methods_and_functions() {
    let registry = LanguageRegistry::new();
    let records = extract(&registry, ".py", &testdata("app/shapes.py"));

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
