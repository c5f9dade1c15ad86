//! Construct name resolution.
//!
//! Names are resolved in two steps. The structural step looks for a `name`
//! capture nested inside the construct and anchored near its start. Only
//! when that fails does the regex fallback run over the construct's own
//! text.

use regex::Regex;

use crate::model::Span;

/// Maximum number of rows a name capture may start after its construct.
pub const NAME_ROW_WINDOW: usize = 3;

/// A `name` capture collected from any query over the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCapture {
    pub span: Span,
    pub text: String,
}

/// Structural resolution: the earliest name capture nested in `construct`
/// that begins within [`NAME_ROW_WINDOW`] rows of the construct's start
/// and belongs to no smaller construct inside it.
///
/// `names` must be sorted by start byte. `constructs` holds every construct
/// span of the file. A name owned by a nested construct (a declaration in
/// an anonymous callback's body) is never taken for the outer one.
pub fn resolve_name<'a>(
    construct: &Span,
    names: &'a [NameCapture],
    constructs: &[Span],
) -> Option<&'a str> {
    names
        .iter()
        .filter(|n| construct.contains(&n.span))
        .filter(|n| n.span.start_line <= construct.start_line + NAME_ROW_WINDOW)
        .find(|n| !owned_by_inner(construct, &n.span, constructs))
        .map(|n| n.text.as_str())
}

/// Whether `name` lies inside a construct strictly nested in `construct`.
fn owned_by_inner(construct: &Span, name: &Span, constructs: &[Span]) -> bool {
    constructs
        .iter()
        .any(|inner| inner != construct && construct.contains(inner) && inner.contains(name))
}

/// Fallback resolution over the construct text.
///
/// Patterns are tried in order; the first capture group of the first match
/// wins unless it is a reserved word, in which case the next pattern runs.
pub fn recover_name(text: &str, patterns: &[Regex], reserved: &[&str]) -> Option<String> {
    for pattern in patterns {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let Some(m) = caps.get(1) else {
            continue;
        };
        let candidate = m.as_str();
        if candidate.is_empty() || reserved.contains(&candidate) {
            continue;
        }
        return Some(candidate.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(start_byte: usize, end_byte: usize, line: usize, text: &str) -> NameCapture {
        NameCapture {
            span: Span::new(start_byte, end_byte, line, line),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_resolve_nested_name() {
        let construct = Span::new(10, 200, 2, 12);
        let names = vec![
            name(0, 5, 1, "before"),
            name(14, 20, 2, "outer"),
            name(40, 45, 3, "inner"),
        ];
        let constructs = vec![construct, Span::new(35, 120, 3, 6)];
        assert_eq!(resolve_name(&construct, &names, &constructs), Some("outer"));
    }

    #[test]
    fn test_resolve_ignores_names_far_into_body() {
        let construct = Span::new(0, 300, 1, 20);
        // Only name is on line 9, e.g. a returned identifier
        let names = vec![name(150, 160, 9, "result")];
        assert_eq!(resolve_name(&construct, &names, &[construct]), None);
    }

    #[test]
    fn test_resolve_requires_nesting() {
        // Sibling name before the construct (e.g. `x = lambda: 1`)
        let construct = Span::new(4, 15, 1, 1);
        let names = vec![name(0, 1, 1, "x")];
        assert_eq!(resolve_name(&construct, &names, &[construct]), None);
    }

    #[test]
    fn test_resolve_skips_names_of_inner_constructs() {
        // Anonymous callback on lines 1-4 with `const total = ...` on line 2
        let callback = Span::new(12, 90, 1, 4);
        let declarator = Span::new(40, 60, 2, 2);
        let names = vec![name(46, 51, 2, "total")];
        let constructs = vec![callback, declarator];

        assert_eq!(resolve_name(&callback, &names, &constructs), None);
        assert_eq!(resolve_name(&declarator, &names, &constructs), Some("total"));
    }

    #[test]
    fn test_resolve_same_span_from_other_query_is_not_inner() {
        let construct = Span::new(0, 40, 1, 3);
        let names = vec![name(4, 8, 1, "area")];
        let constructs = vec![construct, construct];
        assert_eq!(resolve_name(&construct, &names, &constructs), Some("area"));
    }

    #[test]
    fn test_recover_name_order_and_reserved() {
        let patterns = vec![
            Regex::new(r"\A\s*function\s+(\w+)").unwrap(),
            Regex::new(r"\A\s*(\w+)\s*\(").unwrap(),
        ];
        let reserved = ["function"];

        assert_eq!(
            recover_name("function greet() {}", &patterns, &reserved),
            Some("greet".to_string())
        );
        assert_eq!(
            recover_name("handler(evt) { }", &patterns, &reserved),
            Some("handler".to_string())
        );
        // Keyword captured by the generic pattern is rejected
        assert_eq!(recover_name("function (a) { go(a) }", &patterns, &reserved), None);
    }
}
