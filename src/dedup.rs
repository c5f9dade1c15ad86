//! Span deduplication of raw extraction candidates.
//!
//! Queries overlap on purpose, so the same construct is often reported more
//! than once. Two different constructs never share an exact line span while
//! a construct reported twice always does, which makes `(start_line,
//! end_line)` the identity key.

use std::collections::HashSet;

use tracing::trace;

use crate::model::{Candidate, FunctionRecord};

/// Collapse candidates to one record per line span.
///
/// The first candidate seen for a span supplies its name and kind. Output
/// is sorted by `start_line`; the sort is stable so candidates starting on
/// the same line keep their query order.
pub fn dedup_candidates(candidates: Vec<Candidate>) -> Vec<FunctionRecord> {
    let mut seen = HashSet::with_capacity(candidates.len());
    let mut records: Vec<FunctionRecord> = candidates
        .into_iter()
        .filter(|c| {
            let first = seen.insert((c.span.start_line, c.span.end_line));
            if !first {
                trace!(name = %c.name, query = c.query, span = %c.span, "duplicate span dropped");
            }
            first
        })
        .map(|c| FunctionRecord::new(c.name, c.kind, c.span.start_line, c.span.end_line))
        .collect();

    records.sort_by_key(|r| r.start_line);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Span;

    fn candidate(name: &str, kind: &str, start: usize, end: usize) -> Candidate {
        Candidate {
            name: name.to_string(),
            kind: kind.to_string(),
            span: Span::new(start * 10, end * 10, start, end),
            query: "test",
        }
    }

    #[test]
    fn test_same_span_from_two_queries() {
        let records = dedup_candidates(vec![
            candidate("area", "function", 3, 6),
            candidate("area", "declaration", 3, 6),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, "function");
        assert_eq!(records[0].line_count, 4);
    }

    #[test]
    fn test_first_seen_name_wins() {
        let records = dedup_candidates(vec![
            candidate("anonymous", "lambda", 2, 2),
            candidate("square", "lambda", 2, 2),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "anonymous");
    }

    #[test]
    fn test_nested_spans_are_kept() {
        let records = dedup_candidates(vec![
            candidate("inner", "function", 5, 7),
            candidate("Outer", "class", 1, 10),
            candidate("other", "function", 5, 8),
        ]);

        let keys: Vec<_> = records.iter().map(|r| r.span_key()).collect();
        assert_eq!(keys, vec![(1, 10), (5, 7), (5, 8)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_candidates(Vec::new()).is_empty());
    }
}
