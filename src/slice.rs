//! Code slice extraction by line range.

/// Return the text of lines `start_line..=end_line` (1-indexed).
///
/// Leading and trailing blank lines are trimmed, interior ones are kept.
/// Out-of-range bounds are clamped to the file; an empty or inverted range
/// yields an empty string.
pub fn extract_lines(source: &str, start_line: usize, end_line: usize) -> String {
    let lines: Vec<&str> = source.split('\n').collect();

    let start_idx = start_line.saturating_sub(1);
    let end_idx = end_line.min(lines.len());
    if start_idx >= end_idx {
        return String::new();
    }

    let mut slice = &lines[start_idx..end_idx];
    while let Some((first, rest)) = slice.split_first() {
        if !first.trim().is_empty() {
            break;
        }
        slice = rest;
    }
    while let Some((last, rest)) = slice.split_last() {
        if !last.trim().is_empty() {
            break;
        }
        slice = rest;
    }

    slice.join("\n")
}
