//! Scan byproducts: file counts by category and the concatenated contents dump.

use std::collections::BTreeMap;
use std::path::Path;

use phf::phf_map;

/// Extension (lower-case, leading dot) to reporting category.
static CATEGORIES: phf::Map<&'static str, &'static str> = phf_map! {
    ".py" => "python",
    ".js" => "javascript",
    ".jsx" => "javascript",
    ".mjs" => "javascript",
    ".ts" => "typescript",
    ".tsx" => "typescript",
};

/// Categories always present in [`count_by_category`] output.
pub const CATEGORY_NAMES: &[&str] = &["javascript", "python", "typescript"];

/// Key holding the number of all found files.
pub const TOTAL_KEY: &str = "total";

/// Width of the `=` rule around each file in the contents dump.
pub const BANNER_WIDTH: usize = 60;

/// Reporting category for an extension, if it has one.
pub fn category_for(ext: &str) -> Option<&'static str> {
    CATEGORIES.get(ext.to_lowercase().as_str()).copied()
}

/// Count files per category. Files with an uncategorized extension only
/// count towards the total.
pub fn count_by_category<P: AsRef<Path>>(paths: &[P]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = CATEGORY_NAMES
        .iter()
        .chain(std::iter::once(&TOTAL_KEY))
        .map(|name| (name.to_string(), 0))
        .collect();

    for path in paths {
        let category = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| category_for(&format!(".{}", e)));
        if let Some(category) = category {
            *counts.entry(category.to_string()).or_insert(0) += 1;
        }
        *counts.entry(TOTAL_KEY.to_string()).or_insert(0) += 1;
    }

    counts
}

/// One file's section of the contents dump.
pub fn file_section(relative_path: &str, content: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!(
        "\n{rule}\nFILE: {relative_path}\n{rule}\n\n{content}\n\n{rule}\n",
        rule = rule,
        relative_path = relative_path,
        content = content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_category_for() {
        assert_eq!(category_for(".py"), Some("python"));
        assert_eq!(category_for(".JSX"), Some("javascript"));
        assert_eq!(category_for(".tsx"), Some("typescript"));
        assert_eq!(category_for(".rs"), None);
    }

    #[test]
    fn test_count_by_category() {
        let paths = vec![
            PathBuf::from("a.py"),
            PathBuf::from("b/c.js"),
            PathBuf::from("d.jsx"),
            PathBuf::from("e.ts"),
            PathBuf::from("f.vue"),
        ];
        let counts = count_by_category(&paths);

        assert_eq!(counts["python"], 1);
        assert_eq!(counts["javascript"], 2);
        assert_eq!(counts["typescript"], 1);
        assert_eq!(counts["total"], 5);
    }

    #[test]
    fn test_count_empty_has_all_keys() {
        let counts = count_by_category::<PathBuf>(&[]);
        assert_eq!(counts.len(), 4);
        assert!(counts.values().all(|&n| n == 0));
    }

    #[test]
    fn test_file_section() {
        let section = file_section("src/a.py", "x = 1");
        let rule = "=".repeat(60);
        assert_eq!(
            section,
            format!("\n{0}\nFILE: src/a.py\n{0}\n\nx = 1\n\n{0}\n", rule)
        );
    }
}
