//! Output formatting for scan results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{ClassificationMode, FileAnalysis, FunctionRecord, RepositoryAnalysis};
use crate::scan::{ScanResult, ScanWarning};

/// What to include beyond the summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub show_tree: bool,
    pub show_contents: bool,
    /// List only functions classified as algorithmic. Counts are unaffected.
    pub algorithms_only: bool,
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report for a repository scan.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_found: usize,
    pub file_counts: BTreeMap<String, usize>,
    pub total_characters: usize,
    /// Absent when no language backend was available.
    pub analysis: Option<RepositoryAnalysis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScanWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_tree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_contents: Option<String>,
}

impl JsonReport {
    pub fn new(path: &str, result: &ScanResult, options: ReportOptions) -> Self {
        let analysis = result.function_analysis.as_ref().map(|analysis| {
            if options.algorithms_only {
                algorithms_only(analysis)
            } else {
                analysis.clone()
            }
        });

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            path: path.to_string(),
            files_found: result.file_paths.len(),
            file_counts: result.file_counts.clone(),
            total_characters: result.total_characters,
            analysis,
            warnings: result.warnings.clone(),
            directory_tree: options.show_tree.then(|| result.directory_tree.clone()),
            file_contents: options.show_contents.then(|| result.file_contents.clone()),
        }
    }
}

/// Write a scan result in JSON format.
pub fn write_json(path: &str, result: &ScanResult, options: ReportOptions) -> anyhow::Result<()> {
    let report = JsonReport::new(path, result, options);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

/// Write a single-file analysis in JSON format.
pub fn write_file_json(analysis: &FileAnalysis) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(analysis)?;
    println!("{}", json);
    Ok(())
}

fn algorithms_only(analysis: &RepositoryAnalysis) -> RepositoryAnalysis {
    let mut filtered = analysis.clone();
    for file in &mut filtered.files {
        file.functions.retain(|f| f.is_algorithm);
    }
    filtered
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a scan result in pretty (human-readable) format.
pub fn write_pretty(path: &str, result: &ScanResult, options: ReportOptions) {
    write_header();

    print!("  {}", "Scanning:   ".dimmed());
    println!("{}", path);
    print!("  {}", "Files:      ".dimmed());
    println!("{}", format_file_counts(&result.file_counts));
    print!("  {}", "Characters: ".dimmed());
    println!("{}", result.total_characters);
    println!();

    match &result.function_analysis {
        Some(analysis) => {
            write_summary(analysis);
            println!();

            if !analysis.languages.is_empty() {
                write_languages(analysis);
                println!();
            }

            let listed: Vec<&FileAnalysis> = analysis
                .files
                .iter()
                .filter(|f| !options.algorithms_only || f.algorithm_count > 0)
                .collect();
            if !listed.is_empty() {
                println!("  {} ({}):", "Files".bold(), listed.len());
                println!();
                for file in listed {
                    write_file_functions(file, options.algorithms_only);
                }
            }
        }
        None => {
            println!(
                "  {}",
                "Function analysis unavailable (no language backend)".yellow()
            );
            println!();
        }
    }

    if !result.warnings.is_empty() {
        write_warnings(&result.warnings);
        println!();
    }

    if options.show_tree {
        println!("  {}", "Directory tree:".bold());
        println!();
        for line in result.directory_tree.lines() {
            println!("    {}", line);
        }
        println!();
    }

    if options.show_contents {
        println!("{}", result.file_contents);
    }
}

/// Write a single-file analysis in pretty format.
pub fn write_file_pretty(analysis: &FileAnalysis, algorithms_only: bool) {
    write_header();
    write_file_functions(analysis, algorithms_only);
    print!("  ");
    write_ratio(analysis.algorithm_count, analysis.function_count);
    println!();
}

fn write_header() {
    println!();
    print!("  ");
    print!("{}", "algoscan".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
}

fn format_file_counts(counts: &BTreeMap<String, usize>) -> String {
    let total = counts.get("total").copied().unwrap_or(0);
    let parts: Vec<String> = counts
        .iter()
        .filter(|(name, n)| name.as_str() != "total" && **n > 0)
        .map(|(name, n)| format!("{} {}", name, n))
        .collect();

    if parts.is_empty() {
        total.to_string()
    } else {
        format!("{} ({})", total, parts.join(", "))
    }
}

fn write_summary(analysis: &RepositoryAnalysis) {
    print!("  {} ", "Functions:".bold());
    print!("{}", analysis.total_functions);
    print!("  {} ", "Algorithms:".bold());
    write_ratio(analysis.total_algorithms, analysis.total_functions);
    print!("  {}", format!("in {} files", analysis.total_files).dimmed());
    println!();
}

fn write_ratio(algorithms: usize, functions: usize) {
    let pct = if functions == 0 {
        0.0
    } else {
        algorithms as f64 * 100.0 / functions as f64
    };
    print!("{}", algorithms.to_string().green().bold());
    print!("{}", format!(" ({:.1}%)", pct).dimmed());
}

fn write_languages(analysis: &RepositoryAnalysis) {
    println!("  {}", "Languages:".bold());
    for (language, stats) in &analysis.languages {
        println!(
            "    {:<12} {:>5} files {:>6} functions {:>5} algorithms",
            language, stats.files, stats.functions, stats.algorithms
        );
    }
}

fn write_file_functions(file: &FileAnalysis, algorithms_only: bool) {
    print!("    {}", file.path.blue());
    print!("{}", format!("  {} ", file.language).dimmed());
    if file.classification_mode == ClassificationMode::NameOnly {
        print!("{}", "(name only) ".dimmed());
    }
    println!(
        "{}",
        format!("{} functions, {} algorithms", file.function_count, file.algorithm_count).dimmed()
    );

    if let Some(error) = &file.parse_error {
        println!("      {} {}", "PARSE".red(), error);
    }

    for func in file.functions.iter().filter(|f| !algorithms_only || f.is_algorithm) {
        write_function(func);
    }
    println!();
}

fn write_function(func: &FunctionRecord) {
    if func.is_algorithm {
        print!("      {} ", "ALGO".green());
    } else {
        print!("      {} ", "    ".normal());
    }
    print!("{:<28}", func.name);
    print!("{:<16}", func.kind.dimmed());
    print!("{}", format!("{:>5}-{:<5}", func.start_line, func.end_line).dimmed());
    print!(" {:>5.1}", func.algorithm_score);
    if func.is_algorithm {
        print!("  {}", func.classification_reason.dimmed());
    }
    println!();
}

fn write_warnings(warnings: &[ScanWarning]) {
    println!("  {} ({}):", "Warnings".yellow().bold(), warnings.len());
    for w in warnings {
        print!("    {} ", "WARN".yellow());
        print!("{}", w.path.blue());
        println!("  {}", w.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, algo: bool) -> FunctionRecord {
        let mut r = FunctionRecord::new(name, "function", 1, 5);
        r.is_algorithm = algo;
        r
    }

    fn scan_result() -> ScanResult {
        let mut analysis = RepositoryAnalysis::new();
        analysis.add_file(FileAnalysis::new(
            "a.py",
            "python",
            vec![record("quicksort", true), record("get_value", false)],
            ClassificationMode::Full,
        ));

        let mut file_counts = BTreeMap::new();
        file_counts.insert("python".to_string(), 1);
        file_counts.insert("total".to_string(), 1);

        ScanResult {
            file_paths: vec!["a.py".into()],
            file_counts,
            directory_tree: "repo/\n└── a.py".to_string(),
            file_contents: "contents".to_string(),
            total_characters: 8,
            function_analysis: Some(analysis),
            warnings: vec![],
        }
    }

    #[test]
    fn test_json_report_defaults() {
        let report = JsonReport::new("repo", &scan_result(), ReportOptions::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["files_found"], 1);
        assert_eq!(json["analysis"]["total_functions"], 2);
        assert_eq!(json["analysis"]["files"][0]["functions"][0]["type"], "function");
        assert!(json.get("directory_tree").is_none());
        assert!(json.get("file_contents").is_none());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn test_json_report_algorithms_only() {
        let options = ReportOptions {
            algorithms_only: true,
            show_tree: true,
            ..Default::default()
        };
        let report = JsonReport::new("repo", &scan_result(), options);
        let analysis = report.analysis.unwrap();

        assert_eq!(analysis.files[0].functions.len(), 1);
        assert_eq!(analysis.files[0].functions[0].name, "quicksort");
        // Totals still describe the whole file
        assert_eq!(analysis.files[0].function_count, 2);
        assert_eq!(report.directory_tree.as_deref(), Some("repo/\n└── a.py"));
    }

    #[test]
    fn test_format_file_counts() {
        let mut counts = BTreeMap::new();
        counts.insert("javascript".to_string(), 0);
        counts.insert("python".to_string(), 3);
        counts.insert("typescript".to_string(), 2);
        counts.insert("total".to_string(), 5);
        assert_eq!(format_file_counts(&counts), "5 (python 3, typescript 2)");

        let mut empty = BTreeMap::new();
        empty.insert("total".to_string(), 0);
        assert_eq!(format_file_counts(&empty), "0");
    }
}
