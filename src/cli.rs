//! Command-line interface for algoscan.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::analyzer::Analyzer;
use crate::classify::Classifier;
use crate::config::{self, ScanConfig};
use crate::parser::LanguageRegistry;
use crate::report::{self, ReportOptions};
use crate::scan::Scanner;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Function inventory and algorithm classifier for source trees.
///
/// Algoscan finds every function, method, and class in Python, JavaScript
/// and TypeScript sources and scores how likely each one is to implement
/// nontrivial logic rather than glue code.
#[derive(Parser)]
#[command(name = "algoscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a repository and classify its functions
    Scan(ScanArgs),
    /// Analyze a single file
    File(FileArgs),
    /// Write a config file with the default settings
    Init(InitArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Repository root to scan
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Carry function source text through the pipeline
    #[arg(long)]
    pub include_source: bool,

    /// Analyze files in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Include the directory tree in the output
    #[arg(long)]
    pub tree: bool,

    /// Include concatenated file contents in the output
    #[arg(long)]
    pub contents: bool,

    /// Only list functions classified as algorithmic
    #[arg(long)]
    pub algorithms_only: bool,
}

/// Arguments for the file command.
#[derive(Parser)]
pub struct FileArgs {
    /// File to analyze
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Classify with source text available
    #[arg(long)]
    pub include_source: bool,

    /// Only list functions classified as algorithmic
    #[arg(long)]
    pub algorithms_only: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "algoscan.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

fn check_format(format: &str) -> bool {
    if format != "pretty" && format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", format);
        return false;
    }
    true
}

/// Load the explicit config, a discovered one, or the defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<ScanConfig> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => config::discover(),
    };

    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            ScanConfig::parse_file(&path)
                .map_err(|e| anyhow::anyhow!("parsing config {}: {}", path.display(), e))?
        }
        None => ScanConfig::default(),
    };

    config::validate(&config)?;
    Ok(config)
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    // Flags only ever switch features on
    config.include_source |= args.include_source;
    config.parallel |= args.parallel;

    let scanner = match Scanner::new(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    for failure in scanner.analyzer().registry().failures() {
        eprintln!("Warning: {}", failure);
    }

    let result = match scanner.scan(&args.path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let options = ReportOptions {
        show_tree: args.tree,
        show_contents: args.contents,
        algorithms_only: args.algorithms_only,
    };
    let path_str = args.path.to_string_lossy().to_string();

    match args.format.as_str() {
        "json" => report::write_json(&path_str, &result, options)?,
        _ => report::write_pretty(&path_str, &result, options),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the file command.
pub fn run_file(args: &FileArgs) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let analyzer = Analyzer::new(LanguageRegistry::new(), Classifier::new(config.rule_table()))
        .include_source(config.include_source || args.include_source);
    if !analyzer.is_available() {
        eprintln!("Error: no language backend available");
        return Ok(EXIT_ERROR);
    }

    let analysis = match analyzer.analyze_file(&args.path, None) {
        Ok(Some(a)) => a,
        Ok(None) => {
            eprintln!(
                "Error: unsupported file type: {} (supported: {})",
                args.path.display(),
                analyzer.registry().extensions().join(", ")
            );
            return Ok(EXIT_ERROR);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    match args.format.as_str() {
        "json" => report::write_file_json(&analysis)?,
        _ => report::write_file_pretty(&analysis, args.algorithms_only),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Use --force to overwrite or --output to choose another path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    let default = ScanConfig {
        rules: Some(Default::default()),
        ..Default::default()
    };
    let yaml = default.to_yaml()?;
    if let Err(e) = std::fs::write(&args.output, yaml) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to tune extensions, ignore list and rules", args.output.display());
    println!("  2. Run: algoscan scan . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
