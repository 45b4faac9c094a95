//! dirlens - a directory tree inspector.
//!
//! Usage:
//!   dirlens <PATH>               Full report: extension summary, directory
//!                                rollups, largest files, duplicate groups
//!   dirlens duplicates <PATH>    Duplicate report only
//!   dirlens export <PATH>        Export scan results and duplicates as JSON
//!   dirlens --help               Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail};

use dirlens_analyze::{DuplicateConfig, DuplicateFinder, DuplicateReport};
use dirlens_core::{DirStats, ExtKey, ExtStats, ScanResult};
use dirlens_scan::{ScanConfig, scan};

#[derive(Parser)]
#[command(
    name = "dirlens",
    version,
    about = "Inspect a directory tree: extension stats, size rollups, largest files, duplicates",
    long_about = "dirlens walks a directory tree once and reports aggregate statistics by \
                  file extension, recursive per-directory size rollups, the largest files, \
                  and probable duplicate files confirmed by content hashing."
)]
struct Cli {
    /// Directory to scan (required unless a subcommand is given)
    path: Option<PathBuf>,

    /// Number of largest files to show
    #[arg(long, default_value = "10")]
    top: usize,

    /// Extensions shown per directory in the breakdown
    #[arg(long, default_value = "8")]
    ext_top: usize,

    /// Maximum duplicate groups to show
    #[arg(long, default_value = "5")]
    groups: usize,

    /// Entry names to skip during the walk (repeatable, simple globs)
    #[arg(long)]
    ignore: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Find duplicate files only
    Duplicates {
        /// Directory to scan
        path: PathBuf,

        /// Maximum number of duplicate groups to show
        #[arg(short = 'n', long, default_value = "20")]
        top: usize,
    },

    /// Export scan results and duplicates as JSON
    Export {
        /// Directory to scan
        path: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Duplicates { path, top }) => run_duplicates(&path, top),
        Some(Command::Export { path, output }) => run_export(&path, output),
        None => run_report(&cli),
    }
}

/// Scan the tree and print the full report.
fn run_report(cli: &Cli) -> Result<()> {
    let Some(path) = cli.path.as_deref() else {
        bail!("missing required argument: the directory to scan");
    };
    let result = run_scan(path, &cli.ignore)?;

    print_extension_summary(&result);
    print_directory_summary(&result, cli.ext_top);
    print_largest_files(&result, cli.top);

    let config = DuplicateConfig::builder()
        .max_groups(cli.groups)
        .build()
        .expect("duplicate config defaults are valid");
    let report = DuplicateFinder::with_config(config).find_duplicates(&result);
    print_duplicates(&report, cli.groups);

    print_warning_count(&result);
    Ok(())
}

/// Scan the tree and print only the duplicate report.
fn run_duplicates(path: &Path, top: usize) -> Result<()> {
    let result = run_scan(path, &[])?;

    let config = DuplicateConfig::builder()
        .max_groups(top)
        .build()
        .expect("duplicate config defaults are valid");
    let report = DuplicateFinder::with_config(config).find_duplicates(&result);

    println!();
    println!("{}", "─".repeat(70));
    println!(" Duplicate File Report");
    println!("{}", "─".repeat(70));
    println!();

    if report.groups.is_empty() {
        println!(" No duplicate files found (by size + content hash).");
    } else {
        println!(
            " Found {} duplicate group(s) ({} files)",
            report.group_count, report.files_with_duplicates
        );
        println!(
            " Total wasted space: {}",
            format_size(report.total_wasted_space)
        );
        println!();

        for (i, group) in report.groups.iter().enumerate() {
            println!(
                " Group {} ({} files, {} each, {} wasted)",
                i + 1,
                group.count(),
                format_size(group.size),
                format_size(group.wasted_bytes)
            );
            for path in &group.paths {
                println!("   {}", path.display());
            }
            println!();
        }
    }

    print_warning_count(&result);
    Ok(())
}

/// Scan the tree and export everything as JSON.
fn run_export(path: &Path, output: Option<PathBuf>) -> Result<()> {
    let result = run_scan(path, &[])?;
    let report = DuplicateFinder::new().find_duplicates(&result);

    let json = serde_json::to_string_pretty(&serde_json::json!({
        "scan": result,
        "duplicates": report,
    }))?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)
                .with_context(|| format!("writing {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Validate the root and run the walk.
fn run_scan(path: &Path, ignore: &[String]) -> Result<ScanResult> {
    eprintln!("Scanning {} ...", path.display());

    let config = ScanConfig::builder()
        .root(path)
        .ignore_patterns(ignore.to_vec())
        .build()
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;

    scan(&config).context("scan failed")
}

fn print_extension_summary(result: &ScanResult) {
    println!();
    println!("=== File Types Summary (All Subfolders) ===");
    println!("Total files: {}", result.total_files);
    println!("Total size:  {}", format_size(result.total_size));
    println!();

    let header = format!("{:<12} {:>8} {:>15}", "Extension", "Count", "Total Size");
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    for (key, stats) in sorted_by_size(&result.ext_stats) {
        println!(
            "{:<12} {:>8} {:>15}",
            key.as_str(),
            stats.count,
            format_size(stats.size)
        );
    }
}

fn print_directory_summary(result: &ScanResult, ext_top: usize) {
    println!();
    println!("=== Directory Summary (All Subfolders, sorted by total size) ===");

    let header = format!("{:<60} {:>10} {:>15}", "Directory", "Files", "Total Size");
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    let mut dirs: Vec<(&PathBuf, &DirStats)> = result.dir_stats.iter().collect();
    dirs.sort_by(|a, b| b.1.size.cmp(&a.1.size).then_with(|| a.0.cmp(b.0)));

    for (dir, stats) in dirs {
        println!(
            "{:<60} {:>10} {:>15}",
            dir.display().to_string(),
            stats.count,
            format_size(stats.size)
        );

        let exts = sorted_by_size(&stats.by_ext);
        for (key, ext_stats) in exts.iter().take(ext_top) {
            let pct = if stats.size > 0 {
                ext_stats.size as f64 / stats.size as f64 * 100.0
            } else {
                0.0
            };
            println!(
                "    {:<10} {:>8} {:>12}  {:>5.1}%",
                key.as_str(),
                ext_stats.count,
                format_size(ext_stats.size),
                pct
            );
        }
        if exts.len() > ext_top {
            println!("    ... and {} more extension(s)", exts.len() - ext_top);
        }
        println!();
    }
}

fn print_largest_files(result: &ScanResult, top: usize) {
    println!();
    println!("=== Largest Files ===");

    let largest = result.largest_files(top);
    if largest.is_empty() {
        println!("No files found.");
        return;
    }

    let header = format!("{:>15}  Path", "Size");
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    for record in largest {
        println!("{:>15}  {}", format_size(record.size), record.path.display());
    }
}

fn print_duplicates(report: &DuplicateReport, max_groups: usize) {
    println!();
    println!("=== Possible Duplicates ===");

    if report.groups.is_empty() {
        println!("No likely duplicates found (at least by size + content hash).");
        return;
    }

    println!("Showing up to {max_groups} groups of duplicates:");
    println!();

    for (i, group) in report.groups.iter().enumerate() {
        println!("Group {} ({} files):", i + 1, group.count());
        for path in &group.paths {
            println!("  - {}", path.display());
        }
        println!();
    }
}

fn print_warning_count(result: &ScanResult) {
    if result.has_warnings() {
        println!();
        println!("{} entry(ies) skipped during scan", result.warnings.len());
    }
}

/// Sort an extension table by total size descending, key ascending on ties.
fn sorted_by_size(stats: &std::collections::HashMap<ExtKey, ExtStats>) -> Vec<(&ExtKey, &ExtStats)> {
    let mut entries: Vec<(&ExtKey, &ExtStats)> = stats.iter().collect();
    entries.sort_by(|a, b| b.1.size.cmp(&a.1.size).then_with(|| a.0.cmp(b.0)));
    entries
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
