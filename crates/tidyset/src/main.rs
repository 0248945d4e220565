//! CLI entry point for the cleaning engine.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tidyset::io::default_output_path;
use tidyset::{
    CleaningConfig, CleaningEngine, CleaningPreview, CsvCleaningReport, clean_csv, read_csv,
    sorted_by_missing,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Deterministic cleaning for CSV datasets",
    long_about = "Normalizes placeholder values, removes duplicate rows, infers column \
                  types and fills missing values, then reports before/after quality.\n\n\
                  EXAMPLES:\n  \
                  # Clean a file into ./outputs/sales_cleaned.csv\n  \
                  tidyset -i sales.csv\n\n  \
                  # Preview without writing anything\n  \
                  tidyset -i sales.csv --preview\n\n  \
                  # Treat extra tokens as missing and keep duplicates\n  \
                  tidyset -i sales.csv --placeholder tbd --placeholder pending --keep-duplicates"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Path of the cleaned CSV file
    ///
    /// Defaults to ./outputs/<input_name>_cleaned.csv
    #[arg(short, long)]
    output: Option<String>,

    /// Keep exact duplicate rows
    #[arg(long)]
    keep_duplicates: bool,

    /// Extra token to treat as a missing value (repeatable)
    #[arg(long = "placeholder", value_name = "TOKEN")]
    placeholders: Vec<String>,

    /// Share of parseable cells (0.0 - 1.0] at which a text column becomes numeric
    #[arg(long, default_value = "0.8")]
    numeric_threshold: f64,

    /// Show what cleaning would find without writing any file
    #[arg(long)]
    preview: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logs; only the final JSON document is printed.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings, errors and the final result
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = args
        .placeholders
        .iter()
        .fold(CleaningConfig::builder(), |builder, token| {
            builder.placeholder(token)
        })
        .numeric_threshold(args.numeric_threshold)
        .drop_duplicates(!args.keep_duplicates)
        .build()?;

    if args.preview {
        return run_preview(&args, config);
    }

    let output = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(&args.input, "./outputs"));

    let report = match clean_csv(&args.input, &output, &config, config.drop_duplicates) {
        Ok(report) => report,
        Err(e) if e.is_input_error() => {
            error!("Input rejected [{}]: {}", e.error_code(), e);
            return Err(anyhow!("Input rejected: {}", e));
        }
        Err(e) => {
            error!("Cleaning failed [{}]: {}", e.error_code(), e);
            return Err(anyhow!("Cleaning failed: {}", e));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&report);
    Ok(())
}

/// Analyze the input and print the findings.
///
/// Uses `println!` for user-facing output so it is visible at any log level.
fn run_preview(args: &Args, config: CleaningConfig) -> Result<()> {
    let data = read_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let preview = CleaningEngine::new(config).preview(&data)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    print_preview(&args.input, &preview, !args.keep_duplicates);
    Ok(())
}

fn print_preview(input: &str, preview: &CleaningPreview, drop_duplicates: bool) {
    println!("\n{}", "=".repeat(80));
    println!("PREVIEW - What cleaning would change");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", input);
    println!("  Rows: {}", preview.row_count);
    println!("  Columns: {}", preview.column_count);
    println!("  Placeholder cells: {}", preview.placeholders_found);
    if preview.duplicate_count == 0 {
        println!("  No duplicate rows found");
    } else if drop_duplicates {
        println!("  Will remove {} duplicate rows", preview.duplicate_count);
    } else {
        println!(
            "  {} duplicate rows (kept: --keep-duplicates)",
            preview.duplicate_count
        );
    }
    println!();

    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<24} {:<14} {:<12} {:<10} {:<8}",
        "Column", "Type", "Kind", "Missing %", "Unique"
    );
    println!("{}", "-".repeat(70));
    for col in sorted_by_missing(&preview.profiles) {
        println!(
            "{:<24} {:<14} {:<12} {:<10.1} {:<8}",
            truncate_str(&col.name, 23),
            truncate_str(&col.dtype, 13),
            col.inferred_kind,
            col.missing_pct,
            col.unique_count
        );
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("To clean the file, run without --preview");
    println!("{}", "=".repeat(80));
}

fn print_human_readable_summary(report: &CsvCleaningReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns, {:.2}% missing)",
        report.input_path, report.overview.rows, report.overview.columns, report.overview.missing_pct
    );
    println!(
        "        {} numeric, {} categorical columns",
        report.overview.numeric_cols, report.overview.categorical_cols
    );
    println!(
        "Output: {} ({} rows x {} columns)",
        report.output_path, summary.cleaned_row_count, summary.column_count
    );
    println!();

    println!("Cleaning Summary:");
    println!(
        "  Rows: {} -> {} ({} duplicates removed, {:.1}%)",
        summary.original_row_count,
        summary.cleaned_row_count,
        summary.dropped_duplicate_count,
        summary.dropped_duplicate_percentage()
    );
    println!("  Cells normalized to missing: {}", summary.placeholders_replaced);
    println!(
        "  Missing cells: {} -> {}",
        summary.missing_total_before, summary.missing_total_after
    );
    println!(
        "  Data Quality: {:.2} -> {:.2} ({:+.2})",
        summary.quality_score_before, summary.quality_score_after, summary.improvement
    );
    println!();

    if !summary.imputations.is_empty() {
        println!("Imputations:");
        for record in &summary.imputations {
            println!(
                "  - {}: {} cells filled with {} '{}'{}",
                record.column,
                record.cells_filled,
                record.kind.imputation_method(),
                record.fill_value,
                if record.used_fallback { " (no observed values)" } else { "" }
            );
        }
        println!();
    }

    let coerced: Vec<_> = summary
        .type_decisions
        .iter()
        .filter(|d| d.coerced_to_numeric)
        .collect();
    if !coerced.is_empty() {
        println!("Converted to numeric:");
        for decision in coerced {
            println!(
                "  - {} ({} unparseable cells set to missing)",
                decision.column, decision.unparseable_cells
            );
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
