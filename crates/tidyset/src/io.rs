//! CSV ingestion and export around the cleaning engine.
//!
//! Reading failures are reported before any cleaning happens: a missing file
//! is an I/O error, content that cannot be parsed into a rectangular table is
//! [`CleaningError::MalformedInput`].

use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result, ResultExt};
use crate::pipeline::CleaningEngine;
use crate::types::CleaningSummary;
use crate::utils::{is_numeric_dtype, missing_count, percentage, round_to};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Read a CSV file with a header row into a table.
///
/// The schema is inferred from every row, so a placeholder token late in a
/// numeric column turns the column into text instead of failing the read.
/// Date-like text columns are parsed into temporal dtypes.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(CleaningError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .map_err(|e| CleaningError::MalformedInput(format!("{}: {}", path.display(), e)))?;

    info!(
        "Loaded {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write a table to CSV with a header row, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)
        .context(format!("Writing {}", path.display()))?;

    info!("Saved cleaned dataset to: {}", path.display());
    Ok(())
}

/// Default output path for a cleaned copy of `input`: `<dir>/<stem>_cleaned.csv`.
pub fn default_output_path(input: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> PathBuf {
    let stem = input
        .as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    output_dir.as_ref().join(format!("{}_cleaned.csv", stem))
}

// ============================================================================
// Reports
// ============================================================================

/// Headline figures of a table, as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    /// Missing cells (null or NaN) over all cells, in percent with two decimals.
    pub missing_pct: f64,
    /// Number of columns with a numeric dtype.
    pub numeric_cols: usize,
    /// Number of the remaining columns.
    pub categorical_cols: usize,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
}

impl DatasetOverview {
    pub fn from_table(df: &DataFrame) -> Result<Self> {
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        let mut missing = 0;

        for column in df.get_columns() {
            missing += missing_count(column.as_materialized_series())?;
            let name = column.name().to_string();
            if is_numeric_dtype(column.dtype()) {
                numeric_columns.push(name);
            } else {
                categorical_columns.push(name);
            }
        }

        Ok(Self {
            rows: df.height(),
            columns: df.width(),
            missing_pct: round_to(percentage(missing, df.height() * df.width()), 2),
            numeric_cols: numeric_columns.len(),
            categorical_cols: categorical_columns.len(),
            numeric_columns,
            categorical_columns,
        })
    }
}

/// Result of cleaning one CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvCleaningReport {
    pub generated_at: String,
    pub input_path: String,
    pub output_path: String,
    /// Figures of the raw input.
    #[serde(flatten)]
    pub overview: DatasetOverview,
    pub summary: CleaningSummary,
}

/// Read `input`, clean it and write the result to `output`.
pub fn clean_csv(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &CleaningConfig,
    drop_duplicates: bool,
) -> Result<CsvCleaningReport> {
    let input = input.as_ref();
    let output = output.as_ref();

    let raw = read_csv(input)?;
    let overview = DatasetOverview::from_table(&raw)?;

    let engine = CleaningEngine::new(config.clone());
    let (mut cleaned, summary) = engine.clean(&raw, drop_duplicates)?;
    write_csv(&mut cleaned, output)?;

    Ok(CsvCleaningReport {
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        input_path: input.display().to_string(),
        output_path: output.display().to_string(),
        overview,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_from_table() {
        let df = df![
            "n" => [Some(1i64), None, Some(3), Some(4)],
            "s" => [Some("a"), Some("b"), None, None],
            "x" => [Some(0.5), Some(f64::NAN), Some(1.5), Some(2.5)],
        ]
        .unwrap();

        let overview = DatasetOverview::from_table(&df).unwrap();

        assert_eq!(overview.rows, 4);
        assert_eq!(overview.columns, 3);
        // 4 missing cells (one of them NaN) over 12
        assert_eq!(overview.missing_pct, 33.33);
        assert_eq!(overview.numeric_cols, 2);
        assert_eq!(overview.categorical_cols, 1);
        assert_eq!(overview.numeric_columns, vec!["n", "x"]);
        assert_eq!(overview.categorical_columns, vec!["s"]);

        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["numeric_cols"], 2);
        assert_eq!(json["categorical_cols"], 1);
    }

    #[test]
    fn test_overview_empty_table() {
        let overview = DatasetOverview::from_table(&DataFrame::empty()).unwrap();
        assert_eq!(overview.rows, 0);
        assert_eq!(overview.missing_pct, 0.0);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path("data/raw/sales.csv", "outputs"),
            PathBuf::from("outputs/sales_cleaned.csv")
        );
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_csv("does/not/exist.csv").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
