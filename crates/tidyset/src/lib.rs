//! Tabular Data Cleaning Library
//!
//! Deterministic cleaning of tabular datasets built on Polars.
//!
//! # Overview
//!
//! A cleaning run takes a [`DataFrame`](polars::prelude::DataFrame) through a
//! fixed sequence of stages:
//!
//! - **Placeholder normalization**: tokens such as `N/A`, `unknown` or `?`
//!   become missing values
//! - **Missing-value analysis**: per-column missing counts and percentages,
//!   before and after cleaning
//! - **Duplicate removal**: exact full-row duplicates, first occurrence kept
//! - **Type inference**: numeric / categorical / datetime per column, with
//!   numeric text converted to numbers
//! - **Imputation**: median, mode or earliest value by column kind
//! - **Summary**: before/after quality scores for the whole table
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tidyset::{clean, analyze};
//!
//! let df = tidyset::io::read_csv("data.csv")?;
//!
//! // Profile only
//! for profile in analyze(&df)? {
//!     println!("{}: {:.1}% missing", profile.name, profile.missing_pct);
//! }
//!
//! // Full cleaning, dropping exact duplicate rows
//! let (cleaned, summary) = clean(&df, true)?;
//! println!(
//!     "Quality {:.2} -> {:.2}",
//!     summary.quality_score_before, summary.quality_score_after
//! );
//! ```
//!
//! # Configuration
//!
//! Use [`CleaningConfig`] for non-default placeholder tokens or thresholds:
//!
//! ```rust,ignore
//! use tidyset::{CleaningConfig, CleaningEngine};
//!
//! let config = CleaningConfig::builder()
//!     .placeholder("missing")     // treat "missing" as a placeholder too
//!     .numeric_threshold(0.9)     // 90% of cells must parse as numbers
//!     .build()?;
//!
//! let (cleaned, summary) = CleaningEngine::new(config).clean(&df, true)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{count_duplicates, normalize_placeholders, resolve_duplicates};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, DEFAULT_NUMERIC_THRESHOLD,
    DEFAULT_PLACEHOLDER_TOKENS, PlaceholderSet,
};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use io::{CsvCleaningReport, DatasetOverview, clean_csv, read_csv, write_csv};
pub use pipeline::{CleaningEngine, CleaningPreview, analyze, clean};
pub use profiler::TypeInferencer;
pub use quality::{MissingValueAnalyzer, sorted_by_missing};
pub use reporting::SummaryBuilder;
pub use types::{CleaningSummary, ColumnKind, ColumnProfile, ImputationRecord, TypeDecision};
