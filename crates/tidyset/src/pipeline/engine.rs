//! The cleaning engine.
//!
//! Runs the stages in a fixed order:
//! normalize -> analyze (before) -> deduplicate -> infer types -> impute ->
//! analyze (after) -> summarize.

use crate::cleaner::{count_duplicates, normalize_placeholders, resolve_duplicates};
use crate::config::CleaningConfig;
use crate::error::{Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::profiler::TypeInferencer;
use crate::quality::MissingValueAnalyzer;
use crate::reporting::{SummaryBuilder, SummaryParts};
use crate::types::{CleaningSummary, ColumnProfile};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// What cleaning would find, without changing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningPreview {
    pub row_count: usize,
    pub column_count: usize,
    pub duplicate_count: usize,
    pub placeholders_found: usize,
    /// Profiles computed after placeholder normalization.
    pub profiles: Vec<ColumnProfile>,
}

/// Configured cleaning engine.
///
/// The engine holds no per-run state; one instance can clean any number of
/// tables.
#[derive(Debug, Clone)]
pub struct CleaningEngine {
    config: CleaningConfig,
    inferencer: TypeInferencer,
    analyzer: MissingValueAnalyzer,
}

impl Default for CleaningEngine {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}

impl CleaningEngine {
    pub fn new(config: CleaningConfig) -> Self {
        Self {
            inferencer: TypeInferencer::new(config.numeric_threshold),
            analyzer: MissingValueAnalyzer::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a table, dropping duplicates according to the configuration.
    pub fn clean_default(&self, df: &DataFrame) -> Result<(DataFrame, CleaningSummary)> {
        self.clean(df, self.config.drop_duplicates)
    }

    /// Clean a table.
    ///
    /// The input is not modified. The returned table has no missing cells,
    /// and when `drop_duplicates` is set, no exact duplicate rows.
    pub fn clean(
        &self,
        df: &DataFrame,
        drop_duplicates: bool,
    ) -> Result<(DataFrame, CleaningSummary)> {
        info!(
            "Starting cleaning: {} rows x {} columns",
            df.height(),
            df.width()
        );
        let original_row_count = df.height();

        info!("Step 1: Normalizing placeholder values...");
        let (normalized, placeholders_replaced) =
            normalize_placeholders(df, &self.config.placeholders)
                .context("Normalizing placeholders")?;

        info!("Step 2: Analyzing missing values...");
        let profiles_before = self.analyzer.analyze(&normalized)?;

        info!("Step 3: Resolving duplicate rows...");
        let (deduped, dropped_duplicate_count) =
            resolve_duplicates(&normalized, drop_duplicates).context("Resolving duplicates")?;

        info!("Step 4: Inferring column types...");
        let (typed, type_decisions) = self
            .inferencer
            .infer_types(&deduped)
            .context("Inferring column types")?;

        info!("Step 5: Imputing missing values...");
        let (cleaned, imputations) = StatisticalImputer::impute_all(&typed, &type_decisions)
            .context("Imputing missing values")?;

        info!("Step 6: Final analysis after cleaning...");
        let profiles_after = self.analyzer.analyze(&cleaned)?;

        let summary = SummaryBuilder::build(SummaryParts {
            original_row_count,
            cleaned_row_count: cleaned.height(),
            column_count: cleaned.width(),
            dropped_duplicate_count,
            placeholders_replaced,
            profiles_before,
            profiles_after,
            type_decisions,
            imputations,
        });

        info!(
            "Cleaning complete: {} duplicates dropped, {} cells imputed, quality {:.2} -> {:.2}",
            summary.dropped_duplicate_count,
            summary.cells_imputed(),
            summary.quality_score_before,
            summary.quality_score_after
        );

        Ok((cleaned, summary))
    }

    /// Profile a table as it is, with no normalization.
    pub fn analyze(&self, df: &DataFrame) -> Result<Vec<ColumnProfile>> {
        self.analyzer.analyze(df)
    }

    /// Report what cleaning would find: placeholders, duplicates and missing
    /// values after normalization.
    pub fn preview(&self, df: &DataFrame) -> Result<CleaningPreview> {
        let (normalized, placeholders_found) =
            normalize_placeholders(df, &self.config.placeholders)?;
        let duplicate_count = count_duplicates(&normalized)?;
        let profiles = self.analyzer.analyze(&normalized)?;

        Ok(CleaningPreview {
            row_count: df.height(),
            column_count: df.width(),
            duplicate_count,
            placeholders_found,
            profiles,
        })
    }
}

static_assertions::assert_impl_all!(CleaningEngine: Send, Sync);

/// Clean a table with the default configuration.
pub fn clean(df: &DataFrame, drop_duplicates: bool) -> Result<(DataFrame, CleaningSummary)> {
    CleaningEngine::default().clean(df, drop_duplicates)
}

/// Profile a table with the default configuration.
pub fn analyze(df: &DataFrame) -> Result<Vec<ColumnProfile>> {
    CleaningEngine::default().analyze(df)
}
