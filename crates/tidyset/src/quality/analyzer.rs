//! Missing-value analysis.
//!
//! Produces one [`ColumnProfile`] per column: missing count and percentage,
//! distinct values, dtype label, inferred kind and a few sample values.
//! Float NaN counts as missing.

use crate::config::{CleaningConfig, DEFAULT_SAMPLE_SIZE};
use crate::error::Result;
use crate::profiler::TypeInferencer;
use crate::types::ColumnProfile;
use crate::utils::{distinct_samples, dtype_label, nan_to_null, percentage, round_to};
use polars::prelude::*;

/// Builds missing-value profiles for every column of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingValueAnalyzer {
    inferencer: TypeInferencer,
    sample_size: usize,
}

impl Default for MissingValueAnalyzer {
    fn default() -> Self {
        Self {
            inferencer: TypeInferencer::default(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl MissingValueAnalyzer {
    pub fn new(inferencer: TypeInferencer, sample_size: usize) -> Self {
        Self {
            inferencer,
            sample_size,
        }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self::new(
            TypeInferencer::new(config.numeric_threshold),
            config.sample_size,
        )
    }

    /// Profile every column, in table column order.
    pub fn analyze(&self, df: &DataFrame) -> Result<Vec<ColumnProfile>> {
        let row_count = df.height();
        df.get_columns()
            .iter()
            .map(|column| self.profile_column(column.as_materialized_series(), row_count))
            .collect()
    }

    fn profile_column(&self, series: &Series, row_count: usize) -> Result<ColumnProfile> {
        let (series, _) = nan_to_null(series)?;
        let series = &series;
        let missing_count = series.null_count();
        let non_null = series.drop_nulls();
        let unique_count = if non_null.is_empty() {
            0
        } else {
            non_null.n_unique()?
        };

        Ok(ColumnProfile {
            name: series.name().to_string(),
            dtype: dtype_label(series.dtype()),
            inferred_kind: self.inferencer.classify(series)?.kind,
            missing_count,
            missing_pct: round_to(percentage(missing_count, row_count), 1),
            unique_count,
            sample_values: distinct_samples(&non_null, self.sample_size)?,
        })
    }
}

/// Copy of `profiles` ordered by missing percentage, highest first.
///
/// Columns with equal percentages keep their table order.
pub fn sorted_by_missing(profiles: &[ColumnProfile]) -> Vec<ColumnProfile> {
    let mut sorted = profiles.to_vec();
    sorted.sort_by(|a, b| b.missing_pct.total_cmp(&a.missing_pct));
    sorted
}

/// Sum of missing cells over all profiles.
pub fn total_missing(profiles: &[ColumnProfile]) -> usize {
    profiles.iter().map(|p| p.missing_count).sum()
}
