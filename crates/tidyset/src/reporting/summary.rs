//! Cleaning summary construction.
//!
//! Pure aggregation over what the pipeline stages produced: counts, the two
//! profile snapshots and the derived quality scores.

use crate::quality::total_missing;
use crate::types::{CleaningSummary, ColumnProfile, ImputationRecord, TypeDecision};
use crate::utils::{percentage, round_to};

/// Everything the pipeline hands over for summarizing one run.
pub struct SummaryParts {
    pub original_row_count: usize,
    pub cleaned_row_count: usize,
    pub column_count: usize,
    pub dropped_duplicate_count: usize,
    pub placeholders_replaced: usize,
    pub profiles_before: Vec<ColumnProfile>,
    pub profiles_after: Vec<ColumnProfile>,
    pub type_decisions: Vec<TypeDecision>,
    pub imputations: Vec<ImputationRecord>,
}

/// Assembles [`CleaningSummary`] values.
pub struct SummaryBuilder;

impl SummaryBuilder {
    pub fn build(parts: SummaryParts) -> CleaningSummary {
        let missing_total_before = total_missing(&parts.profiles_before);
        let missing_total_after = total_missing(&parts.profiles_after);

        let aggregate_missing_pct_before = aggregate_missing_pct(
            missing_total_before,
            parts.original_row_count,
            parts.column_count,
        );
        let aggregate_missing_pct_after = aggregate_missing_pct(
            missing_total_after,
            parts.cleaned_row_count,
            parts.column_count,
        );

        let quality_score_before = quality_score(aggregate_missing_pct_before);
        let quality_score_after = quality_score(aggregate_missing_pct_after);

        CleaningSummary {
            original_row_count: parts.original_row_count,
            cleaned_row_count: parts.cleaned_row_count,
            column_count: parts.column_count,
            dropped_duplicate_count: parts.dropped_duplicate_count,
            placeholders_replaced: parts.placeholders_replaced,
            missing_total_before,
            missing_total_after,
            profiles_before: parts.profiles_before,
            profiles_after: parts.profiles_after,
            aggregate_missing_pct_before,
            aggregate_missing_pct_after,
            quality_score_before,
            quality_score_after,
            improvement: round_to(quality_score_after - quality_score_before, 2),
            type_decisions: parts.type_decisions,
            imputations: parts.imputations,
        }
    }
}

/// Missing cells over all cells, in percent with two decimals.
///
/// A table with no cells has nothing missing.
pub fn aggregate_missing_pct(total_missing: usize, rows: usize, columns: usize) -> f64 {
    round_to(percentage(total_missing, rows * columns), 2)
}

/// `100 - aggregate_missing_pct`.
pub fn quality_score(aggregate_missing_pct: f64) -> f64 {
    round_to(100.0 - aggregate_missing_pct, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;

    fn profile(name: &str, missing_count: usize) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            dtype: "Int64".to_string(),
            inferred_kind: ColumnKind::Numeric,
            missing_count,
            missing_pct: 0.0,
            unique_count: 0,
            sample_values: Vec::new(),
        }
    }

    fn parts(rows: usize, before: Vec<ColumnProfile>, after: Vec<ColumnProfile>) -> SummaryParts {
        SummaryParts {
            original_row_count: rows,
            cleaned_row_count: rows,
            column_count: before.len(),
            dropped_duplicate_count: 0,
            placeholders_replaced: 0,
            profiles_before: before,
            profiles_after: after,
            type_decisions: Vec::new(),
            imputations: Vec::new(),
        }
    }

    #[test]
    fn test_quality_scores() {
        // 5 rows x 2 columns with 2 missing cells
        let summary = SummaryBuilder::build(parts(
            5,
            vec![profile("a", 1), profile("b", 1)],
            vec![profile("a", 0), profile("b", 0)],
        ));

        assert_eq!(summary.missing_total_before, 2);
        assert_eq!(summary.aggregate_missing_pct_before, 20.0);
        assert_eq!(summary.quality_score_before, 80.0);
        assert_eq!(summary.quality_score_after, 100.0);
        assert_eq!(summary.improvement, 20.0);
    }

    #[test]
    fn test_zero_cells() {
        let summary = SummaryBuilder::build(parts(0, vec![profile("a", 0)], vec![profile("a", 0)]));

        assert_eq!(summary.aggregate_missing_pct_before, 0.0);
        assert_eq!(summary.quality_score_before, 100.0);
        assert_eq!(summary.improvement, 0.0);

        assert_eq!(aggregate_missing_pct(0, 10, 0), 0.0);
    }

    #[test]
    fn test_scores_rounded() {
        assert_eq!(aggregate_missing_pct(1, 3, 2), 16.67);
        assert_eq!(quality_score(16.67), 83.33);
    }
}
