use serde::{Deserialize, Serialize};

// ============================================================================
// Column Kind
// ============================================================================

/// Semantic kind of a column, decided once per column by the type inferencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or float values, or text that parses as numbers.
    Numeric,
    /// Text and everything that is neither numeric nor temporal.
    Categorical,
    /// Date, datetime or time values.
    Datetime,
}

impl ColumnKind {
    /// Stable lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Datetime => "datetime",
        }
    }

    /// Human-readable name of the fill strategy applied to this kind.
    pub fn imputation_method(&self) -> &'static str {
        match self {
            Self::Numeric => "median",
            Self::Categorical => "mode",
            Self::Datetime => "earliest",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// Profiles and Decisions
// ============================================================================

/// Missing-value profile of a single column at one point in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Storage dtype label, e.g. `Int64`, `String`, `Date`.
    pub dtype: String,
    pub inferred_kind: ColumnKind,
    pub missing_count: usize,
    /// Share of missing cells in percent, one decimal.
    pub missing_pct: f64,
    /// Distinct non-missing values.
    pub unique_count: usize,
    /// First few distinct non-missing values, for display only.
    pub sample_values: Vec<String>,
}

/// What the type inferencer decided for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecision {
    pub column: String,
    pub kind: ColumnKind,
    /// Share (0.0-1.0) of non-missing text cells that parsed as numbers.
    /// `None` for columns that were not text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_parse_rate: Option<f64>,
    /// The column was text and has been converted to Float64. Only happens
    /// when every non-missing cell parsed.
    pub coerced_to_numeric: bool,
    /// Non-missing cells of a numeric text column that do not parse. They
    /// are kept as text, and the column keeps its String dtype.
    pub unparseable_cells: usize,
}

impl TypeDecision {
    /// Decision for a column whose storage dtype already determines its kind.
    pub fn from_dtype(column: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            column: column.into(),
            kind,
            numeric_parse_rate: None,
            coerced_to_numeric: false,
            unparseable_cells: 0,
        }
    }
}

/// One column filled by the imputer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub column: String,
    pub kind: ColumnKind,
    /// The replacement value, rendered as text.
    pub fill_value: String,
    pub cells_filled: usize,
    /// The column had no observed values, so the kind's fixed fallback was used.
    pub used_fallback: bool,
}

// ============================================================================
// Cleaning Summary
// ============================================================================

/// Before/after metrics for one cleaning run.
///
/// Produced once by the engine and handed to the caller; serialize it with
/// serde to drive reports or an API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub original_row_count: usize,
    pub cleaned_row_count: usize,
    pub column_count: usize,
    pub dropped_duplicate_count: usize,
    /// Cells turned into missing values by normalization: placeholder text
    /// and float NaN.
    pub placeholders_replaced: usize,

    pub missing_total_before: usize,
    pub missing_total_after: usize,

    pub profiles_before: Vec<ColumnProfile>,
    pub profiles_after: Vec<ColumnProfile>,

    /// Missing cells over all cells, in percent.
    pub aggregate_missing_pct_before: f64,
    pub aggregate_missing_pct_after: f64,

    /// `100 - aggregate_missing_pct`.
    pub quality_score_before: f64,
    pub quality_score_after: f64,
    /// `quality_score_after - quality_score_before`.
    pub improvement: f64,

    pub type_decisions: Vec<TypeDecision>,
    pub imputations: Vec<ImputationRecord>,
}

impl CleaningSummary {
    /// Percentage of input rows removed as duplicates.
    pub fn dropped_duplicate_percentage(&self) -> f64 {
        crate::utils::percentage(self.dropped_duplicate_count, self.original_row_count)
    }

    /// Total number of cells filled by the imputer.
    pub fn cells_imputed(&self) -> usize {
        self.imputations.iter().map(|r| r.cells_filled).sum()
    }

    /// Look up the pre-cleaning profile of a column.
    pub fn profile_before(&self, column: &str) -> Option<&ColumnProfile> {
        self.profiles_before.iter().find(|p| p.name == column)
    }

    /// Look up the post-cleaning profile of a column.
    pub fn profile_after(&self, column: &str) -> Option<&ColumnProfile> {
        self.profiles_after.iter().find(|p| p.name == column)
    }

    /// Look up the inferred kind decision for a column.
    pub fn decision(&self, column: &str) -> Option<&TypeDecision> {
        self.type_decisions.iter().find(|d| d.column == column)
    }
}

static_assertions::assert_impl_all!(CleaningSummary: Send, Sync, Clone);
static_assertions::assert_impl_all!(ColumnProfile: Send, Sync, Clone);

// ============================================================================
// Tests
// ============================================================================
