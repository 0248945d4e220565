//! Statistical imputation methods.
//!
//! Numeric columns are filled with the median, categorical columns with the
//! mode and datetime columns with the earliest observed value. Columns with
//! no observed values fall back to `0.0`, `""` and the Unix epoch. Float NaN
//! counts as missing.

use crate::error::{CleaningError, Result};
use crate::types::{ColumnKind, ImputationRecord, TypeDecision};
use crate::utils::{
    fill_float_nulls, first_seen_mode, nan_to_null, parsed_text_median, render_values,
};
use polars::prelude::*;
use tracing::{debug, info};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill every column that has missing cells, using each column's decided kind.
    ///
    /// Columns are filled independently and keep their original order.
    /// Columns without missing cells are left as they are.
    pub fn impute_all(
        df: &DataFrame,
        decisions: &[TypeDecision],
    ) -> Result<(DataFrame, Vec<ImputationRecord>)> {
        let mut df = df.clone();
        let mut records = Vec::new();

        for decision in decisions {
            let series = df
                .column(&decision.column)
                .map_err(|_| CleaningError::ColumnNotFound(decision.column.clone()))?
                .as_materialized_series();

            if let Some((filled, record)) = Self::impute_column(series, decision.kind)? {
                df.replace(&decision.column, filled)?;
                records.push(record);
            }
        }

        if !records.is_empty() {
            info!("Imputed missing values in {} columns", records.len());
        }

        Ok((df, records))
    }

    /// Fill the missing cells of one column.
    ///
    /// Returns `None` when the column has nothing to fill.
    pub fn impute_column(
        series: &Series,
        kind: ColumnKind,
    ) -> Result<Option<(Series, ImputationRecord)>> {
        let (series, _) = nan_to_null(series)?;
        let series = &series;
        let missing = series.null_count();
        if missing == 0 {
            return Ok(None);
        }

        let (filled, fill_value, used_fallback) = match (kind, series.dtype()) {
            (ColumnKind::Numeric, DataType::String) => Self::fill_numeric_text_median(series)?,
            (ColumnKind::Numeric, _) => Self::fill_numeric_median(series)?,
            (ColumnKind::Categorical, _) => Self::fill_categorical_mode(series)?,
            (ColumnKind::Datetime, _) => Self::fill_datetime_earliest(series)?,
        };

        if filled.null_count() > 0 {
            return Err(CleaningError::ImputationFailed {
                column: series.name().to_string(),
                reason: format!("{} cells still missing after fill", filled.null_count()),
            });
        }

        debug!(
            "Column '{}': filled {} cells with {} '{}'{}",
            series.name(),
            missing,
            kind.imputation_method(),
            fill_value,
            if used_fallback { " (fallback)" } else { "" }
        );

        let record = ImputationRecord {
            column: series.name().to_string(),
            kind,
            fill_value,
            cells_filled: missing,
            used_fallback,
        };

        Ok(Some((filled, record)))
    }

    /// Median of the observed values as Float64; `0.0` when nothing was observed.
    fn fill_numeric_median(series: &Series) -> Result<(Series, String, bool)> {
        let floats = series.cast(&DataType::Float64)?;
        let (fill, used_fallback) = match floats.median() {
            Some(median) => (median, false),
            None => (0.0, true),
        };

        let filled = fill_float_nulls(&floats, fill)?;
        Ok((filled, fill.to_string(), used_fallback))
    }

    /// Median of the cells that parse as numbers, written into the missing
    /// cells as text. Cells that do not parse are kept as they are.
    fn fill_numeric_text_median(series: &Series) -> Result<(Series, String, bool)> {
        let (fill, used_fallback) = match parsed_text_median(series)? {
            Some(median) => (median, false),
            None => (0.0, true),
        };
        let fill_value = fill.to_string();

        let filled: Vec<String> = series
            .str()?
            .into_iter()
            .map(|val| val.map_or_else(|| fill_value.clone(), str::to_string))
            .collect();

        Ok((
            Series::new(series.name().clone(), filled),
            fill_value,
            used_fallback,
        ))
    }

    /// Most frequent value, ties going to the first seen; `""` when nothing was observed.
    ///
    /// The column is rendered to text first, so the result is always a String column.
    fn fill_categorical_mode(series: &Series) -> Result<(Series, String, bool)> {
        let values = render_values(series)?;
        let mode = first_seen_mode(values.iter().flatten().map(String::as_str));
        let used_fallback = mode.is_none();
        let fill = mode.unwrap_or_default();

        let filled: Vec<String> = values
            .into_iter()
            .map(|val| val.unwrap_or_else(|| fill.clone()))
            .collect();

        Ok((
            Series::new(series.name().clone(), filled),
            fill,
            used_fallback,
        ))
    }

    /// Earliest observed value; the Unix epoch when nothing was observed.
    ///
    /// Works on the physical integer representation so `Date`, `Datetime`
    /// (any unit or time zone) and `Time` keep their dtype.
    fn fill_datetime_earliest(series: &Series) -> Result<(Series, String, bool)> {
        let dtype = series.dtype().clone();
        let physical = series.to_physical_repr();
        let physical_dtype = physical.dtype().clone();
        let as_i64 = physical.cast(&DataType::Int64)?;
        let values = as_i64.i64()?;

        let (fill, used_fallback) = match values.into_iter().flatten().min() {
            Some(earliest) => (earliest, false),
            None => (0, true),
        };

        let filled: Vec<i64> = values
            .into_iter()
            .map(|val| val.unwrap_or(fill))
            .collect();
        let restored = Series::new(series.name().clone(), filled)
            .cast(&physical_dtype)?
            .cast(&dtype)?;

        let fill_series = Series::new(series.name().clone(), vec![fill])
            .cast(&physical_dtype)?
            .cast(&dtype)?;
        let fill_value = render_values(&fill_series)?
            .into_iter()
            .flatten()
            .next()
            .unwrap_or_default();

        Ok((restored, fill_value, used_fallback))
    }
}
