//! Shared utilities for the cleaning engine.
//!
//! Dtype classification, strict numeric parsing, and the small rendering and
//! rounding helpers used by the analyzer, the inferencer and the imputer.

use polars::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::types::ColumnKind;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date/time type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Kind implied by the storage dtype alone.
///
/// Returns `None` for text columns, whose kind depends on their content.
pub fn kind_from_dtype(dtype: &DataType) -> Option<ColumnKind> {
    if is_numeric_dtype(dtype) {
        Some(ColumnKind::Numeric)
    } else if is_datetime_dtype(dtype) {
        Some(ColumnKind::Datetime)
    } else if matches!(dtype, DataType::String) {
        None
    } else {
        Some(ColumnKind::Categorical)
    }
}

/// Label used for a dtype in profiles.
pub fn dtype_label(dtype: &DataType) -> String {
    format!("{:?}", dtype)
}

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Parse a cell as a finite number.
///
/// Only surrounding whitespace is tolerated. Currency symbols, thousands
/// separators, percent signs and non-finite spellings (`inf`, `NaN`) are
/// rejected.
pub fn parse_strict_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Series Utilities
// =============================================================================

/// Replace float NaN with null in Float32/Float64 Series.
///
/// Returns the (possibly unchanged) Series and the number of NaN cells
/// replaced. Other dtypes are returned as they are.
pub fn nan_to_null(series: &Series) -> PolarsResult<(Series, usize)> {
    match series.dtype() {
        DataType::Float64 => {
            let values = series.f64()?;
            let nan_count = values.into_iter().flatten().filter(|v| v.is_nan()).count();
            if nan_count == 0 {
                return Ok((series.clone(), 0));
            }
            let cleaned: Vec<Option<f64>> = values
                .into_iter()
                .map(|val| val.filter(|v| !v.is_nan()))
                .collect();
            Ok((Series::new(series.name().clone(), cleaned), nan_count))
        }
        DataType::Float32 => {
            let values = series.f32()?;
            let nan_count = values.into_iter().flatten().filter(|v| v.is_nan()).count();
            if nan_count == 0 {
                return Ok((series.clone(), 0));
            }
            let cleaned: Vec<Option<f32>> = values
                .into_iter()
                .map(|val| val.filter(|v| !v.is_nan()))
                .collect();
            Ok((Series::new(series.name().clone(), cleaned), nan_count))
        }
        _ => Ok((series.clone(), 0)),
    }
}

/// Missing cells of a Series: nulls plus float NaN.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    let nan_count = match series.dtype() {
        DataType::Float64 => series.f64()?.into_iter().flatten().filter(|v| v.is_nan()).count(),
        DataType::Float32 => series.f32()?.into_iter().flatten().filter(|v| v.is_nan()).count(),
        _ => 0,
    };
    Ok(series.null_count() + nan_count)
}

/// Median of the cells of a text Series that strictly parse as numbers.
pub fn parsed_text_median(series: &Series) -> PolarsResult<Option<f64>> {
    let parsed: Vec<Option<f64>> = series
        .str()?
        .into_iter()
        .map(|val| val.and_then(parse_strict_number))
        .collect();
    Ok(Series::new(series.name().clone(), parsed).median())
}

/// Render every cell of a Series as text, keeping nulls as `None`.
pub fn render_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let rendered = series.cast(&DataType::String)?;
    let str_series = rendered.str()?;
    Ok(str_series
        .into_iter()
        .map(|val| val.map(str::to_string))
        .collect())
}

/// Most frequent value; ties go to the value seen first.
pub fn first_seen_mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    // value -> (count, first position)
    let mut counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for (idx, val) in values.into_iter().enumerate() {
        counts
            .entry(val)
            .and_modify(|entry| entry.0 += 1)
            .or_insert((1, idx));
    }

    counts
        .into_iter()
        .max_by(|(_, a), (_, b)| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(val, _)| val.to_string())
}

/// First `max_samples` distinct non-null values of a Series, in row order.
pub fn distinct_samples(series: &Series, max_samples: usize) -> PolarsResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut samples = Vec::with_capacity(max_samples);

    for val in render_values(series)?.into_iter().flatten() {
        if samples.len() >= max_samples {
            break;
        }
        if seen.insert(val.clone()) {
            samples.push(val);
        }
    }

    Ok(samples)
}

/// Fill null values in a Float64 Series with a specific value.
pub fn fill_float_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values = series.f64()?;
    let filled: Vec<f64> = values
        .into_iter()
        .map(|val| val.unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Arithmetic Utilities
// =============================================================================

/// `part / whole * 100`, or `0.0` when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_is_datetime_dtype() {
        assert!(is_datetime_dtype(&DataType::Date));
        assert!(is_datetime_dtype(&DataType::Datetime(
            TimeUnit::Milliseconds,
            None
        )));
        assert!(is_datetime_dtype(&DataType::Time));
        assert!(!is_datetime_dtype(&DataType::String));
    }

    #[test]
    fn test_kind_from_dtype() {
        assert_eq!(kind_from_dtype(&DataType::UInt8), Some(ColumnKind::Numeric));
        assert_eq!(kind_from_dtype(&DataType::Date), Some(ColumnKind::Datetime));
        assert_eq!(
            kind_from_dtype(&DataType::Boolean),
            Some(ColumnKind::Categorical)
        );
        assert_eq!(kind_from_dtype(&DataType::String), None);
    }

    #[test]
    fn test_parse_strict_number() {
        assert_eq!(parse_strict_number("42"), Some(42.0));
        assert_eq!(parse_strict_number("  -3.5 "), Some(-3.5));
        assert_eq!(parse_strict_number("1e3"), Some(1000.0));
        assert_eq!(parse_strict_number(""), None);
        assert_eq!(parse_strict_number("   "), None);
        assert_eq!(parse_strict_number("$12"), None);
        assert_eq!(parse_strict_number("1,000"), None);
        assert_eq!(parse_strict_number("inf"), None);
        assert_eq!(parse_strict_number("NaN"), None);
        assert_eq!(parse_strict_number("twelve"), None);
    }

    #[test]
    fn test_first_seen_mode() {
        assert_eq!(
            first_seen_mode(["A", "B", "A", "B", "B"]),
            Some("B".to_string())
        );
        // Tie: "y" appears first.
        assert_eq!(first_seen_mode(["y", "x", "x", "y"]), Some("y".to_string()));
        assert_eq!(first_seen_mode(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_distinct_samples() {
        let series = Series::new(
            "test".into(),
            &[Some("a"), None, Some("a"), Some("b"), Some("c"), Some("d")],
        );
        assert_eq!(distinct_samples(&series, 3).unwrap(), vec!["a", "b", "c"]);

        let numbers = Series::new("n".into(), &[Some(5i64), Some(5), None, Some(7)]);
        assert_eq!(distinct_samples(&numbers, 3).unwrap(), vec!["5", "7"]);
    }

    #[test]
    fn test_fill_float_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_float_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_nan_to_null() {
        let series = Series::new("x".into(), &[Some(1.0), Some(f64::NAN), None, Some(3.0)]);

        assert_eq!(missing_count(&series).unwrap(), 2);
        let (cleaned, replaced) = nan_to_null(&series).unwrap();

        assert_eq!(replaced, 1);
        assert_eq!(cleaned.null_count(), 2);
        assert_eq!(missing_count(&cleaned).unwrap(), 2);
        assert_eq!(cleaned.median(), Some(2.0));

        let ints = Series::new("n".into(), &[1i64, 2]);
        assert_eq!(nan_to_null(&ints).unwrap().1, 0);
    }

    #[test]
    fn test_parsed_text_median() {
        let series = Series::new("v".into(), &[Some("1"), Some("x"), None, Some("4"), Some("2")]);
        assert_eq!(parsed_text_median(&series).unwrap(), Some(2.0));

        let words = Series::new("w".into(), &["a", "b"]);
        assert_eq!(parsed_text_median(&words).unwrap(), None);
    }

    #[test]
    fn test_percentage_and_rounding() {
        assert_eq!(percentage(1, 3), 100.0 / 3.0);
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(round_to(33.333_333, 1), 33.3);
        assert_eq!(round_to(16.666_666, 2), 16.67);
    }
}
