//! Placeholder normalization.
//!
//! Text cells whose whole value is a placeholder token ("N/A", "unknown",
//! "?", ...) and float NaN cells become null so later stages see a single
//! missing marker.

use crate::config::PlaceholderSet;
use crate::error::Result;
use crate::utils::nan_to_null;
use polars::prelude::*;
use tracing::debug;

/// Replace placeholder cells with null in every String column and NaN with
/// null in every float column.
///
/// Returns the normalized table and the number of cells replaced. Other
/// columns are passed through untouched. An empty placeholder set still
/// normalizes NaN.
pub fn normalize_placeholders(
    df: &DataFrame,
    placeholders: &PlaceholderSet,
) -> Result<(DataFrame, usize)> {
    let mut df = df.clone();
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    let mut total_replacements = 0;

    for col_name in &column_names {
        let series = df.column(col_name)?.as_materialized_series();
        let (normalized, count) = match series.dtype() {
            DataType::String if !placeholders.is_empty() => {
                replace_placeholders_with_null(series, placeholders)?
            }
            DataType::Float32 | DataType::Float64 => nan_to_null(series)?,
            _ => continue,
        };

        if count > 0 {
            debug!("Column '{}': {} cells set to missing", col_name, count);
            df.replace(col_name, normalized)?;
            total_replacements += count;
        }
    }

    Ok((df, total_replacements))
}

/// Null out placeholder cells in a single String Series.
pub(crate) fn replace_placeholders_with_null(
    series: &Series,
    placeholders: &PlaceholderSet,
) -> Result<(Series, usize)> {
    let str_series = series.str()?;
    let mut normalized = Vec::with_capacity(str_series.len());
    let mut replacement_count = 0;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) if placeholders.contains(val) => {
                normalized.push(None);
                replacement_count += 1;
            }
            other => normalized.push(other),
        }
    }

    Ok((
        Series::new(series.name().clone(), normalized),
        replacement_count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_default_tokens() {
        let df = df![
            "city" => [Some("NY"), Some("n/a"), Some("Unknown"), None, Some("?")],
            "code" => [Some("-"), Some("ERROR"), Some("x"), Some(""), Some("NULL")],
        ]
        .unwrap();

        let (normalized, replaced) =
            normalize_placeholders(&df, &PlaceholderSet::default()).unwrap();

        assert_eq!(replaced, 7);
        let city = normalized.column("city").unwrap().as_materialized_series();
        assert_eq!(city.null_count(), 4);
        assert_eq!(city.str().unwrap().get(0), Some("NY"));

        let code = normalized.column("code").unwrap().as_materialized_series();
        assert_eq!(code.null_count(), 4);
        assert_eq!(code.str().unwrap().get(2), Some("x"));
    }

    #[test]
    fn test_padded_tokens_are_not_placeholders() {
        let df = df!["v" => [" NA ", "NA", "Nana"]].unwrap();

        let (normalized, replaced) =
            normalize_placeholders(&df, &PlaceholderSet::default()).unwrap();

        assert_eq!(replaced, 1);
        let v = normalized.column("v").unwrap().as_materialized_series();
        assert_eq!(v.str().unwrap().get(0), Some(" NA "));
        assert_eq!(v.str().unwrap().get(1), None);
        assert_eq!(v.str().unwrap().get(2), Some("Nana"));
    }

    #[test]
    fn test_non_string_columns_untouched() {
        let df = df![
            "n" => [Some(1i64), None, Some(3)],
            "flag" => [true, false, true],
        ]
        .unwrap();

        let (normalized, replaced) =
            normalize_placeholders(&df, &PlaceholderSet::default()).unwrap();

        assert_eq!(replaced, 0);
        assert!(normalized.equals_missing(&df));
    }

    #[test]
    fn test_nan_becomes_missing() {
        let df = df![
            "x" => [Some(1.0), Some(f64::NAN), None, Some(3.0)],
            "label" => [Some("a"), Some("NaN"), Some("b"), Some("c")],
        ]
        .unwrap();

        let (normalized, replaced) =
            normalize_placeholders(&df, &PlaceholderSet::default()).unwrap();

        // one float NaN, one "NaN" text token
        assert_eq!(replaced, 2);
        let x = normalized.column("x").unwrap().as_materialized_series();
        assert_eq!(x.null_count(), 2);
        assert_eq!(x.f64().unwrap().into_iter().flatten().filter(|v| v.is_nan()).count(), 0);

        let (_, replaced) = normalize_placeholders(&df, &PlaceholderSet::empty()).unwrap();
        assert_eq!(replaced, 1);
    }

    #[test]
    fn test_custom_placeholder_set() {
        let df = df!["status" => ["pending", "done", "N/A", "PENDING"]].unwrap();
        let set = PlaceholderSet::from_tokens(["pending"]);

        let (normalized, replaced) = normalize_placeholders(&df, &set).unwrap();

        assert_eq!(replaced, 2);
        let status = normalized.column("status").unwrap().as_materialized_series();
        assert_eq!(status.str().unwrap().get(2), Some("N/A"));
    }

    #[test]
    fn test_empty_set_disables_placeholder_normalization() {
        let df = df!["v" => ["N/A", ""]].unwrap();

        let (normalized, replaced) = normalize_placeholders(&df, &PlaceholderSet::empty()).unwrap();

        assert_eq!(replaced, 0);
        assert!(normalized.equals_missing(&df));
    }
}
