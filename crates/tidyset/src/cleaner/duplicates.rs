//! Exact full-row duplicate detection.
//!
//! Rows are compared positionally across every column, with nulls equal to
//! nulls. The first occurrence of each row is kept and the surviving rows
//! keep their relative order.

use crate::error::Result;
use crate::utils::render_values;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Drop exact duplicate rows when `drop_duplicates` is set.
///
/// Returns the resulting table and the number of rows removed. With the flag
/// off the table is returned unchanged with a count of zero.
pub fn resolve_duplicates(df: &DataFrame, drop_duplicates: bool) -> Result<(DataFrame, usize)> {
    if !drop_duplicates || df.height() == 0 {
        return Ok((df.clone(), 0));
    }

    let keep = first_occurrence_mask(df)?;
    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed == 0 {
        return Ok((df.clone(), 0));
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let deduped = df.filter(&mask)?;
    debug!("Removed {} duplicate rows", removed);

    Ok((deduped, removed))
}

/// Count rows that duplicate an earlier row, without removing them.
pub fn count_duplicates(df: &DataFrame) -> Result<usize> {
    if df.height() == 0 {
        return Ok(0);
    }
    let keep = first_occurrence_mask(df)?;
    Ok(keep.iter().filter(|kept| !**kept).count())
}

/// `true` for each row that is the first occurrence of its values.
fn first_occurrence_mask(df: &DataFrame) -> Result<Vec<bool>> {
    let columns: Vec<Vec<Option<String>>> = df
        .get_columns()
        .iter()
        .map(|column| render_values(column.as_materialized_series()))
        .collect::<PolarsResult<_>>()?;

    let mut seen: HashSet<Vec<Option<&str>>> = HashSet::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());

    for row in 0..df.height() {
        let key: Vec<Option<&str>> = columns.iter().map(|col| col[row].as_deref()).collect();
        keep.push(seen.insert(key));
    }

    Ok(keep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_later_duplicates() {
        let df = df![
            "a" => [1i64, 2, 1],
            "b" => [4i64, 5, 4],
        ]
        .unwrap();

        let (deduped, removed) = resolve_duplicates(&df, true).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(deduped.height(), 2);
        let a = deduped.column("a").unwrap().as_materialized_series();
        let b = deduped.column("b").unwrap().as_materialized_series();
        assert_eq!(a.get(0).unwrap().try_extract::<i64>().unwrap(), 1);
        assert_eq!(b.get(0).unwrap().try_extract::<i64>().unwrap(), 4);
        assert_eq!(a.get(1).unwrap().try_extract::<i64>().unwrap(), 2);
    }

    #[test]
    fn test_flag_off_keeps_everything() {
        let df = df!["a" => [1i64, 1, 1]].unwrap();

        let (same, removed) = resolve_duplicates(&df, false).unwrap();

        assert_eq!(removed, 0);
        assert!(same.equals_missing(&df));
        assert_eq!(count_duplicates(&df).unwrap(), 2);
    }

    #[test]
    fn test_nulls_compare_equal() {
        let df = df![
            "a" => [Some("x"), None, None, Some("x")],
            "b" => [Some(1i64), None, None, Some(2)],
        ]
        .unwrap();

        let (deduped, removed) = resolve_duplicates(&df, true).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(deduped.height(), 3);
    }

    #[test]
    fn test_order_preserved() {
        let df = df!["v" => ["c", "a", "c", "b", "a", "d"]].unwrap();

        let (deduped, removed) = resolve_duplicates(&df, true).unwrap();

        assert_eq!(removed, 2);
        let v = deduped.column("v").unwrap().as_materialized_series();
        let values: Vec<Option<&str>> = v.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("c"), Some("a"), Some("b"), Some("d")]);
    }

    #[test]
    fn test_empty_table() {
        let df = df!["a" => Vec::<i64>::new()].unwrap();

        let (deduped, removed) = resolve_duplicates(&df, true).unwrap();

        assert_eq!(removed, 0);
        assert_eq!(deduped.height(), 0);
        assert_eq!(count_duplicates(&df).unwrap(), 0);
    }
}
