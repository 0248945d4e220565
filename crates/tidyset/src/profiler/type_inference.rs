//! Column kind inference and numeric coercion.

use crate::config::DEFAULT_NUMERIC_THRESHOLD;
use crate::error::Result;
use crate::types::{ColumnKind, TypeDecision};
use crate::utils::{kind_from_dtype, parse_strict_number};
use polars::prelude::*;
use tracing::{debug, warn};

/// Classifies columns as numeric, categorical or datetime.
///
/// Numeric and temporal dtypes decide the kind directly. Text columns are
/// numeric when the share of cells that strictly parse as finite numbers
/// reaches `numeric_threshold`. A numeric text column is converted to Float64
/// only when every non-missing cell parses; otherwise it stays text so no
/// observed value is lost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeInferencer {
    numeric_threshold: f64,
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::new(DEFAULT_NUMERIC_THRESHOLD)
    }
}

impl TypeInferencer {
    pub fn new(numeric_threshold: f64) -> Self {
        Self { numeric_threshold }
    }

    pub fn numeric_threshold(&self) -> f64 {
        self.numeric_threshold
    }

    /// Decide the kind of a single column without modifying it.
    pub fn classify(&self, series: &Series) -> Result<TypeDecision> {
        let name = series.name().to_string();

        if let Some(kind) = kind_from_dtype(series.dtype()) {
            return Ok(TypeDecision::from_dtype(name, kind));
        }

        let rate = numeric_parse_rate(series)?;
        let kind = match rate {
            Some(rate) if rate >= self.numeric_threshold => ColumnKind::Numeric,
            _ => ColumnKind::Categorical,
        };

        Ok(TypeDecision {
            column: name,
            kind,
            numeric_parse_rate: rate,
            coerced_to_numeric: false,
            unparseable_cells: 0,
        })
    }

    /// Classify every column and convert fully parseable numeric text columns
    /// to Float64.
    ///
    /// Decisions are returned in column order. A numeric text column with
    /// cells that do not parse keeps its String dtype and its values; those
    /// cells are counted in the decision.
    pub fn infer_types(&self, df: &DataFrame) -> Result<(DataFrame, Vec<TypeDecision>)> {
        let mut df = df.clone();
        let column_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let mut decisions = Vec::with_capacity(column_names.len());

        for col_name in &column_names {
            let series = df.column(col_name)?.as_materialized_series();
            let mut decision = self.classify(series)?;

            if decision.kind == ColumnKind::Numeric && series.dtype() == &DataType::String {
                let (coerced, unparseable) = coerce_to_numeric(series)?;
                decision.unparseable_cells = unparseable;
                if unparseable > 0 {
                    warn!(
                        "Column '{}': {} cells are not numbers; column kept as text",
                        col_name, unparseable
                    );
                } else {
                    df.replace(col_name, coerced)?;
                    decision.coerced_to_numeric = true;
                }
            }

            debug!("Column '{}' inferred as {}", col_name, decision.kind);
            decisions.push(decision);
        }

        Ok((df, decisions))
    }
}

/// Share of non-missing text cells that strictly parse as finite numbers.
///
/// `None` when the column has no non-missing cells.
pub fn numeric_parse_rate(series: &Series) -> Result<Option<f64>> {
    let str_series = series.str()?;
    let mut parsed = 0usize;
    let mut total = 0usize;

    for val in str_series.into_iter().flatten() {
        total += 1;
        if parse_strict_number(val).is_some() {
            parsed += 1;
        }
    }

    if total == 0 {
        Ok(None)
    } else {
        Ok(Some(parsed as f64 / total as f64))
    }
}

/// Convert a text column to Float64, returning the count of cells that failed.
fn coerce_to_numeric(series: &Series) -> Result<(Series, usize)> {
    let str_series = series.str()?;
    let mut values = Vec::with_capacity(str_series.len());
    let mut unparseable = 0;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                let parsed = parse_strict_number(val);
                if parsed.is_none() {
                    unparseable += 1;
                }
                values.push(parsed);
            }
            None => values.push(None),
        }
    }

    Ok((Series::new(series.name().clone(), values), unparseable))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_dtypes_decide_kind() {
        let inferencer = TypeInferencer::default();

        let ints = Series::new("n".into(), &[1i64, 2, 3]);
        assert_eq!(inferencer.classify(&ints).unwrap().kind, ColumnKind::Numeric);

        let dates = Series::new("d".into(), &[Some(18262i32), None])
            .cast(&DataType::Date)
            .unwrap();
        assert_eq!(
            inferencer.classify(&dates).unwrap().kind,
            ColumnKind::Datetime
        );

        let flags = Series::new("b".into(), &[true, false]);
        let decision = inferencer.classify(&flags).unwrap();
        assert_eq!(decision.kind, ColumnKind::Categorical);
        assert_eq!(decision.numeric_parse_rate, None);
    }

    #[test]
    fn test_numeric_text_at_threshold() {
        let inferencer = TypeInferencer::default();
        // 4 of 5 parse: exactly 0.8
        let series = Series::new("v".into(), &["1", "2.5", " 3 ", "4", "abc"]);

        let decision = inferencer.classify(&series).unwrap();
        assert_eq!(decision.kind, ColumnKind::Numeric);
        assert_eq!(decision.numeric_parse_rate, Some(0.8));
    }

    #[test]
    fn test_numeric_text_below_threshold() {
        let inferencer = TypeInferencer::default();
        let series = Series::new("v".into(), &["1", "2", "$3", "four"]);

        let decision = inferencer.classify(&series).unwrap();
        assert_eq!(decision.kind, ColumnKind::Categorical);
        assert_eq!(decision.numeric_parse_rate, Some(0.5));
    }

    #[test]
    fn test_all_missing_text_is_categorical() {
        let inferencer = TypeInferencer::default();
        let series = Series::new("v".into(), &[None::<&str>, None]);

        let decision = inferencer.classify(&series).unwrap();
        assert_eq!(decision.kind, ColumnKind::Categorical);
        assert_eq!(decision.numeric_parse_rate, None);
    }

    #[test]
    fn test_infer_types_converts_fully_numeric_text() {
        let df = df![
            "price" => [Some("10"), Some("12.5"), None, Some("8")],
            "label" => [Some("a"), Some("b"), Some("c"), Some("d")],
        ]
        .unwrap();

        let (typed, decisions) = TypeInferencer::default().infer_types(&df).unwrap();

        let price = typed.column("price").unwrap().as_materialized_series();
        assert_eq!(price.dtype(), &DataType::Float64);
        assert_eq!(price.null_count(), 1);
        assert_eq!(price.get(1).unwrap().try_extract::<f64>().unwrap(), 12.5);

        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].column, "price");
        assert!(decisions[0].coerced_to_numeric);
        assert_eq!(decisions[0].unparseable_cells, 0);
        assert_eq!(decisions[1].kind, ColumnKind::Categorical);
        assert!(!decisions[1].coerced_to_numeric);

        let label = typed.column("label").unwrap().as_materialized_series();
        assert_eq!(label.dtype(), &DataType::String);
    }

    #[test]
    fn test_infer_types_keeps_unparseable_text() {
        let df = df![
            "price" => [Some("10"), Some("12.5"), None, Some("oops"), Some("8"), Some("9")],
        ]
        .unwrap();

        let (typed, decisions) = TypeInferencer::default().infer_types(&df).unwrap();

        assert_eq!(decisions[0].kind, ColumnKind::Numeric);
        assert!(!decisions[0].coerced_to_numeric);
        assert_eq!(decisions[0].unparseable_cells, 1);

        let price = typed.column("price").unwrap().as_materialized_series();
        assert_eq!(price.dtype(), &DataType::String);
        assert_eq!(price.null_count(), 1);
        assert_eq!(price.str().unwrap().get(3), Some("oops"));
        assert!(typed.equals_missing(&df));
    }

    #[test]
    fn test_custom_threshold() {
        let inferencer = TypeInferencer::new(0.5);
        let series = Series::new("v".into(), &["1", "2", "x", "y"]);

        assert_eq!(inferencer.classify(&series).unwrap().kind, ColumnKind::Numeric);
        assert_eq!(inferencer.numeric_threshold(), 0.5);
    }
}
