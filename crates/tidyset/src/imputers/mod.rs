//! Imputation module for handling missing values.
//!
//! Each column is filled by its kind: median for numeric, mode for
//! categorical and earliest value for datetime.

mod statistical;

pub use statistical::StatisticalImputer;
