//! Data quality analysis module.
//!
//! This module measures missing values per column, before and after
//! cleaning.

mod analyzer;

pub use analyzer::{MissingValueAnalyzer, sorted_by_missing, total_missing};
