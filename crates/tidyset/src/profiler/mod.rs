//! Column profiling.
//!
//! This module decides the semantic kind of each column (numeric,
//! categorical, datetime) and converts numeric text columns to numbers.

mod type_inference;

pub use type_inference::{TypeInferencer, numeric_parse_rate};
