//! Summary reporting module.
//!
//! Turns the output of each pipeline stage into a serializable
//! [`CleaningSummary`](crate::types::CleaningSummary) with before/after
//! quality scores.

mod summary;

pub use summary::{SummaryBuilder, SummaryParts, aggregate_missing_pct, quality_score};
