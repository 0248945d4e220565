//! Row- and cell-level cleaning stages.
//!
//! This module provides:
//! - Placeholder normalization (configured tokens become missing)
//! - Exact duplicate row removal

mod duplicates;
mod normalizer;

pub use duplicates::{count_duplicates, resolve_duplicates};
pub use normalizer::normalize_placeholders;
