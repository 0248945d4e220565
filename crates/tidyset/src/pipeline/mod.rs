//! Pipeline module.
//!
//! This module provides the cleaning engine that runs every stage in order.

mod engine;

pub use engine::{CleaningEngine, CleaningPreview, analyze, clean};
