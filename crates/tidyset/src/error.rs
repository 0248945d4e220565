//! Custom error types for the cleaning engine.
//!
//! This module provides the error hierarchy using `thiserror`. Degenerate
//! tables (zero rows, zero columns, all-missing columns) never produce an
//! error; the variants below cover malformed input surfaced by the CSV
//! collaborator, invalid configuration and wrapped library failures.
//!
//! Errors are serializable so an API layer can forward them as
//! `{ "code": ..., "message": ... }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the cleaning engine and its CSV collaborator.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// The source file could not be parsed into a rectangular table.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// Imputation could not produce a replacement column.
    #[error("Failed to impute missing values in column '{column}': {reason}")]
    ImputationFailed { column: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "MALFORMED_INPUT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ImputationFailed { .. } => "IMPUTATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the failure was caused by the caller's input rather than the engine.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::MalformedInput(_) | Self::ColumnNotFound(_) | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
