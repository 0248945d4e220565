//! Configuration types for the cleaning engine.
//!
//! This module provides the placeholder token set and the engine
//! configuration, built through a validating builder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tokens treated as missing when no custom set is supplied.
pub const DEFAULT_PLACEHOLDER_TOKENS: [&str; 11] = [
    "", "N/A", "NA", "NULL", "NONE", "UNKNOWN", "ERROR", "-", "?", "NAN", "#N/A",
];

/// Minimum share of parseable cells for a text column to be treated as numeric.
pub const DEFAULT_NUMERIC_THRESHOLD: f64 = 0.8;

/// Number of distinct sample values kept per column profile.
pub const DEFAULT_SAMPLE_SIZE: usize = 3;

// ============================================================================
// Placeholder Set
// ============================================================================

/// Set of string tokens that stand for "no value".
///
/// Matching is case-insensitive and exact: `" NA "` is not a placeholder
/// unless that exact token (with its spaces) is in the set. An empty set
/// disables normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PlaceholderSet {
    tokens: BTreeSet<String>,
}

impl PlaceholderSet {
    /// Build a set from an explicit list of tokens, replacing the defaults.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// An empty set; nothing is treated as a placeholder.
    pub fn empty() -> Self {
        Self {
            tokens: BTreeSet::new(),
        }
    }

    /// Extend the set with one more token.
    pub fn with_token(mut self, token: impl AsRef<str>) -> Self {
        self.tokens.insert(token.as_ref().to_lowercase());
        self
    }

    /// Remove a token from the set.
    pub fn without_token(mut self, token: impl AsRef<str>) -> Self {
        self.tokens.remove(&token.as_ref().to_lowercase());
        self
    }

    /// Check whether a cell value is a placeholder.
    pub fn contains(&self, value: &str) -> bool {
        self.tokens.contains(&value.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over the normalized (lowercase) tokens.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl Default for PlaceholderSet {
    fn default() -> Self {
        Self::from_tokens(DEFAULT_PLACEHOLDER_TOKENS)
    }
}

impl From<Vec<String>> for PlaceholderSet {
    fn from(tokens: Vec<String>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl From<PlaceholderSet> for Vec<String> {
    fn from(set: PlaceholderSet) -> Self {
        set.tokens.into_iter().collect()
    }
}

// ============================================================================
// Cleaning Config
// ============================================================================

/// Configuration for the cleaning engine.
///
/// Use [`CleaningConfig::builder()`] to create a configuration with the
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tidyset::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .placeholder("missing")
///     .numeric_threshold(0.9)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCleaningConfig")]
pub struct CleaningConfig {
    /// Tokens normalized to null before analysis.
    pub placeholders: PlaceholderSet,

    /// Share of strictly parseable cells (0.0-1.0] at which a text column
    /// becomes numeric.
    pub numeric_threshold: f64,

    /// Distinct sample values recorded per column profile.
    pub sample_size: usize,

    /// Default for the duplicate flag when the caller does not pass one.
    pub drop_duplicates: bool,
}

/// Unvalidated shape of [`CleaningConfig`]; deserialization goes through
/// [`CleaningConfig::validate`].
#[derive(Deserialize)]
struct RawCleaningConfig {
    placeholders: PlaceholderSet,
    numeric_threshold: f64,
    sample_size: usize,
    drop_duplicates: bool,
}

impl TryFrom<RawCleaningConfig> for CleaningConfig {
    type Error = ConfigValidationError;

    fn try_from(raw: RawCleaningConfig) -> Result<Self, Self::Error> {
        let config = Self {
            placeholders: raw.placeholders,
            numeric_threshold: raw.numeric_threshold,
            sample_size: raw.sample_size,
            drop_duplicates: raw.drop_duplicates,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            placeholders: PlaceholderSet::default(),
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
            sample_size: DEFAULT_SAMPLE_SIZE,
            drop_duplicates: true,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.numeric_threshold > 0.0 && self.numeric_threshold <= 1.0) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "numeric_threshold".to_string(),
                value: self.numeric_threshold,
            });
        }

        if self.sample_size == 0 {
            return Err(ConfigValidationError::InvalidSampleSize(self.sample_size));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be in (0.0, 1.0])")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid sample size: {0} (must be at least 1)")]
    InvalidSampleSize(usize),
}

/// Builder for [`CleaningConfig`].
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    placeholders: Option<PlaceholderSet>,
    extra_placeholders: Vec<String>,
    numeric_threshold: Option<f64>,
    sample_size: Option<usize>,
    drop_duplicates: Option<bool>,
}

impl CleaningConfigBuilder {
    /// Replace the placeholder set entirely.
    pub fn placeholders(mut self, placeholders: PlaceholderSet) -> Self {
        self.placeholders = Some(placeholders);
        self
    }

    /// Add a token on top of the configured (or default) placeholder set.
    pub fn placeholder(mut self, token: impl Into<String>) -> Self {
        self.extra_placeholders.push(token.into());
        self
    }

    /// Set the numeric parse-rate threshold (0.0-1.0].
    pub fn numeric_threshold(mut self, threshold: f64) -> Self {
        self.numeric_threshold = Some(threshold);
        self
    }

    /// Set how many sample values each profile keeps.
    pub fn sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    /// Set whether exact duplicate rows are dropped by default.
    pub fn drop_duplicates(mut self, drop: bool) -> Self {
        self.drop_duplicates = Some(drop);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let placeholders = self
            .extra_placeholders
            .iter()
            .fold(self.placeholders.unwrap_or_default(), |set, token| {
                set.with_token(token)
            });

        let config = CleaningConfig {
            placeholders,
            numeric_threshold: self.numeric_threshold.unwrap_or(DEFAULT_NUMERIC_THRESHOLD),
            sample_size: self.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE),
            drop_duplicates: self.drop_duplicates.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
