//! Error types shared by the dataset, transform and report modules.

use thiserror::Error;

use crate::dataset::SemanticType;

/// Errors raised by edaclf library operations.
///
/// Numeric edge cases (division by zero in a ratio, precision with no
/// predicted positives) are never reported here; they resolve to IEEE-754
/// values or a documented fallback inside the result.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid stage, pipeline or sweep configuration, detected at construction.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// `transform` or `feature_names` was called before `fit`.
    #[error("{stage} is not fitted yet; call `fit` before using it")]
    NotFitted { stage: &'static str },

    /// An optional capability was used but is not available in this build.
    #[error("{capability} is unavailable: rebuild with `--features {feature}` or configure a renderer")]
    MissingDependency {
        capability: &'static str,
        feature: &'static str,
    },

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: SemanticType,
        found: SemanticType,
    },

    /// Shape or layout mismatch between datasets, or between a stage and its input.
    #[error("schema mismatch: {0}")]
    Schema(String),

    /// A value that cannot be interpreted as the column's semantic type.
    #[error("invalid value '{value}' in column '{column}'")]
    InvalidValue { column: String, value: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
