//! Transform module - stateful feature-engineering stages and their composition
//!
//! Every stage implements [`TransformStage`]: `fit` learns the output schema,
//! `transform` produces a new dataset without touching the input or the
//! stage, and `feature_names` reports the columns `transform` will emit.

pub mod categorical;
pub mod config;
pub mod datetime;
pub mod numeric;
pub mod pipeline;
pub mod subset;

pub use categorical::{CategoricalCast, CategoryDictionary};
pub use config::{PipelineConfig, StageConfig, StepConfig};
pub use datetime::{AgeFromDates, DatetimeDecomposition, AVERAGE_YEAR_DAYS};
pub use numeric::{AbsoluteValue, InterestCalculation, PairwiseDifference, PairwiseRatio, INTEREST_FACTOR};
pub use pipeline::Pipeline;
pub use subset::{ColumnSubset, Remainder};

use std::fmt::Debug;

use crate::dataset::{Column, Dataset};
use crate::error::{Error, Result};

/// A fit/transform unit that reports its own output schema.
pub trait TransformStage: Debug + Send + Sync {
    /// Short stage identifier used in errors and logs
    fn name(&self) -> &'static str;

    /// Learn the output schema from a training dataset.
    ///
    /// Labels are accepted for interface uniformity; no built-in stage uses them.
    fn fit(&mut self, x: &Dataset, y: Option<&Column>) -> Result<()>;

    /// Produce a new dataset from `x`. Fails with `NotFitted` before `fit`.
    fn transform(&self, x: &Dataset) -> Result<Dataset>;

    /// Output column names recorded by `fit`
    fn feature_names(&self) -> Result<&[String]>;

    fn is_fitted(&self) -> bool {
        self.feature_names().is_ok()
    }

    fn fit_transform(&mut self, x: &Dataset, y: Option<&Column>) -> Result<Dataset> {
        self.fit(x, y)?;
        self.transform(x)
    }
}

/// Schema recorded by a successful `fit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FittedSchema {
    pub n_features_in: usize,
    pub feature_names: Vec<String>,
}

impl FittedSchema {
    pub fn new(x: &Dataset, feature_names: Vec<String>) -> Self {
        Self {
            n_features_in: x.width(),
            feature_names,
        }
    }

    /// Reject input whose width differs from the one seen at fit
    pub fn check_input(&self, stage: &'static str, x: &Dataset) -> Result<()> {
        if x.width() != self.n_features_in {
            return Err(Error::Schema(format!(
                "{} was fitted on {} columns but got {}",
                stage,
                self.n_features_in,
                x.width()
            )));
        }
        Ok(())
    }
}

/// Fitted schema or `NotFitted`
pub(crate) fn fitted<'a>(
    schema: &'a Option<FittedSchema>,
    stage: &'static str,
) -> Result<&'a FittedSchema> {
    schema.as_ref().ok_or(Error::NotFitted { stage })
}

/// Require at least `needed` input columns
pub(crate) fn require_columns(stage: &'static str, x: &Dataset, needed: usize) -> Result<()> {
    if x.width() < needed {
        return Err(Error::Schema(format!(
            "{} needs at least {} columns, got {}",
            stage,
            needed,
            x.width()
        )));
    }
    Ok(())
}

/// The first two columns as numeric slices, with their names
pub(crate) fn leading_pair(x: &Dataset) -> Result<((&str, &[f64]), (&str, &[f64]))> {
    let a = x.column_at(0)?;
    let b = x.column_at(1)?;
    Ok(((a.name(), a.as_numeric()?), (b.name(), b.as_numeric()?)))
}
