//! Numeric stages: absolute value, pairwise difference/ratio, interest

use crate::dataset::{Column, Dataset};
use crate::error::{Error, Result};

use super::{fitted, leading_pair, require_columns, FittedSchema, TransformStage};

/// Fixed daily-rate factor applied by [`InterestCalculation`]
pub const INTEREST_FACTOR: f64 = 0.0010378267640343;

/// Replaces every value with its absolute value. All columns must be numeric.
#[derive(Debug, Clone, Default)]
pub struct AbsoluteValue {
    schema: Option<FittedSchema>,
}

impl AbsoluteValue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransformStage for AbsoluteValue {
    fn name(&self) -> &'static str {
        "AbsoluteValue"
    }

    fn fit(&mut self, x: &Dataset, _y: Option<&Column>) -> Result<()> {
        for column in x.columns() {
            column.as_numeric()?;
        }
        self.schema = Some(FittedSchema::new(x, x.column_names()));
        Ok(())
    }

    fn transform(&self, x: &Dataset) -> Result<Dataset> {
        fitted(&self.schema, self.name())?.check_input(self.name(), x)?;

        let columns = x
            .columns()
            .iter()
            .map(|c| {
                let values: Vec<f64> = c.as_numeric()?.iter().map(|v| v.abs()).collect();
                Ok(Column::numeric(c.name(), values))
            })
            .collect::<Result<Vec<_>>>()?;
        Dataset::new(columns)
    }

    fn feature_names(&self) -> Result<&[String]> {
        Ok(&fitted(&self.schema, self.name())?.feature_names)
    }
}

/// Shared fit/transform logic for stages appending `f(col0, col1)` to the input
#[derive(Debug, Clone)]
struct AppendPair {
    stage: &'static str,
    schema: Option<FittedSchema>,
}

impl AppendPair {
    const fn new(stage: &'static str) -> Self {
        Self {
            stage,
            schema: None,
        }
    }

    fn fit(&mut self, x: &Dataset, derived: impl Fn(&str, &str) -> String) -> Result<()> {
        require_columns(self.stage, x, 2)?;
        let ((a, _), (b, _)) = leading_pair(x)?;

        let name = derived(a, b);
        if x.contains(&name) {
            return Err(Error::DuplicateColumn(name));
        }

        let mut names = x.column_names();
        names.push(name);
        self.schema = Some(FittedSchema::new(x, names));
        Ok(())
    }

    fn transform(
        &self,
        x: &Dataset,
        derived: impl Fn(&str, &str) -> String,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<Dataset> {
        fitted(&self.schema, self.stage)?.check_input(self.stage, x)?;
        let ((a_name, a), (b_name, b)) = leading_pair(x)?;

        let values: Vec<f64> = a.iter().zip(b).map(|(&a, &b)| op(a, b)).collect();
        x.with_column(Column::numeric(derived(a_name, b_name), values))
    }

    fn feature_names(&self) -> Result<&[String]> {
        Ok(&fitted(&self.schema, self.stage)?.feature_names)
    }
}

fn dif_name(a: &str, b: &str) -> String {
    format!("{}_{}_dif", a, b)
}

fn ratio_name(a: &str, b: &str) -> String {
    format!("{}_{}_ratio", a, b)
}

fn interest_name(_: &str, _: &str) -> String {
    "interest".to_string()
}

/// Appends `col0 - col1` as `<col0>_<col1>_dif`
#[derive(Debug, Clone)]
pub struct PairwiseDifference {
    inner: AppendPair,
}

impl PairwiseDifference {
    pub fn new() -> Self {
        Self {
            inner: AppendPair::new("PairwiseDifference"),
        }
    }
}

impl Default for PairwiseDifference {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStage for PairwiseDifference {
    fn name(&self) -> &'static str {
        self.inner.stage
    }

    fn fit(&mut self, x: &Dataset, _y: Option<&Column>) -> Result<()> {
        self.inner.fit(x, dif_name)
    }

    fn transform(&self, x: &Dataset) -> Result<Dataset> {
        self.inner.transform(x, dif_name, |a, b| a - b)
    }

    fn feature_names(&self) -> Result<&[String]> {
        self.inner.feature_names()
    }
}

/// Appends `col0 / col1` as `<col0>_<col1>_ratio`.
///
/// Division follows IEEE-754: a zero denominator yields ±infinity or NaN.
#[derive(Debug, Clone)]
pub struct PairwiseRatio {
    inner: AppendPair,
}

impl PairwiseRatio {
    pub fn new() -> Self {
        Self {
            inner: AppendPair::new("PairwiseRatio"),
        }
    }
}

impl Default for PairwiseRatio {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStage for PairwiseRatio {
    fn name(&self) -> &'static str {
        self.inner.stage
    }

    fn fit(&mut self, x: &Dataset, _y: Option<&Column>) -> Result<()> {
        self.inner.fit(x, ratio_name)
    }

    fn transform(&self, x: &Dataset) -> Result<Dataset> {
        self.inner.transform(x, ratio_name, |a, b| a / b)
    }

    fn feature_names(&self) -> Result<&[String]> {
        self.inner.feature_names()
    }
}

/// Appends `round(col0 * INTEREST_FACTOR * col1, 2)` as `interest`.
///
/// Rounding is half-to-even at two decimals.
#[derive(Debug, Clone)]
pub struct InterestCalculation {
    inner: AppendPair,
}

impl InterestCalculation {
    pub fn new() -> Self {
        Self {
            inner: AppendPair::new("InterestCalculation"),
        }
    }
}

impl Default for InterestCalculation {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStage for InterestCalculation {
    fn name(&self) -> &'static str {
        self.inner.stage
    }

    fn fit(&mut self, x: &Dataset, _y: Option<&Column>) -> Result<()> {
        self.inner.fit(x, interest_name)
    }

    fn transform(&self, x: &Dataset) -> Result<Dataset> {
        self.inner.transform(x, interest_name, |amount, days| {
            round_cents(amount * INTEREST_FACTOR * days)
        })
    }

    fn feature_names(&self) -> Result<&[String]> {
        self.inner.feature_names()
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
