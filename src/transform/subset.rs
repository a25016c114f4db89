//! Apply a stage to a named subset of columns

use serde::{Deserialize, Serialize};

use crate::dataset::{Column, Dataset};
use crate::error::Result;

use super::{fitted, FittedSchema, TransformStage};

/// What happens to the columns a [`ColumnSubset`] does not select
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remainder {
    /// Append the unselected columns, in input order, after the stage output
    #[default]
    Passthrough,
    Drop,
}

/// Routes the selected columns through an inner stage.
///
/// Output layout: the inner stage's features, then (with
/// [`Remainder::Passthrough`]) the unselected input columns.
#[derive(Debug)]
pub struct ColumnSubset {
    columns: Vec<String>,
    stage: Box<dyn TransformStage>,
    remainder: Remainder,
    schema: Option<FittedSchema>,
}

impl ColumnSubset {
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        stage: Box<dyn TransformStage>,
        remainder: Remainder,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            stage,
            remainder,
            schema: None,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn stage(&self) -> &dyn TransformStage {
        &*self.stage
    }

    fn remainder_of(&self, x: &Dataset) -> Dataset {
        match self.remainder {
            Remainder::Passthrough => x.without(&self.columns),
            Remainder::Drop => Dataset::default(),
        }
    }
}

impl TransformStage for ColumnSubset {
    fn name(&self) -> &'static str {
        "ColumnSubset"
    }

    fn fit(&mut self, x: &Dataset, y: Option<&Column>) -> Result<()> {
        let selected = x.select(&self.columns)?;
        self.stage.fit(&selected, y)?;

        let mut names = self.stage.feature_names()?.to_vec();
        names.extend(self.remainder_of(x).column_names());
        self.schema = Some(FittedSchema::new(x, names));
        Ok(())
    }

    fn transform(&self, x: &Dataset) -> Result<Dataset> {
        fitted(&self.schema, self.name())?.check_input(self.name(), x)?;

        let selected = x.select(&self.columns)?;
        let produced = self.stage.transform(&selected)?;
        produced.hstack(&self.remainder_of(x))
    }

    fn feature_names(&self) -> Result<&[String]> {
        Ok(&fitted(&self.schema, self.name())?.feature_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transform::{AgeFromDates, PairwiseRatio};

    fn applications() -> Dataset {
        Dataset::new(vec![
            Column::text("id", ["a1", "a2"]),
            Column::numeric("income", vec![100.0, 90.0]),
            Column::numeric("debt", vec![50.0, 30.0]),
            Column::text("application_date", ["2020-01-01", "2021-06-01"]),
            Column::text("birthdate", ["2000-01-01", "1990-06-01"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_passthrough_keeps_remaining_columns() {
        let mut stage = ColumnSubset::new(
            ["income", "debt"],
            Box::new(PairwiseRatio::new()),
            Remainder::Passthrough,
        );
        let out = stage.fit_transform(&applications(), None).unwrap();

        assert_eq!(
            out.column_names(),
            vec!["income", "debt", "income_debt_ratio", "id", "application_date", "birthdate"]
        );
        assert_eq!(stage.feature_names().unwrap(), out.column_names().as_slice());
        assert_eq!(
            out.column("income_debt_ratio").unwrap().as_numeric().unwrap(),
            &[2.0, 3.0]
        );
    }

    #[test]
    fn test_drop_remainder() {
        let mut stage = ColumnSubset::new(
            ["application_date", "birthdate"],
            Box::new(AgeFromDates::new()),
            Remainder::Drop,
        );
        let out = stage.fit_transform(&applications(), None).unwrap();
        assert_eq!(out.column_names(), vec!["age"]);
    }

    #[test]
    fn test_unknown_column() {
        let mut stage = ColumnSubset::new(
            ["income", "salary"],
            Box::new(PairwiseRatio::new()),
            Remainder::Drop,
        );
        let result = stage.fit(&applications(), None);
        assert!(matches!(result, Err(Error::ColumnNotFound(name)) if name == "salary"));
    }
}
