//! JSON pipeline configuration
//!
//! ```json
//! {
//!   "steps": [
//!     {"name": "ratio", "columns": ["income", "debt"], "stage": {"type": "pairwise_ratio"}},
//!     {"name": "grades", "stage": {"type": "categorical_cast", "categories": {"grade": ["A", "B"]}}}
//!   ]
//! }
//! ```
//!
//! Unknown keys are rejected at every level.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{
    AbsoluteValue, AgeFromDates, CategoricalCast, CategoryDictionary, ColumnSubset,
    DatetimeDecomposition, InterestCalculation, PairwiseDifference, PairwiseRatio, Pipeline,
    Remainder, TransformStage,
};

fn enabled() -> bool {
    true
}

/// One stage and its options
///
/// Option-less stages are empty struct variants so extra keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum StageConfig {
    AbsoluteValue {},
    PairwiseDifference {},
    PairwiseRatio {},
    CategoricalCast {
        categories: CategoryDictionary,
    },
    AgeFromDates {},
    DatetimeDecomposition {
        #[serde(default = "enabled")]
        day: bool,
        #[serde(default = "enabled")]
        weekday: bool,
        #[serde(default = "enabled")]
        seconds: bool,
    },
    InterestCalculation {},
}

impl StageConfig {
    /// Construct the stage, running its eager configuration checks
    pub fn build(&self) -> Result<Box<dyn TransformStage>> {
        let stage: Box<dyn TransformStage> = match self {
            StageConfig::AbsoluteValue {} => Box::new(AbsoluteValue::new()),
            StageConfig::PairwiseDifference {} => Box::new(PairwiseDifference::new()),
            StageConfig::PairwiseRatio {} => Box::new(PairwiseRatio::new()),
            StageConfig::CategoricalCast { categories } => {
                Box::new(CategoricalCast::new(categories.clone()))
            }
            StageConfig::AgeFromDates {} => Box::new(AgeFromDates::new()),
            StageConfig::DatetimeDecomposition {
                day,
                weekday,
                seconds,
            } => Box::new(DatetimeDecomposition::new(*day, *weekday, *seconds)?),
            StageConfig::InterestCalculation {} => Box::new(InterestCalculation::new()),
        };
        Ok(stage)
    }
}

/// A named pipeline step, optionally restricted to a column subset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    pub name: String,
    /// Columns routed through the stage; all columns when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    /// Only meaningful together with `columns`; passthrough when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remainder: Option<Remainder>,
    pub stage: StageConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    pub steps: Vec<StepConfig>,
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Build an unfitted pipeline
    pub fn build(&self) -> Result<Pipeline> {
        let mut pipeline = Pipeline::new();
        for step in &self.steps {
            let stage = step.stage.build()?;
            let stage: Box<dyn TransformStage> = match (&step.columns, step.remainder) {
                (Some(columns), remainder) => Box::new(ColumnSubset::new(
                    columns.iter().cloned(),
                    stage,
                    remainder.unwrap_or_default(),
                )),
                (None, None) => stage,
                (None, Some(_)) => {
                    return Err(Error::Configuration(format!(
                        "step '{}' sets remainder without columns",
                        step.name
                    )))
                }
            };
            pipeline.push(step.name.clone(), stage)?;
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, Dataset};

    const CONFIG: &str = r#"{
        "steps": [
            {"name": "ratio", "columns": ["income", "debt"], "stage": {"type": "pairwise_ratio"}},
            {"name": "grades", "stage": {"type": "categorical_cast", "categories": {"grade": ["A", "B"]}}}
        ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let config = PipelineConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(config.steps.len(), 2);
        assert_eq!(config.steps[0].remainder, None);

        let mut pipeline = config.build().unwrap();
        let x = Dataset::new(vec![
            Column::numeric("income", vec![100.0, 50.0]),
            Column::numeric("debt", vec![10.0, 0.0]),
            Column::text("grade", ["A", "C"]),
        ])
        .unwrap();

        let out = pipeline.fit_transform(&x, None).unwrap();
        assert_eq!(
            pipeline.feature_names().unwrap(),
            &["income", "debt", "income_debt_ratio", "grade"]
        );
        let grade = out.column("grade").unwrap().as_categorical().unwrap();
        assert_eq!(grade.codes(), &[Some(0), None]);
    }

    #[test]
    fn test_unknown_stage_option_rejected() {
        let json = r#"{"steps": [{"name": "d", "stage": {"type": "datetime_decomposition", "hour": true}}]}"#;
        assert!(matches!(PipelineConfig::from_json_str(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_unknown_key_on_optionless_stage_rejected() {
        for stage in [
            "absolute_value",
            "pairwise_difference",
            "pairwise_ratio",
            "age_from_dates",
            "interest_calculation",
        ] {
            let json = format!(
                r#"{{"steps": [{{"name": "a", "stage": {{"type": "{}", "bogus": 1}}}}]}}"#,
                stage
            );
            assert!(
                matches!(PipelineConfig::from_json_str(&json), Err(Error::Json(_))),
                "{} accepted an unknown key",
                stage
            );
        }

        let json = r#"{"steps": [{"name": "a", "stage": {"type": "absolute_value"}}]}"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(config.steps[0].stage, StageConfig::AbsoluteValue {});
    }

    #[test]
    fn test_remainder_without_columns_rejected() {
        let json = r#"{"steps": [{"name": "a", "remainder": "drop", "stage": {"type": "absolute_value"}}]}"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert!(matches!(config.build(), Err(Error::Configuration(_))));

        let json = r#"{"steps": [{"name": "a", "columns": ["x"], "remainder": "drop", "stage": {"type": "absolute_value"}}]}"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(config.steps[0].remainder, Some(Remainder::Drop));
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_unknown_step_key_rejected() {
        let json = r#"{"steps": [{"name": "a", "stage": {"type": "absolute_value"}, "extra": 1}]}"#;
        assert!(PipelineConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_datetime_defaults_and_validation() {
        let json = r#"{"steps": [{"name": "d", "stage": {"type": "datetime_decomposition", "seconds": false}}]}"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(
            config.steps[0].stage,
            StageConfig::DatetimeDecomposition {
                day: true,
                weekday: true,
                seconds: false
            }
        );

        let json = r#"{"steps": [{"name": "d", "stage": {"type": "datetime_decomposition", "day": false, "weekday": false, "seconds": false}}]}"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert!(matches!(config.build(), Err(Error::Configuration(_))));
    }
}
