//! Sequential composition of transform stages with schema propagation

use std::collections::HashSet;

use tracing::debug;

use crate::dataset::{Column, Dataset};
use crate::error::{Error, Result};

use super::{fitted, FittedSchema, TransformStage};

/// Ordered, named transform steps.
///
/// `fit` fits each step on the previous step's output, so later steps see
/// earlier derived features. `transform` replays the chain without refitting.
/// The pipeline's feature names are the last step's; an empty pipeline is
/// the identity.
///
/// Column names must stay unique through the chain: a step whose output
/// collides with an existing name fails `fit` with `DuplicateColumn`.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<(String, Box<dyn TransformStage>)>,
    schema: Option<FittedSchema>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step; step names must be unique
    pub fn push(&mut self, name: impl Into<String>, stage: Box<dyn TransformStage>) -> Result<()> {
        let name = name.into();
        if self.steps.iter().any(|(existing, _)| *existing == name) {
            return Err(Error::Configuration(format!("duplicate pipeline step '{}'", name)));
        }
        self.steps.push((name, stage));
        self.schema = None;
        Ok(())
    }

    /// Builder form of [`push`](Self::push)
    pub fn then(mut self, name: impl Into<String>, stage: Box<dyn TransformStage>) -> Result<Self> {
        self.push(name, stage)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|(name, _)| name.as_str())
    }

    pub fn step(&self, name: &str) -> Option<&dyn TransformStage> {
        self.steps
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, stage)| &**stage)
    }
}

/// Verify a fitted step reports exactly the columns it produced
fn check_step_output(step: &str, stage: &dyn TransformStage, out: &Dataset) -> Result<()> {
    let names = stage.feature_names()?;

    let mut seen = HashSet::with_capacity(names.len());
    if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
        return Err(Error::DuplicateColumn(dup.clone()));
    }

    if names != out.column_names().as_slice() {
        return Err(Error::Schema(format!(
            "step '{}' reports {} feature names but produced columns {:?}",
            step,
            names.len(),
            out.column_names()
        )));
    }
    Ok(())
}

impl TransformStage for Pipeline {
    fn name(&self) -> &'static str {
        "Pipeline"
    }

    fn fit(&mut self, x: &Dataset, y: Option<&Column>) -> Result<()> {
        self.schema = None;
        let mut current = x.clone();

        for (step, stage) in self.steps.iter_mut() {
            stage.fit(&current, y)?;
            current = stage.transform(&current)?;
            check_step_output(step, &**stage, &current)?;
            debug!(step = %step, stage = stage.name(), width = current.width(), "pipeline step fitted");
        }

        self.schema = Some(FittedSchema::new(x, current.column_names()));
        Ok(())
    }

    fn transform(&self, x: &Dataset) -> Result<Dataset> {
        fitted(&self.schema, self.name())?.check_input(self.name(), x)?;

        self.steps
            .iter()
            .try_fold(x.clone(), |current, (_, stage)| stage.transform(&current))
    }

    fn feature_names(&self) -> Result<&[String]> {
        Ok(&fitted(&self.schema, self.name())?.feature_names)
    }
}
