//! Ordered categorical casting driven by a category dictionary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{check_unique_categories, Categorical, Column, Dataset};
use crate::error::{Error, Result};

use super::{fitted, FittedSchema, TransformStage};

/// Column name -> ordered list of allowed category labels.
///
/// Label order defines the ordinal encoding. Duplicate labels within one
/// list are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct CategoryDictionary {
    entries: BTreeMap<String, Vec<String>>,
}

impl CategoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the categories of `column`
    pub fn insert<I, S>(&mut self, column: impl Into<String>, categories: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        check_unique_categories(&categories)?;
        self.entries.insert(column.into(), categories);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with<I, S>(mut self, column: impl Into<String>, categories: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(column, categories)?;
        Ok(self)
    }

    pub fn get(&self, column: &str) -> Option<&[String]> {
        self.entries.get(column).map(Vec::as_slice)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for CategoryDictionary {
    type Error = Error;

    fn try_from(entries: BTreeMap<String, Vec<String>>) -> Result<Self> {
        entries
            .into_iter()
            .try_fold(CategoryDictionary::new(), |dict, (column, categories)| {
                dict.with(column, categories)
            })
    }
}

impl From<CategoryDictionary> for BTreeMap<String, Vec<String>> {
    fn from(dict: CategoryDictionary) -> Self {
        dict.entries
    }
}

/// Recasts the dictionary's columns into ordered categoricals.
///
/// Values are matched by their textual form; values outside a column's
/// category list become the missing sentinel. Columns not in the dictionary
/// pass through unchanged.
#[derive(Debug, Clone)]
pub struct CategoricalCast {
    categories: CategoryDictionary,
    schema: Option<FittedSchema>,
}

impl CategoricalCast {
    pub fn new(categories: CategoryDictionary) -> Self {
        Self {
            categories,
            schema: None,
        }
    }

    pub fn categories(&self) -> &CategoryDictionary {
        &self.categories
    }
}

impl TransformStage for CategoricalCast {
    fn name(&self) -> &'static str {
        "CategoricalCast"
    }

    fn fit(&mut self, x: &Dataset, _y: Option<&Column>) -> Result<()> {
        for column in self.categories.columns() {
            x.column(column)?;
        }
        self.schema = Some(FittedSchema::new(x, x.column_names()));
        Ok(())
    }

    fn transform(&self, x: &Dataset) -> Result<Dataset> {
        fitted(&self.schema, self.name())?.check_input(self.name(), x)?;

        let columns = x
            .columns()
            .iter()
            .map(|column| match self.categories.get(column.name()) {
                Some(categories) => {
                    let encoded = Categorical::from_labels(column.to_labels(), categories);
                    Column::categorical(column.name(), encoded)
                }
                None => column.clone(),
            })
            .collect();

        let out = Dataset::new(columns)?;
        for column in self.categories.columns() {
            if !out.contains(column) {
                return Err(Error::ColumnNotFound(column.to_string()));
            }
        }
        Ok(out)
    }

    fn feature_names(&self) -> Result<&[String]> {
        Ok(&fitted(&self.schema, self.name())?.feature_names)
    }
}
