//! Dataset: an ordered set of uniquely named columns sharing a row index

use std::collections::HashSet;

use crate::error::{Error, Result};

use super::column::Column;

/// Tabular value with named columns.
///
/// Datasets have value semantics: every method that adds, replaces or
/// selects columns returns a new dataset and leaves `self` untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate names and unequal column lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(Error::DuplicateColumn(column.name().to_string()));
            }
        }

        if let Some(first) = columns.first() {
            let height = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != height) {
                return Err(Error::Schema(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name(),
                    bad.len(),
                    height
                )));
            }
        }

        Ok(Self { columns })
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Column by position
    pub fn column_at(&self, index: usize) -> Result<&Column> {
        self.columns.get(index).ok_or_else(|| {
            Error::Schema(format!(
                "column index {} out of range for dataset with {} columns",
                index,
                self.width()
            ))
        })
    }

    /// New dataset with the named columns, in the requested order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Dataset> {
        let columns = names
            .iter()
            .map(|name| self.column(name.as_ref()).cloned())
            .collect::<Result<Vec<_>>>()?;
        Dataset::new(columns)
    }

    /// New dataset without the named columns; unknown names are ignored
    pub fn without<S: AsRef<str>>(&self, names: &[S]) -> Dataset {
        let excluded: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
        Dataset {
            columns: self
                .columns
                .iter()
                .filter(|c| !excluded.contains(c.name()))
                .cloned()
                .collect(),
        }
    }

    /// New dataset with `column` appended
    pub fn with_column(&self, column: Column) -> Result<Dataset> {
        let mut columns = self.columns.clone();
        columns.push(column);
        Dataset::new(columns)
    }

    /// New dataset with the same-named column swapped for `column`
    pub fn with_replaced(&self, column: Column) -> Result<Dataset> {
        let position = self
            .columns
            .iter()
            .position(|c| c.name() == column.name())
            .ok_or_else(|| Error::ColumnNotFound(column.name().to_string()))?;

        let mut columns = self.columns.clone();
        columns[position] = column;
        Dataset::new(columns)
    }

    /// Columns of `self` followed by the columns of `other`
    pub fn hstack(&self, other: &Dataset) -> Result<Dataset> {
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());
        Dataset::new(columns)
    }
}
