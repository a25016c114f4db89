//! Typed columns: numeric, ordered categorical, datetime and raw text

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{Error, Result};

/// Timestamp formats accepted when parsing text columns as datetimes
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Date-only format; parsed values land at midnight
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SemanticType {
    Numeric,
    Categorical,
    Datetime,
    Text,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Numeric => write!(f, "numeric"),
            SemanticType::Categorical => write!(f, "categorical"),
            SemanticType::Datetime => write!(f, "datetime"),
            SemanticType::Text => write!(f, "text"),
        }
    }
}

/// Ordered categorical values.
///
/// Each row stores an index into `categories`; `None` is the unknown/missing
/// sentinel. The order of `categories` defines the ordinal encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Categorical {
    categories: Vec<String>,
    codes: Vec<Option<u32>>,
}

impl Categorical {
    /// Build from explicit codes, validating them against the category list.
    pub fn new(categories: Vec<String>, codes: Vec<Option<u32>>) -> Result<Self> {
        check_unique_categories(&categories)?;
        if let Some(code) = codes
            .iter()
            .flatten()
            .find(|&&code| code as usize >= categories.len())
        {
            return Err(Error::InvalidInput(format!(
                "category code {} out of range for {} categories",
                code,
                categories.len()
            )));
        }
        Ok(Self { categories, codes })
    }

    /// Encode textual labels against `categories`.
    ///
    /// Labels that are not in the category list become the missing sentinel.
    pub fn from_labels<I, S>(labels: I, categories: &[String]) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let lookup: HashMap<&str, u32> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i as u32))
            .collect();

        let codes = labels
            .into_iter()
            .map(|label| label.and_then(|l| lookup.get(l.as_ref()).copied()))
            .collect();

        Self {
            categories: categories.to_vec(),
            codes,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn codes(&self) -> &[Option<u32>] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Label of a row, `None` for the missing sentinel
    pub fn label(&self, row: usize) -> Option<&str> {
        self.codes
            .get(row)
            .copied()
            .flatten()
            .map(|code| self.categories[code as usize].as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.codes
            .iter()
            .map(|code| code.map(|c| self.categories[c as usize].as_str()))
    }
}

pub(crate) fn check_unique_categories(categories: &[String]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(categories.len());
    for category in categories {
        if !seen.insert(category.as_str()) {
            return Err(Error::Configuration(format!(
                "duplicate category label '{}'",
                category
            )));
        }
    }
    Ok(())
}

/// Storage for a column's values
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Floating point values; NaN marks a missing value
    Numeric(Vec<f64>),
    Categorical(Categorical),
    Datetime(Vec<Option<NaiveDateTime>>),
    /// Raw strings, e.g. as read from a CSV file
    Text(Vec<Option<String>>),
}

/// A named column of a single semantic type
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn numeric(name: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values.into()))
    }

    /// Text column without missing values
    pub fn text<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(|v| Some(v.into())).collect();
        Self::new(name, ColumnData::Text(values))
    }

    pub fn optional_text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    pub fn datetime(name: impl Into<String>, values: Vec<Option<NaiveDateTime>>) -> Self {
        Self::new(name, ColumnData::Datetime(values))
    }

    pub fn categorical(name: impl Into<String>, values: Categorical) -> Self {
        Self::new(name, ColumnData::Categorical(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn semantic_type(&self) -> SemanticType {
        match &self.data {
            ColumnData::Numeric(_) => SemanticType::Numeric,
            ColumnData::Categorical(_) => SemanticType::Categorical,
            ColumnData::Datetime(_) => SemanticType::Datetime,
            ColumnData::Text(_) => SemanticType::Text,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(c) => c.len(),
            ColumnData::Datetime(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the value at `row` is missing (NaN, null or unknown category)
    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => v[row].is_nan(),
            ColumnData::Categorical(c) => c.codes()[row].is_none(),
            ColumnData::Datetime(v) => v[row].is_none(),
            ColumnData::Text(v) => v[row].is_none(),
        }
    }

    /// Borrow numeric values, failing for any other semantic type
    pub fn as_numeric(&self) -> Result<&[f64]> {
        match &self.data {
            ColumnData::Numeric(v) => Ok(v),
            _ => Err(self.type_error(SemanticType::Numeric)),
        }
    }

    pub fn as_categorical(&self) -> Result<&Categorical> {
        match &self.data {
            ColumnData::Categorical(c) => Ok(c),
            _ => Err(self.type_error(SemanticType::Categorical)),
        }
    }

    /// Datetime values; text columns are parsed, other types are rejected.
    pub fn to_datetimes(&self) -> Result<Vec<Option<NaiveDateTime>>> {
        match &self.data {
            ColumnData::Datetime(v) => Ok(v.clone()),
            ColumnData::Text(v) => v
                .iter()
                .map(|value| match value {
                    None => Ok(None),
                    Some(s) => parse_datetime(s).map(Some).ok_or_else(|| Error::InvalidValue {
                        column: self.name.clone(),
                        value: s.clone(),
                    }),
                })
                .collect(),
            _ => Err(self.type_error(SemanticType::Datetime)),
        }
    }

    /// Textual form of every value, `None` where missing.
    ///
    /// Numbers use their shortest display form, so `1.0` becomes `"1"`.
    pub fn to_labels(&self) -> Vec<Option<String>> {
        match &self.data {
            ColumnData::Numeric(v) => v
                .iter()
                .map(|x| if x.is_nan() { None } else { Some(format!("{}", x)) })
                .collect(),
            ColumnData::Categorical(c) => c.labels().map(|l| l.map(str::to_string)).collect(),
            ColumnData::Datetime(v) => v
                .iter()
                .map(|d| d.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()))
                .collect(),
            ColumnData::Text(v) => v.clone(),
        }
    }

    fn type_error(&self, expected: SemanticType) -> Error {
        Error::ColumnType {
            column: self.name.clone(),
            expected,
            found: self.semantic_type(),
        }
    }
}

/// Parse a timestamp or a bare date
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_categorical_unknown_labels_become_missing() {
        let cat = Categorical::from_labels(
            vec![Some("low"), Some("high"), Some("extreme"), None],
            &labels(&["low", "mid", "high"]),
        );
        assert_eq!(cat.codes(), &[Some(0), Some(2), None, None]);
        assert_eq!(cat.label(1), Some("high"));
        assert_eq!(cat.label(2), None);
    }

    #[test]
    fn test_categorical_new_rejects_out_of_range_code() {
        let result = Categorical::new(labels(&["a"]), vec![Some(0), Some(1)]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_categorical_new_rejects_duplicate_categories() {
        let result = Categorical::new(labels(&["a", "a"]), vec![]);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_parse_datetime_formats() {
        let midnight = parse_datetime("2020-01-01").unwrap();
        assert_eq!(midnight.to_string(), "2020-01-01 00:00:00");

        let with_time = parse_datetime("2020-01-01 12:30:15").unwrap();
        assert_eq!(with_time.to_string(), "2020-01-01 12:30:15");

        let iso = parse_datetime("2020-01-01T12:30:15.250").unwrap();
        assert_eq!(iso.and_utc().timestamp_subsec_millis(), 250);

        assert!(parse_datetime("not a date").is_none());
    }

    #[test]
    fn test_text_to_datetimes_reports_bad_value() {
        let col = Column::text("d", ["2020-01-01", "yesterday"]);
        match col.to_datetimes() {
            Err(Error::InvalidValue { column, value }) => {
                assert_eq!(column, "d");
                assert_eq!(value, "yesterday");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_labels_use_short_form() {
        let col = Column::numeric("n", vec![1.0, 2.5, f64::NAN]);
        assert_eq!(
            col.to_labels(),
            vec![Some("1".to_string()), Some("2.5".to_string()), None]
        );
    }

    #[test]
    fn test_as_numeric_type_error() {
        let col = Column::text("t", ["x"]);
        match col.as_numeric() {
            Err(Error::ColumnType { expected, found, .. }) => {
                assert_eq!(expected, SemanticType::Numeric);
                assert_eq!(found, SemanticType::Text);
            }
            other => panic!("Expected ColumnType, got {:?}", other),
        }
    }
}
