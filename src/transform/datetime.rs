//! Date-derived stages: age from two dates, datetime decomposition

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::dataset::{Categorical, Column, Dataset, SemanticType};
use crate::error::{Error, Result};

use super::{fitted, require_columns, FittedSchema, TransformStage};

/// Average Gregorian year length in days
pub const AVERAGE_YEAR_DAYS: f64 = 365.2425;

const SECONDS_PER_DAY: f64 = 86_400.0;

fn require_temporal(column: &Column) -> Result<()> {
    match column.semantic_type() {
        SemanticType::Datetime | SemanticType::Text => Ok(()),
        found => Err(Error::ColumnType {
            column: column.name().to_string(),
            expected: SemanticType::Datetime,
            found,
        }),
    }
}

/// Elapsed time from column 1 to column 0 in fractional years.
///
/// Emits a single `age` column; rows with a missing date get NaN.
#[derive(Debug, Clone, Default)]
pub struct AgeFromDates {
    schema: Option<FittedSchema>,
}

impl AgeFromDates {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransformStage for AgeFromDates {
    fn name(&self) -> &'static str {
        "AgeFromDates"
    }

    fn fit(&mut self, x: &Dataset, _y: Option<&Column>) -> Result<()> {
        require_columns(self.name(), x, 2)?;
        require_temporal(x.column_at(0)?)?;
        require_temporal(x.column_at(1)?)?;
        self.schema = Some(FittedSchema::new(x, vec!["age".to_string()]));
        Ok(())
    }

    fn transform(&self, x: &Dataset) -> Result<Dataset> {
        fitted(&self.schema, self.name())?.check_input(self.name(), x)?;

        let reference = x.column_at(0)?.to_datetimes()?;
        let birth = x.column_at(1)?.to_datetimes()?;

        let age: Vec<f64> = reference
            .iter()
            .zip(&birth)
            .map(|(r, b)| match (r, b) {
                (Some(r), Some(b)) => years_between(*b, *r),
                _ => f64::NAN,
            })
            .collect();

        Dataset::new(vec![Column::numeric("age", age)])
    }

    fn feature_names(&self) -> Result<&[String]> {
        Ok(&fitted(&self.schema, self.name())?.feature_names)
    }
}

fn years_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let seconds = (to - from).num_milliseconds() as f64 / 1000.0;
    seconds / (AVERAGE_YEAR_DAYS * SECONDS_PER_DAY)
}

/// Splits a single datetime column into calendar components.
///
/// `day` is categorical over 1..=31, `weekday` is categorical over 0..=6
/// with Monday = 0, and `seconds` counts seconds since midnight.
#[derive(Debug, Clone)]
pub struct DatetimeDecomposition {
    day: bool,
    weekday: bool,
    seconds: bool,
    schema: Option<FittedSchema>,
}

impl DatetimeDecomposition {
    /// Fails with `Configuration` when every component is disabled.
    pub fn new(day: bool, weekday: bool, seconds: bool) -> Result<Self> {
        if !(day || weekday || seconds) {
            return Err(Error::Configuration(
                "one of day, weekday, seconds must be enabled".to_string(),
            ));
        }
        Ok(Self {
            day,
            weekday,
            seconds,
            schema: None,
        })
    }

    /// All three components enabled
    pub fn all() -> Self {
        Self {
            day: true,
            weekday: true,
            seconds: true,
            schema: None,
        }
    }

    fn enabled_names(&self) -> Vec<String> {
        [
            (self.day, "day"),
            (self.weekday, "weekday"),
            (self.seconds, "seconds"),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, name)| name.to_string())
        .collect()
    }
}

impl TransformStage for DatetimeDecomposition {
    fn name(&self) -> &'static str {
        "DatetimeDecomposition"
    }

    fn fit(&mut self, x: &Dataset, _y: Option<&Column>) -> Result<()> {
        if x.width() != 1 {
            return Err(Error::Schema(format!(
                "{} expects a single datetime column, got {}",
                self.name(),
                x.width()
            )));
        }
        require_temporal(x.column_at(0)?)?;
        self.schema = Some(FittedSchema::new(x, self.enabled_names()));
        Ok(())
    }

    fn transform(&self, x: &Dataset) -> Result<Dataset> {
        fitted(&self.schema, self.name())?.check_input(self.name(), x)?;
        let stamps = x.column_at(0)?.to_datetimes()?;

        let mut columns = Vec::with_capacity(3);
        if self.day {
            let categories: Vec<String> = (1..=31).map(|d: u32| d.to_string()).collect();
            let codes = stamps.iter().map(|s| s.map(|s| s.day() - 1)).collect();
            columns.push(Column::categorical("day", Categorical::new(categories, codes)?));
        }
        if self.weekday {
            let categories: Vec<String> = (0..7).map(|d: u32| d.to_string()).collect();
            let codes = stamps
                .iter()
                .map(|s| s.map(|s| s.weekday().num_days_from_monday()))
                .collect();
            columns.push(Column::categorical("weekday", Categorical::new(categories, codes)?));
        }
        if self.seconds {
            let values: Vec<f64> = stamps
                .iter()
                .map(|s| match s {
                    Some(s) => {
                        s.num_seconds_from_midnight() as f64 + s.nanosecond() as f64 / 1e9
                    }
                    None => f64::NAN,
                })
                .collect();
            columns.push(Column::numeric("seconds", values));
        }

        Dataset::new(columns)
    }

    fn feature_names(&self) -> Result<&[String]> {
        Ok(&fitted(&self.schema, self.name())?.feature_names)
    }
}
