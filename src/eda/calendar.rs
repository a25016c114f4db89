//! Calendar heatmap of missing values over time
//!
//! Rendering is an optional capability. [`CalendarHeatmap`] holds the
//! renderer chosen once at construction; without one, [`CalendarHeatmap::na_datashift`]
//! fails with `MissingDependency` before touching the data.

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::report::canvas::{Figure, FigureSize};

/// Share of missing cells per calendar day, keyed by date
pub type DailyShare = BTreeMap<NaiveDate, f64>;

/// Draws a per-day series as a calendar figure
pub trait CalendarRenderer: Debug + Send + Sync {
    fn render(&self, daily: &DailyShare, figsize: Option<FigureSize>) -> Result<Figure>;
}

#[derive(Debug, Default)]
pub struct CalendarHeatmap {
    renderer: Option<Box<dyn CalendarRenderer>>,
}

impl CalendarHeatmap {
    /// The built-in renderer when the `calendar` feature is enabled
    pub fn detect() -> Self {
        #[cfg(feature = "calendar")]
        {
            Self::with_renderer(Box::new(DailyGrid))
        }
        #[cfg(not(feature = "calendar"))]
        {
            Self::unavailable()
        }
    }

    pub fn unavailable() -> Self {
        Self { renderer: None }
    }

    pub fn with_renderer(renderer: Box<dyn CalendarRenderer>) -> Self {
        Self {
            renderer: Some(renderer),
        }
    }

    pub fn is_available(&self) -> bool {
        self.renderer.is_some()
    }

    /// Calendar heatmap of the daily share of missing cells outside `date_column`
    pub fn na_datashift(
        &self,
        data: &Dataset,
        date_column: &str,
        figsize: Option<FigureSize>,
    ) -> Result<Figure> {
        let renderer = self.renderer.as_deref().ok_or(Error::MissingDependency {
            capability: "calendar heatmap",
            feature: "calendar",
        })?;

        let daily = daily_missing_share(data, date_column)?;
        debug!(days = daily.len(), column = date_column, "daily missing share computed");
        renderer.render(&daily, figsize)
    }
}

/// Missing cells over all cells of the non-date columns, per day.
/// Rows without a date are skipped.
pub fn daily_missing_share(data: &Dataset, date_column: &str) -> Result<DailyShare> {
    let dates = data.column(date_column)?.to_datetimes()?;
    let others: Vec<_> = data
        .columns()
        .iter()
        .filter(|c| c.name() != date_column)
        .collect();
    if others.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no columns besides '{}' to count missing values in",
            date_column
        )));
    }

    let mut totals: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for (row, date) in dates.iter().enumerate() {
        let Some(date) = date else { continue };
        let missing = others.iter().filter(|c| c.is_missing(row)).count();
        let entry = totals.entry(date.date()).or_default();
        entry.0 += missing;
        entry.1 += others.len();
    }

    Ok(totals
        .into_iter()
        .map(|(day, (missing, cells))| (day, missing as f64 / cells as f64))
        .collect())
}

#[cfg(feature = "calendar")]
pub use grid::DailyGrid;

#[cfg(feature = "calendar")]
mod grid {
    use super::*;
    use crate::report::canvas::{AxesId, Canvas};

    const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    /// One weekday x week heatmap per year, days without data left empty
    #[derive(Debug, Clone, Copy, Default)]
    pub struct DailyGrid;

    /// Column of `day` in its year's grid; week 0 holds January 1st
    fn week_of_year(day: NaiveDate) -> usize {
        let jan1 = day.with_ordinal(1).unwrap_or(day);
        (day.ordinal0() + jan1.weekday().num_days_from_monday()) as usize / 7
    }

    impl CalendarRenderer for DailyGrid {
        fn render(&self, daily: &DailyShare, figsize: Option<FigureSize>) -> Result<Figure> {
            let mut years: BTreeMap<i32, Vec<(NaiveDate, f64)>> = BTreeMap::new();
            for (&day, &share) in daily {
                years.entry(day.year()).or_default().push((day, share));
            }

            let size = figsize.unwrap_or_else(|| FigureSize::new(12.8, 2.4 * years.len().max(1) as f64));
            let mut figure = Figure::grid(years.len(), 1, size);

            for (row, (year, days)) in years.iter().enumerate() {
                let n_weeks = days
                    .iter()
                    .map(|(d, _)| week_of_year(*d) + 1)
                    .max()
                    .unwrap_or(0);
                let mut values = vec![vec![f64::NAN; n_weeks]; 7];
                for (day, share) in days {
                    values[day.weekday().num_days_from_monday() as usize][week_of_year(*day)] = *share;
                }

                let ax = figure.axes_mut(AxesId::new(row, 0))?;
                ax.heatmap(
                    values,
                    WEEKDAYS.iter().map(|d| d.to_string()).collect(),
                    (0..n_weeks).map(|w| w.to_string()).collect(),
                );
                ax.title(&year.to_string());
            }
            Ok(figure)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn loans() -> Dataset {
        Dataset::new(vec![
            Column::text("date", ["2024-01-01", "2024-01-01", "2024-01-02"]),
            Column::numeric("income", vec![1.0, f64::NAN, f64::NAN]),
            Column::optional_text("grade", vec![Some("A".into()), Some("B".into()), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_daily_missing_share() {
        let daily = daily_missing_share(&loans(), "date").unwrap();
        let jan = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        assert_eq!(daily[&jan(1)], 0.25);
        assert_eq!(daily[&jan(2)], 1.0);
    }

    #[test]
    fn test_unavailable_fails_before_reading_data() {
        let heatmap = CalendarHeatmap::unavailable();
        // The column does not exist; the missing capability is reported first
        let result = heatmap.na_datashift(&loans(), "no_such_column", None);
        assert!(matches!(
            result,
            Err(Error::MissingDependency { feature: "calendar", .. })
        ));
    }

    #[test]
    fn test_only_date_column() {
        let data = Dataset::new(vec![Column::text("date", ["2024-01-01"])]).unwrap();
        assert!(matches!(daily_missing_share(&data, "date"), Err(Error::InvalidInput(_))));
    }

    #[cfg(feature = "calendar")]
    #[test]
    fn test_detected_renderer_draws_one_axes_per_year() {
        let heatmap = CalendarHeatmap::detect();
        assert!(heatmap.is_available());

        let figure = heatmap.na_datashift(&loans(), "date", None).unwrap();
        assert_eq!(figure.rows, 1);
        let ax = &figure.all_axes()[0];
        assert_eq!(ax.title.as_deref(), Some("2024"));
    }
}
