//! Exploratory data analysis helpers

pub mod calendar;

#[cfg(feature = "calendar")]
pub use calendar::DailyGrid;
pub use calendar::{daily_missing_share, CalendarHeatmap, CalendarRenderer, DailyShare};
