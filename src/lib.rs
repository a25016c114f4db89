//! edaclf: feature-engineering transforms and classification reporting
//!
//! - [`dataset`]: typed columnar datasets and CSV/Parquet IO through polars
//! - [`transform`]: fit/transform stages that report their output schema,
//!   composed with [`transform::Pipeline`] and [`transform::ColumnSubset`]
//! - [`report`]: threshold sweeps, classification metrics and figures
//! - [`eda`]: calendar heatmap of missing values

pub mod cli;
pub mod dataset;
pub mod eda;
pub mod error;
pub mod report;
pub mod transform;
pub mod utils;

pub use error::{Error, Result};
