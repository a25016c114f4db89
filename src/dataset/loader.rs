//! Dataset loader and writer for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::frame::dataset_to_frame;
use super::Dataset;

/// Lowercased file extension, empty when absent
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Lazily scan a dataset from a file (CSV or Parquet based on extension).
///
/// `infer_schema_length` applies to CSV only; 0 means a full table scan.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = extension_of(path);
    let infer = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(infer)
            .with_try_parse_dates(true)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load and collect a dataset, returning `(df, rows, cols, memory_mb)`
pub fn load_dataset_with_stats(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    let df = load_dataset(path, infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    tracing::debug!(rows, cols, memory_mb, path = %path.display(), "dataset loaded");

    Ok((df, rows, cols, memory_mb))
}

/// Save a dataset to file (CSV or Parquet based on extension)
pub fn save_dataset(ds: &Dataset, path: &Path) -> Result<()> {
    let mut df = dataset_to_frame(ds)?;

    match extension_of(path).as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(&mut df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(&mut df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        other => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            other
        ),
    }

    Ok(())
}
