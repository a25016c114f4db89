//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::report::{FigureSize, DEFAULT_NBIN};

/// edaclf - Feature engineering pipelines and classification reports
#[derive(Parser, Debug)]
#[command(name = "edaclf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit a JSON-configured transform pipeline on a dataset and write the result
    Transform {
        /// Input file path (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Output file path (CSV or Parquet, determined by extension).
        /// Defaults to the input directory with a '_transformed' suffix.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of rows to use for schema inference (CSV only).
        /// Use 0 for full table scan (very slow for large files).
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },

    /// Build a classification report from a predictions file
    Report {
        /// Predictions file path (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,

        /// Column with the true labels
        #[arg(short, long)]
        target: String,

        /// Column with the predicted labels
        #[arg(long)]
        pred: String,

        /// Column with the predicted probability of class 1.
        /// When given, a binary report is built; otherwise a multiclass one.
        #[arg(long)]
        proba: Option<String>,

        /// Number of equal-frequency bins for the precision/recall sweep
        #[arg(long, default_value_t = DEFAULT_NBIN, value_parser = validate_nbin)]
        nbin: usize,

        /// Name shown in the ROC curve legend
        #[arg(long)]
        classifier_name: Option<String>,

        /// Figure width in inches
        #[arg(long, requires = "height", value_parser = validate_figure_dimension)]
        width: Option<f64>,

        /// Figure height in inches
        #[arg(long, requires = "width", value_parser = validate_figure_dimension)]
        height: Option<f64>,

        /// Write the figure description as JSON to this path
        #[arg(long)]
        figure: Option<PathBuf>,

        /// Write the precision/recall curve as JSON to this path (binary only)
        #[arg(long)]
        curve: Option<PathBuf>,

        /// Number of rows to use for schema inference (CSV only)
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },
}

/// Output path next to the input with a '_transformed' suffix, unless given
pub fn transformed_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(p) => p.to_path_buf(),
        None => {
            let parent = input.parent().unwrap_or_else(|| Path::new("."));
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            let extension = input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("parquet");
            parent.join(format!("{}_transformed.{}", stem, extension))
        }
    }
}

/// Figure size when both dimensions were given
pub fn figure_size(width: Option<f64>, height: Option<f64>) -> Option<FigureSize> {
    match (width, height) {
        (Some(w), Some(h)) => Some(FigureSize::new(w, h)),
        _ => None,
    }
}

/// Validator for nbin parameter
fn validate_nbin(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid bin count", s))?;

    if value == 0 {
        Err("nbin must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for figure width and height
fn validate_figure_dimension(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(value.is_finite() && value > 0.0) {
        Err(format!("figure dimensions must be positive, got {}", value))
    } else {
        Ok(value)
    }
}
