//! `edaclf report`: classification report from a predictions file

use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::dataset::{dataset_from_frame, load_dataset_with_stats, Column, ColumnData};
use crate::report::{
    binary_classification_report, multiclass_classification_report, FigureSize, ReportOptions,
};
use crate::utils::{
    create_spinner, finish_with_success, print_completion, print_field, print_info, print_path,
    print_success, FOLDER, TARGET,
};

/// Arguments of the report subcommand
#[derive(Debug, Clone)]
pub struct ReportArgs {
    pub input: PathBuf,
    pub target: String,
    pub pred: String,
    pub proba: Option<String>,
    pub nbin: usize,
    pub classifier_name: Option<String>,
    pub figsize: Option<FigureSize>,
    pub figure: Option<PathBuf>,
    pub curve: Option<PathBuf>,
    pub infer_schema_length: usize,
}

/// 0/1-style integer labels; numbers must be whole, text must parse
pub fn integer_labels(column: &Column) -> Result<Vec<i64>> {
    match column.data() {
        ColumnData::Numeric(values) => values
            .iter()
            .enumerate()
            .map(|(row, &v)| {
                if v.is_finite() && v.fract() == 0.0 {
                    Ok(v as i64)
                } else {
                    anyhow::bail!("Column '{}' row {}: '{}' is not an integer label", column.name(), row, v)
                }
            })
            .collect(),
        _ => column
            .to_labels()
            .into_iter()
            .enumerate()
            .map(|(row, label)| {
                let label = label.with_context(|| {
                    format!("Column '{}' row {}: missing label", column.name(), row)
                })?;
                label.trim().parse::<i64>().with_context(|| {
                    format!("Column '{}' row {}: '{}' is not an integer label", column.name(), row, label)
                })
            })
            .collect(),
    }
}

/// Labels as text for multiclass reports; missing labels are rejected
pub fn text_labels(column: &Column) -> Result<Vec<String>> {
    column
        .to_labels()
        .into_iter()
        .enumerate()
        .map(|(row, label)| {
            label.with_context(|| format!("Column '{}' row {}: missing label", column.name(), row))
        })
        .collect()
}

fn write_json(path: &Path, json: &str, what: &str) -> Result<()> {
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}: {}", what, path.display()))?;
    print_success(&format!("{} written to {}", what, path.display()));
    Ok(())
}

fn multiclass_figure<L>(y_true: &[L], y_pred: &[L], options: &ReportOptions) -> Result<String>
where
    L: Ord + Clone + Display,
{
    let report = multiclass_classification_report(y_true, y_pred, options)
        .context("Failed to build multiclass classification report")?;
    report.display();
    Ok(report.figure.to_json()?)
}

pub fn run_report(args: &ReportArgs) -> Result<()> {
    print_path(&FOLDER, "Input:", &args.input);
    print_field(&TARGET, "Target:", &args.target);

    let spinner = create_spinner("Reading predictions...");
    let (df, rows, _, _) = load_dataset_with_stats(&args.input, args.infer_schema_length)?;
    let data = dataset_from_frame(&df).context("Failed to convert predictions")?;
    finish_with_success(&spinner, &format!("Loaded {} predictions", rows));

    let options = ReportOptions {
        classifier_name: args.classifier_name.clone(),
        figsize: args.figsize,
        nbin: args.nbin,
    };
    let target = data.column(&args.target)?;
    let pred = data.column(&args.pred)?;

    let figure_json = match &args.proba {
        Some(proba) => {
            let y_true = integer_labels(target)?;
            let y_pred = integer_labels(pred)?;
            let y_proba = data.column(proba)?.as_numeric()?;

            let report = binary_classification_report(&y_true, &y_pred, y_proba, &options)
                .context("Failed to build binary classification report")?;
            report.display();

            if let Some(path) = &args.curve {
                write_json(path, &serde_json::to_string_pretty(&report.curve)?, "Precision/recall curve")?;
            }
            report.figure.to_json()?
        }
        None => {
            if args.curve.is_some() {
                print_info("--curve needs --proba; skipping the precision/recall curve");
            }
            // Integer classes sort numerically; anything else falls back to text
            match (integer_labels(target), integer_labels(pred)) {
                (Ok(y_true), Ok(y_pred)) => multiclass_figure(&y_true, &y_pred, &options)?,
                _ => multiclass_figure(&text_labels(target)?, &text_labels(pred)?, &options)?,
            }
        }
    };

    if let Some(path) = &args.figure {
        write_json(path, &figure_json, "Figure")?;
    }

    print_completion("Report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_labels_from_numbers_and_text() {
        let numeric = Column::numeric("y", vec![0.0, 1.0, 1.0]);
        assert_eq!(integer_labels(&numeric).unwrap(), vec![0, 1, 1]);

        let text = Column::text("y", ["1", " 0"]);
        assert_eq!(integer_labels(&text).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_integer_labels_rejects_fractions_and_missing() {
        assert!(integer_labels(&Column::numeric("y", vec![0.5])).is_err());
        assert!(integer_labels(&Column::numeric("y", vec![f64::NAN])).is_err());
        assert!(integer_labels(&Column::text("y", ["yes"])).is_err());
    }

    #[test]
    fn test_text_labels() {
        let column = Column::optional_text("y", vec![Some("cat".into()), None]);
        assert!(text_labels(&column).is_err());
        let column = Column::numeric("y", vec![1.0, 2.0]);
        assert_eq!(text_labels(&column).unwrap(), vec!["1", "2"]);
    }
}
