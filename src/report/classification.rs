//! Binary and multiclass classification reports

use std::fmt::Display;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};

use super::canvas::{AxesId, Canvas, Figure, FigureSize, LineStyle};
use super::metrics::{gini_index, roc_curve, ClassificationReport, ConfusionMatrix, RocCurve};
use super::sweep::{ScoreCurve, ThresholdSweep, DEFAULT_NBIN};

/// Default size of the 2x2 binary report figure
pub const BINARY_FIGSIZE: FigureSize = FigureSize {
    width: 12.8,
    height: 9.6,
};

/// Default size of the multiclass confusion matrix figure
pub const MULTICLASS_FIGSIZE: FigureSize = FigureSize {
    width: 6.4,
    height: 4.8,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Legend name of the ROC curve
    pub classifier_name: Option<String>,
    pub figsize: Option<FigureSize>,
    /// Bins of the precision/recall sweep
    pub nbin: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            classifier_name: None,
            figsize: None,
            nbin: DEFAULT_NBIN,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BinaryReport {
    pub figure: Figure,
    pub confusion: ConfusionMatrix<i64>,
    pub report: ClassificationReport,
    pub roc: RocCurve,
    pub curve: ScoreCurve,
    pub gini: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MulticlassReport<L> {
    pub figure: Figure,
    pub confusion: ConfusionMatrix<L>,
    pub report: ClassificationReport,
}

fn check_binary(name: &str, labels: &[i64]) -> Result<()> {
    match labels.iter().find(|&&l| l != 0 && l != 1) {
        Some(l) => Err(Error::InvalidInput(format!(
            "{} must contain only 0/1 labels, found {}",
            name, l
        ))),
        None => Ok(()),
    }
}

/// Sturges' rule
fn histogram_bin_count(n: usize) -> usize {
    (n.max(1) as f64).log2().ceil() as usize + 1
}

fn draw_confusion<L: Ord + Clone + Display>(canvas: &mut dyn Canvas, cm: &ConfusionMatrix<L>) {
    let labels: Vec<String> = cm.labels().iter().map(ToString::to_string).collect();
    canvas.heatmap(cm.to_grid(), labels.clone(), labels);
    canvas.title("Confusion Matrix");
    canvas.labels(Some("Predicted label"), Some("True label"));
}

fn draw_roc(canvas: &mut dyn Canvas, roc: &RocCurve, classifier_name: Option<&str>) {
    let label = match classifier_name {
        Some(name) => format!("{} (AUC = {:.2})", name, roc.auc),
        None => format!("AUC = {:.2}", roc.auc),
    };
    canvas.line(&roc.fpr(), &roc.tpr(), LineStyle::new().color("orange").label(label));
    canvas.line(&[0.0, 1.0], &[0.0, 1.0], LineStyle::new().color("navy").dashed());
    canvas.title("ROC Curve");
    canvas.labels(Some("False Positive Rate"), Some("True Positive Rate"));
    canvas.limits(Some((-0.01, 1.0)), Some((0.0, 1.01)));
    canvas.legend();
}

/// Draw precision and recall against the equal-frequency thresholds
pub fn precision_recall_plot(
    labels: &[bool],
    scores: &[f64],
    canvas: &mut dyn Canvas,
    nbin: usize,
) -> Result<ScoreCurve> {
    let curve = ThresholdSweep::new(nbin)?.run(labels, scores)?;
    let thresholds = curve.thresholds();

    canvas.line(
        &thresholds,
        &curve.precisions(),
        LineStyle::new().color("red").label("precision"),
    );
    canvas.line(
        &thresholds,
        &curve.recalls(),
        LineStyle::new().color("blue").label("recall"),
    );
    canvas.labels(Some("Threshold"), None);
    canvas.legend();
    Ok(curve)
}

/// Confusion matrix, probability density, ROC and precision/recall panels
/// plus the textual report and Gini index.
///
/// `y_true` and `y_pred` must hold 0/1 labels; `y_proba` is the predicted
/// probability of class 1.
pub fn binary_classification_report(
    y_true: &[i64],
    y_pred: &[i64],
    y_proba: &[f64],
    options: &ReportOptions,
) -> Result<BinaryReport> {
    if y_proba.len() != y_true.len() {
        return Err(Error::InvalidInput(format!(
            "y_true length {} != y_proba length {}",
            y_true.len(),
            y_proba.len()
        )));
    }
    check_binary("y_true", y_true)?;
    check_binary("y_pred", y_pred)?;

    let confusion = ConfusionMatrix::from_predictions(y_true, y_pred)?;
    let report = ClassificationReport::from_confusion(&confusion);

    let positives: Vec<bool> = y_true.iter().map(|&l| l == 1).collect();
    let roc = roc_curve(&positives, y_proba)?;
    let gini = gini_index(roc.auc);

    let mut figure = Figure::grid(2, 2, options.figsize.unwrap_or(BINARY_FIGSIZE));

    draw_confusion(figure.axes_mut(AxesId::new(0, 0))?, &confusion);

    let density = figure.axes_mut(AxesId::new(0, 1))?;
    density.histogram(y_proba, histogram_bin_count(y_proba.len()), true);
    density.labels(Some("Probability"), Some("Density"));

    draw_roc(
        figure.axes_mut(AxesId::new(1, 0))?,
        &roc,
        options.classifier_name.as_deref(),
    );

    let curve = precision_recall_plot(
        &positives,
        y_proba,
        figure.axes_mut(AxesId::new(1, 1))?,
        options.nbin,
    )?;

    info!(n = y_true.len(), auc = roc.auc, gini, "binary classification report built");

    Ok(BinaryReport {
        figure,
        confusion,
        report,
        roc,
        curve,
        gini,
    })
}

/// Confusion matrix figure and textual report for any label type
pub fn multiclass_classification_report<L: Ord + Clone + Display>(
    y_true: &[L],
    y_pred: &[L],
    options: &ReportOptions,
) -> Result<MulticlassReport<L>> {
    let confusion = ConfusionMatrix::from_predictions(y_true, y_pred)?;
    let report = ClassificationReport::from_confusion(&confusion);

    let mut figure = Figure::new(options.figsize.unwrap_or(MULTICLASS_FIGSIZE));
    draw_confusion(figure.axes_mut(AxesId::new(0, 0))?, &confusion);

    info!(
        n = y_true.len(),
        classes = confusion.labels().len(),
        accuracy = report.accuracy,
        "multiclass classification report built"
    );

    Ok(MulticlassReport {
        figure,
        confusion,
        report,
    })
}

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn confusion_table<L: Ord + Clone + Display>(cm: &ConfusionMatrix<L>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![Cell::new("True \\ Pred").add_attribute(Attribute::Bold)];
    header.extend(
        cm.labels()
            .iter()
            .map(|l| Cell::new(l).add_attribute(Attribute::Bold)),
    );
    table.set_header(header);

    for (i, label) in cm.labels().iter().enumerate() {
        let mut row = vec![Cell::new(label).add_attribute(Attribute::Bold)];
        row.extend(cm.counts()[i].iter().enumerate().map(|(j, &count)| {
            let color = if i == j { Color::Green } else { Color::White };
            Cell::new(count).fg(color)
        }));
        table.add_row(row);
    }
    table
}

fn gini_color(gini: f64) -> Color {
    if gini > 0.6 {
        Color::Green
    } else if gini > 0.3 {
        Color::Yellow
    } else {
        Color::Red
    }
}

impl BinaryReport {
    pub fn display(&self) {
        print_section("📊", "CONFUSION MATRIX");
        print_indented(&confusion_table(&self.confusion));

        print_section("📋", "CLASSIFICATION REPORT");
        print_indented(&self.report.to_table());

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![Cell::new("ROC AUC"), Cell::new(format!("{:.4}", self.roc.auc))]);
        table.add_row(vec![
            Cell::new("Gini index"),
            Cell::new(format!("{:.4}", self.gini))
                .fg(gini_color(self.gini))
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![Cell::new("Thresholds swept"), Cell::new(self.curve.len())]);

        print_section("📈", "RANKING QUALITY");
        print_indented(&table);
    }
}

impl<L: Ord + Clone + Display> MulticlassReport<L> {
    pub fn display(&self) {
        print_section("📊", "CONFUSION MATRIX");
        print_indented(&confusion_table(&self.confusion));

        print_section("📋", "CLASSIFICATION REPORT");
        print_indented(&self.report.to_table());
    }
}
