//! Classification metrics: confusion matrix, per-class report and ROC

use std::collections::BTreeSet;
use std::fmt;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Table};
use serde::Serialize;

use crate::error::{Error, Result};

/// Counts of (actual, predicted) label pairs.
///
/// Labels are the sorted union of the actual and predicted labels; rows are
/// actual, columns predicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix<L> {
    labels: Vec<L>,
    counts: Vec<Vec<usize>>,
}

impl<L: Ord + Clone> ConfusionMatrix<L> {
    pub fn from_predictions(actual: &[L], predicted: &[L]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(Error::InvalidInput(format!(
                "y_true length {} != y_pred length {}",
                actual.len(),
                predicted.len()
            )));
        }
        if actual.is_empty() {
            return Err(Error::InvalidInput("no predictions".to_string()));
        }

        let labels: Vec<L> = actual
            .iter()
            .chain(predicted)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (a, p) in actual.iter().zip(predicted) {
            // Both lookups succeed: every label is in the union
            if let (Ok(i), Ok(j)) = (labels.binary_search(a), labels.binary_search(p)) {
                counts[i][j] += 1;
            }
        }

        Ok(Self { labels, counts })
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Row-major counts, rows are actual labels
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    pub fn get(&self, actual: &L, predicted: &L) -> usize {
        match (self.labels.binary_search(actual), self.labels.binary_search(predicted)) {
            (Ok(i), Ok(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.counts[class][class]
    }

    pub fn false_positives(&self, class: usize) -> usize {
        self.counts.iter().map(|row| row[class]).sum::<usize>() - self.counts[class][class]
    }

    pub fn false_negatives(&self, class: usize) -> usize {
        self.counts[class].iter().sum::<usize>() - self.counts[class][class]
    }

    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    /// Counts as f64 for heatmap rendering
    pub fn to_grid(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| row.iter().map(|&c| c as f64).collect())
            .collect()
    }
}

/// Precision, recall, F1 and support for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics with accuracy and macro/weighted averages.
/// Zero divisions yield 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    pub fn from_confusion<L: Ord + Clone + fmt::Display>(cm: &ConfusionMatrix<L>) -> Self {
        let classes: Vec<ClassMetrics> = cm
            .labels()
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let tp = cm.true_positives(i);
                let precision = ratio(tp, tp + cm.false_positives(i));
                let recall = ratio(tp, tp + cm.false_negatives(i));
                ClassMetrics {
                    label: label.to_string(),
                    precision,
                    recall,
                    f1: f1_score(precision, recall),
                    support: cm.support(i),
                }
            })
            .collect();

        let total = cm.total();
        let correct: usize = (0..classes.len()).map(|i| cm.true_positives(i)).sum();
        let n_classes = classes.len() as f64;

        let macro_avg = AveragedMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / n_classes,
            support: total,
        };

        let weighted = |metric: fn(&ClassMetrics) -> f64| -> f64 {
            if total == 0 {
                return 0.0;
            }
            classes
                .iter()
                .map(|c| metric(c) * c.support as f64)
                .sum::<f64>()
                / total as f64
        };
        let weighted_avg = AveragedMetrics {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support: total,
        };

        Self {
            accuracy: ratio(correct, total),
            classes,
            macro_avg,
            weighted_avg,
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Class").add_attribute(Attribute::Bold),
            Cell::new("Precision").add_attribute(Attribute::Bold),
            Cell::new("Recall").add_attribute(Attribute::Bold),
            Cell::new("F1").add_attribute(Attribute::Bold),
            Cell::new("Support").add_attribute(Attribute::Bold),
        ]);

        let number = |v: f64| Cell::new(format!("{:.2}", v)).set_alignment(CellAlignment::Right);
        let count = |v: usize| Cell::new(v).set_alignment(CellAlignment::Right);

        for c in &self.classes {
            table.add_row(vec![
                Cell::new(&c.label),
                number(c.precision),
                number(c.recall),
                number(c.f1),
                count(c.support),
            ]);
        }

        let support = self.macro_avg.support;
        table.add_row(vec![
            Cell::new("accuracy").add_attribute(Attribute::Italic),
            Cell::new(""),
            Cell::new(""),
            number(self.accuracy),
            count(support),
        ]);
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            table.add_row(vec![
                Cell::new(name).add_attribute(Attribute::Italic),
                number(avg.precision),
                number(avg.recall),
                number(avg.f1),
                count(avg.support),
            ]);
        }
        table
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}

/// One ROC operating point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RocPoint {
    pub fpr: f64,
    pub tpr: f64,
    pub threshold: f64,
}

/// ROC curve ordered by descending threshold, starting at (0, 0)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
    pub auc: f64,
}

impl RocCurve {
    pub fn fpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.fpr).collect()
    }

    pub fn tpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.tpr).collect()
    }
}

/// ROC curve over the distinct score values.
///
/// The first point has threshold `+inf`. Both classes must be present.
pub fn roc_curve(labels: &[bool], scores: &[f64]) -> Result<RocCurve> {
    if labels.len() != scores.len() {
        return Err(Error::InvalidInput(format!(
            "labels length {} != scores length {}",
            labels.len(),
            scores.len()
        )));
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(Error::InvalidInput("scores contain NaN".to_string()));
    }

    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(Error::InvalidInput(
            "ROC needs both positive and negative labels".to_string(),
        ));
    }

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_unstable_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut points = vec![RocPoint {
        fpr: 0.0,
        tpr: 0.0,
        threshold: f64::INFINITY,
    }];
    let (mut tp, mut fp) = (0usize, 0usize);
    let mut auc = 0.0;

    let mut i = 0;
    while i < indices.len() {
        let threshold = scores[indices[i]];
        // Consume the whole tie group before emitting a point
        while i < indices.len() && scores[indices[i]] == threshold {
            if labels[indices[i]] {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }

        let prev = points[points.len() - 1];
        let point = RocPoint {
            fpr: fp as f64 / negatives as f64,
            tpr: tp as f64 / positives as f64,
            threshold,
        };
        auc += (point.fpr - prev.fpr) * (point.tpr + prev.tpr) / 2.0;
        points.push(point);
    }

    Ok(RocCurve { points, auc })
}

/// Area under the ROC curve
pub fn roc_auc(labels: &[bool], scores: &[f64]) -> Result<f64> {
    Ok(roc_curve(labels, scores)?.auc)
}

/// Gini index from ROC AUC: `2 * auc - 1`
pub fn gini_index(auc: f64) -> f64 {
    2.0 * auc - 1.0
}
