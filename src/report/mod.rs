//! Report module - classification metrics, threshold sweeps and figures

pub mod canvas;
pub mod classification;
pub mod interpretation;
pub mod metrics;
pub mod sweep;

pub use canvas::{Axes, AxesId, Canvas, Figure, FigureSize, LineStyle, Orientation, Primitive};
pub use classification::{
    binary_classification_report, multiclass_classification_report, precision_recall_plot,
    BinaryReport, MulticlassReport, ReportOptions,
};
pub use interpretation::{permutation_importance_plot, PermutationImportance};
pub use metrics::{gini_index, roc_auc, roc_curve, ClassificationReport, ConfusionMatrix, RocCurve};
pub use sweep::{
    equal_frequency_thresholds, precision_recall_at, ScoreCurve, ScorePoint, SweepStrategy,
    ThresholdSweep, DEFAULT_NBIN,
};
