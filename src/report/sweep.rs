//! Precision/recall threshold sweep over equal-frequency thresholds
//!
//! Thresholds are interior quantiles of the predicted scores: `nbin + 1`
//! evenly spaced rank positions over `[0, n - 1]`, linearly interpolated
//! between adjacent sorted scores, with the minimum and maximum dropped.
//! A score is predicted positive when `score >= threshold`.
//!
//! Zero-division policy: precision is 0.0 when nothing is predicted
//! positive, recall is 0.0 when there are no actual positives.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Default number of equal-frequency bins
pub const DEFAULT_NBIN: usize = 255;

/// One point of the sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScorePoint {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Sweep result ordered by non-decreasing threshold
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreCurve {
    points: Vec<ScorePoint>,
}

impl ScoreCurve {
    pub fn points(&self) -> &[ScorePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.threshold).collect()
    }

    pub fn precisions(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.precision).collect()
    }

    pub fn recalls(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.recall).collect()
    }
}

/// How per-threshold counts are computed. Both give identical curves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepStrategy {
    /// Sort once and sweep thresholds downward with running TP/FP counts
    #[default]
    Cumulative,
    /// Count every threshold independently on the rayon pool
    Parallel,
}

/// Equal-frequency threshold sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdSweep {
    nbin: usize,
    strategy: SweepStrategy,
}

impl Default for ThresholdSweep {
    fn default() -> Self {
        Self {
            nbin: DEFAULT_NBIN,
            strategy: SweepStrategy::default(),
        }
    }
}

impl ThresholdSweep {
    /// Fails with `Configuration` when `nbin` is zero
    pub fn new(nbin: usize) -> Result<Self> {
        if nbin == 0 {
            return Err(Error::Configuration("nbin must be at least 1".to_string()));
        }
        Ok(Self {
            nbin,
            strategy: SweepStrategy::default(),
        })
    }

    pub fn with_strategy(mut self, strategy: SweepStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn nbin(&self) -> usize {
        self.nbin
    }

    pub fn strategy(&self) -> SweepStrategy {
        self.strategy
    }

    /// Interior equal-frequency thresholds of `scores`
    pub fn thresholds(&self, scores: &[f64]) -> Result<Vec<f64>> {
        let sorted = sorted_scores(scores)?;
        Ok(interior_quantiles(&sorted, self.nbin))
    }

    /// Precision and recall at every interior threshold
    pub fn run(&self, labels: &[bool], scores: &[f64]) -> Result<ScoreCurve> {
        if labels.len() != scores.len() {
            return Err(Error::InvalidInput(format!(
                "labels length {} != scores length {}",
                labels.len(),
                scores.len()
            )));
        }

        let thresholds = self.thresholds(scores)?;
        let points = match self.strategy {
            SweepStrategy::Cumulative => cumulative_sweep(labels, scores, &thresholds),
            SweepStrategy::Parallel => thresholds
                .par_iter()
                .map(|&t| precision_recall_at(labels, scores, t))
                .collect(),
        };

        debug!(
            n = scores.len(),
            nbin = self.nbin,
            thresholds = points.len(),
            strategy = ?self.strategy,
            "threshold sweep complete"
        );
        Ok(ScoreCurve { points })
    }
}

/// Interior equal-frequency thresholds with `nbin` bins
pub fn equal_frequency_thresholds(scores: &[f64], nbin: usize) -> Result<Vec<f64>> {
    ThresholdSweep::new(nbin)?.thresholds(scores)
}

/// Precision and recall for a single threshold, counted directly
pub fn precision_recall_at(labels: &[bool], scores: &[f64], threshold: f64) -> ScorePoint {
    let (mut tp, mut fp, mut positives) = (0usize, 0usize, 0usize);
    for (&label, &score) in labels.iter().zip(scores) {
        if label {
            positives += 1;
        }
        if score >= threshold {
            if label {
                tp += 1;
            } else {
                fp += 1;
            }
        }
    }
    point(threshold, tp, fp, positives)
}

fn point(threshold: f64, tp: usize, fp: usize, positives: usize) -> ScorePoint {
    let predicted = tp + fp;
    ScorePoint {
        threshold,
        precision: if predicted == 0 { 0.0 } else { tp as f64 / predicted as f64 },
        recall: if positives == 0 { 0.0 } else { tp as f64 / positives as f64 },
    }
}

fn sorted_scores(scores: &[f64]) -> Result<Vec<f64>> {
    if scores.is_empty() {
        return Err(Error::InvalidInput("scores are empty".to_string()));
    }
    if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
        return Err(Error::InvalidInput(format!("scores must be finite, got {}", bad)));
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

/// Quantiles at rank positions `k * (n - 1) / nbin` for `k` in `1..nbin`
fn interior_quantiles(sorted: &[f64], nbin: usize) -> Vec<f64> {
    let last = sorted.len() - 1;
    let step = last as f64 / nbin as f64;

    (1..nbin)
        .map(|k| {
            let position = k as f64 * step;
            let lower = (position.floor() as usize).min(last);
            if lower == last {
                sorted[last]
            } else {
                let fraction = position - lower as f64;
                (sorted[lower + 1] - sorted[lower]) * fraction + sorted[lower]
            }
        })
        .collect()
}

/// Running-count sweep: O(n log n + nbin) for ascending `thresholds`
fn cumulative_sweep(labels: &[bool], scores: &[f64], thresholds: &[f64]) -> Vec<ScorePoint> {
    let mut pairs: Vec<(f64, bool)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));
    let positives = labels.iter().filter(|&&l| l).count();

    let (mut tp, mut fp, mut next) = (0usize, 0usize, 0usize);
    let mut points: Vec<ScorePoint> = thresholds
        .iter()
        .rev()
        .map(|&t| {
            while next < pairs.len() && pairs[next].0 >= t {
                if pairs[next].1 {
                    tp += 1;
                } else {
                    fp += 1;
                }
                next += 1;
            }
            point(t, tp, fp, positives)
        })
        .collect();

    points.reverse();
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_scores_two_bins() {
        let curve = ThresholdSweep::new(2)
            .unwrap()
            .run(&[false, true], &[0.1, 0.9])
            .unwrap();

        assert_eq!(curve.len(), 1);
        let p = curve.points()[0];
        assert!((p.threshold - 0.5).abs() < 1e-12);
        assert_eq!(p.recall, 1.0);
        assert_eq!(p.precision, 1.0);
    }

    #[test]
    fn test_thresholds_match_linear_interpolation() {
        // positions 0, 1.5, 3 over [1, 2, 3, 4]
        let thresholds = equal_frequency_thresholds(&[4.0, 1.0, 3.0, 2.0], 2).unwrap();
        assert_eq!(thresholds, vec![2.5]);

        // positions 0, 0.75, 1.5, 2.25, 3
        let thresholds = equal_frequency_thresholds(&[1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(thresholds, vec![1.75, 2.5, 3.25]);
    }

    #[test]
    fn test_ties_are_kept() {
        let thresholds = equal_frequency_thresholds(&[0.5; 6], 4).unwrap();
        assert_eq!(thresholds, vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_nbin_one_gives_empty_curve() {
        let curve = ThresholdSweep::new(1).unwrap().run(&[true], &[0.3]).unwrap();
        assert!(curve.is_empty());
    }

    #[test]
    fn test_zero_nbin_rejected() {
        assert!(matches!(ThresholdSweep::new(0), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_invalid_inputs() {
        let sweep = ThresholdSweep::default();
        assert!(matches!(sweep.run(&[], &[]), Err(Error::InvalidInput(_))));
        assert!(matches!(sweep.run(&[true], &[0.1, 0.2]), Err(Error::InvalidInput(_))));
        assert!(matches!(sweep.run(&[true], &[f64::NAN]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_infinite_scores_rejected() {
        let labels = [false, true, true];
        for bad in [f64::INFINITY, f64::NEG_INFINITY] {
            let scores = [0.2, 0.6, bad];
            let sweep = ThresholdSweep::new(4).unwrap();
            assert!(matches!(sweep.run(&labels, &scores), Err(Error::InvalidInput(_))));
            assert!(matches!(
                sweep.with_strategy(SweepStrategy::Parallel).run(&labels, &scores),
                Err(Error::InvalidInput(_))
            ));
            assert!(equal_frequency_thresholds(&scores, 4).is_err());
        }
    }

    #[test]
    fn test_no_predicted_positives_gives_zero_precision() {
        let p = precision_recall_at(&[true, false], &[0.2, 0.4], 0.9);
        assert_eq!(p.precision, 0.0);
        assert_eq!(p.recall, 0.0);
    }

    #[test]
    fn test_no_actual_positives_gives_zero_recall() {
        let p = precision_recall_at(&[false, false], &[0.2, 0.4], 0.1);
        assert_eq!(p.precision, 0.0);
        assert_eq!(p.recall, 0.0);
    }

    #[test]
    fn test_boundary_thresholds() {
        let labels = [false, true, false, true, true];
        let scores = [0.05, 0.3, 0.45, 0.7, 0.95];

        let at_min = precision_recall_at(&labels, &scores, 0.05);
        assert_eq!(at_min.recall, 1.0);
        assert!((at_min.precision - 0.6).abs() < 1e-12);

        let above_max = precision_recall_at(&labels, &scores, 0.96);
        assert_eq!(above_max.recall, 0.0);
        assert_eq!(above_max.precision, 0.0);
    }

    #[test]
    fn test_strategies_agree_with_ties() {
        let labels = [true, false, true, true, false, false, true, false];
        let scores = [0.9, 0.1, 0.5, 0.5, 0.5, 0.2, 0.7, 0.7];

        let cumulative = ThresholdSweep::new(5).unwrap().run(&labels, &scores).unwrap();
        let parallel = ThresholdSweep::new(5)
            .unwrap()
            .with_strategy(SweepStrategy::Parallel)
            .run(&labels, &scores)
            .unwrap();

        assert_eq!(cumulative, parallel);
    }
}
