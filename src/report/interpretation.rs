//! Permutation importance visualization

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::canvas::{AxesId, Canvas, Figure, FigureSize, LineStyle, Orientation, ViolinGroup};

/// Score decreases per feature, one row per feature, one value per repeat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermutationImportance {
    pub importances: Vec<Vec<f64>>,
}

impl PermutationImportance {
    pub fn new(importances: Vec<Vec<f64>>) -> Self {
        Self { importances }
    }

    pub fn n_features(&self) -> usize {
        self.importances.len()
    }

    /// Mean importance per feature; NaN for a feature without repeats
    pub fn importances_mean(&self) -> Vec<f64> {
        self.importances
            .iter()
            .map(|repeats| repeats.iter().sum::<f64>() / repeats.len() as f64)
            .collect()
    }
}

/// Horizontal violins of the importance distributions, most important first.
///
/// Default size is 12 wide and 0.3 inch per feature tall.
pub fn permutation_importance_plot<S: AsRef<str>>(
    pi: &PermutationImportance,
    feature_names: &[S],
    figsize: Option<FigureSize>,
) -> Result<(Figure, AxesId)> {
    if feature_names.len() != pi.n_features() {
        return Err(Error::InvalidInput(format!(
            "{} feature names for {} importance rows",
            feature_names.len(),
            pi.n_features()
        )));
    }

    let means = pi.importances_mean();
    let mut order: Vec<usize> = (0..means.len()).collect();
    order.sort_by(|&a, &b| means[b].total_cmp(&means[a]));

    let groups = order
        .iter()
        .map(|&i| ViolinGroup {
            label: feature_names[i].as_ref().to_string(),
            values: pi.importances[i].clone(),
        })
        .collect();

    let size = figsize.unwrap_or_else(|| FigureSize::new(12.0, 0.3 * pi.n_features() as f64));
    let mut figure = Figure::new(size);
    let id = AxesId::new(0, 0);

    let ax = figure.axes_mut(id)?;
    ax.violin(groups, Orientation::Horizontal);
    ax.title("Permutation Importances");
    ax.labels(Some("Decrease in accuracy score"), None);
    ax.vline(0.0, LineStyle::new().color("k").dashed());

    Ok((figure, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::canvas::{Dash, Primitive};

    #[test]
    fn test_sorted_by_descending_mean() {
        let pi = PermutationImportance::new(vec![
            vec![0.01, 0.03],
            vec![0.20, 0.10],
            vec![-0.01, 0.0],
        ]);
        let (figure, id) = permutation_importance_plot(&pi, &["age", "income", "noise"], None).unwrap();

        assert_eq!(figure.size, FigureSize::new(12.0, 0.3 * 3.0));
        let ax = figure.axes(id).unwrap();
        assert_eq!(ax.title.as_deref(), Some("Permutation Importances"));
        assert_eq!(ax.xlabel.as_deref(), Some("Decrease in accuracy score"));

        match &ax.primitives[0] {
            Primitive::Violin { groups, orientation } => {
                let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
                assert_eq!(labels, vec!["income", "age", "noise"]);
                assert_eq!(*orientation, Orientation::Horizontal);
            }
            other => panic!("expected violin, got {:?}", other),
        }
        match &ax.primitives[1] {
            Primitive::VLine { x, style } => {
                assert_eq!(*x, 0.0);
                assert_eq!(style.dash, Dash::Dashed);
            }
            other => panic!("expected vline, got {:?}", other),
        }
    }

    #[test]
    fn test_name_count_mismatch() {
        let pi = PermutationImportance::new(vec![vec![0.1]]);
        let result = permutation_importance_plot(&pi, &["a", "b"], None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_mean_per_feature() {
        let pi = PermutationImportance::new(vec![vec![1.0, 3.0], vec![0.5]]);
        assert_eq!(pi.importances_mean(), vec![2.0, 0.5]);
    }
}
