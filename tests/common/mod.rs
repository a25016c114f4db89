//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::path::PathBuf;

use edaclf::dataset::{Column, Dataset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Loan applications with every column type the stages consume:
/// - `income`, `debt`: numeric pair for ratio/difference
/// - `application_date`, `birthdate`: text dates for age
/// - `grade`: text labels for categorical cast
/// - `credit_amount`, `months`: inputs of the interest calculation
pub fn create_applications() -> Dataset {
    Dataset::new(vec![
        Column::numeric("income", vec![10.0, 20.0, 30.0, 45.0]),
        Column::numeric("debt", vec![2.0, 4.0, 5.0, 0.0]),
        Column::text(
            "application_date",
            ["2020-01-01", "2021-03-15", "2019-07-31", "2022-12-24"],
        ),
        Column::text(
            "birthdate",
            ["2000-01-01", "1985-03-15", "1970-01-01", "1999-02-28"],
        ),
        Column::optional_text(
            "grade",
            vec![Some("A".into()), Some("C".into()), None, Some("B".into())],
        ),
        Column::numeric("credit_amount", vec![1000.0, 2500.0, 500.0, 12000.0]),
        Column::numeric("months", vec![12.0, 24.0, 6.0, 36.0]),
    ])
    .unwrap()
}

/// Pairwise example from the ratio/difference definitions
pub fn create_pair() -> Dataset {
    Dataset::new(vec![
        Column::numeric("a", vec![10.0, 20.0, 30.0]),
        Column::numeric("b", vec![2.0, 4.0, 5.0]),
    ])
    .unwrap()
}

/// Random binary labels and scores; positives score higher on average
pub fn create_scores(n: usize, seed: u64) -> (Vec<bool>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let label = rng.gen_bool(0.3);
            let noise: f64 = rng.gen();
            let score = if label { 0.4 + 0.6 * noise } else { 0.7 * noise };
            (label, score)
        })
        .unzip()
}

/// Scores drawn from a handful of values so ties are common
pub fn create_tied_scores(n: usize, seed: u64) -> (Vec<bool>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.gen_bool(0.5), rng.gen_range(0..5) as f64 / 4.0))
        .unzip()
}

/// Write content to a file in a fresh temp directory
pub fn create_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}

pub const APPLICATIONS_CSV: &str = "\
income,debt,application_date,birthdate,grade
10,2,2020-01-01,2000-01-01,A
20,4,2021-03-15,1985-03-15,C
30,5,2019-07-31,1970-01-01,
45,0,2022-12-24,1999-02-28,B
";

pub const PIPELINE_JSON: &str = r#"{
    "steps": [
        {"name": "ratio", "columns": ["income", "debt"], "stage": {"type": "pairwise_ratio"}},
        {"name": "age", "columns": ["application_date", "birthdate"], "remainder": "passthrough",
         "stage": {"type": "age_from_dates"}},
        {"name": "grades", "columns": ["grade"], "stage": {"type": "categorical_cast", "categories": {"grade": ["A", "B", "C"]}}}
    ]
}"#;

pub const PREDICTIONS_CSV: &str = "\
target,pred,proba
0,0,0.10
0,1,0.60
1,1,0.80
1,1,0.70
0,0,0.20
1,0,0.40
1,1,0.90
0,0,0.30
";
