//! Tests for the individual transform stages

mod common;

use common::{create_applications, create_pair};
use edaclf::dataset::{Column, Dataset};
use edaclf::transform::{
    AbsoluteValue, AgeFromDates, CategoricalCast, CategoryDictionary, ColumnSubset,
    DatetimeDecomposition, InterestCalculation, PairwiseDifference, PairwiseRatio, Remainder,
    TransformStage,
};
use edaclf::Error;

/// Every stage fitted on a dataset it accepts
fn fitted_stages() -> Vec<(Box<dyn TransformStage>, Dataset)> {
    let apps = create_applications();
    let money = apps.select(&["credit_amount", "months"]).unwrap();
    let dates = apps.select(&["application_date", "birthdate"]).unwrap();
    let single_date = apps.select(&["application_date"]).unwrap();
    let grades = CategoryDictionary::new().with("grade", ["A", "B", "C"]).unwrap();

    let mut stages: Vec<(Box<dyn TransformStage>, Dataset)> = vec![
        (Box::new(AbsoluteValue::new()), create_pair()),
        (Box::new(PairwiseDifference::new()), create_pair()),
        (Box::new(PairwiseRatio::new()), create_pair()),
        (Box::new(InterestCalculation::new()), money),
        (Box::new(AgeFromDates::new()), dates),
        (Box::new(DatetimeDecomposition::all()), single_date),
        (Box::new(CategoricalCast::new(grades)), apps.clone()),
        (
            Box::new(ColumnSubset::new(
                ["income", "debt"],
                Box::new(PairwiseRatio::new()),
                Remainder::Passthrough,
            )),
            apps,
        ),
    ];

    for (stage, data) in stages.iter_mut() {
        stage.fit(data, None).unwrap();
    }
    stages
}

#[test]
fn test_feature_names_match_output_width() {
    for (stage, data) in fitted_stages() {
        let out = stage.transform(&data).unwrap();
        assert_eq!(
            stage.feature_names().unwrap().len(),
            out.width(),
            "{} reports a wrong number of names",
            stage.name()
        );
        assert_eq!(stage.feature_names().unwrap(), out.column_names().as_slice());
    }
}

#[test]
fn test_transform_is_idempotent_and_leaves_input_untouched() {
    for (stage, data) in fitted_stages() {
        let before = data.clone();
        let first = stage.transform(&data).unwrap();
        let second = stage.transform(&data).unwrap();

        assert_eq!(data, before, "{} mutated its input", stage.name());
        // NaN != NaN, so compare through the debug form
        assert_eq!(
            format!("{:?}", first),
            format!("{:?}", second),
            "{} is not idempotent",
            stage.name()
        );
    }
}

#[test]
fn test_every_stage_requires_fit() {
    let unfitted: Vec<Box<dyn TransformStage>> = vec![
        Box::new(AbsoluteValue::new()),
        Box::new(PairwiseDifference::new()),
        Box::new(PairwiseRatio::new()),
        Box::new(InterestCalculation::new()),
        Box::new(AgeFromDates::new()),
        Box::new(DatetimeDecomposition::all()),
        Box::new(CategoricalCast::new(CategoryDictionary::new())),
    ];

    for stage in unfitted {
        assert!(!stage.is_fitted());
        assert!(matches!(stage.transform(&create_pair()), Err(Error::NotFitted { .. })));
        assert!(matches!(stage.feature_names(), Err(Error::NotFitted { .. })));
    }
}

#[test]
fn test_ratio_and_difference_values() {
    let mut ratio = PairwiseRatio::new();
    let out = ratio.fit_transform(&create_pair(), None).unwrap();
    assert_eq!(out.column("a_b_ratio").unwrap().as_numeric().unwrap(), &[5.0, 5.0, 6.0]);

    let mut dif = PairwiseDifference::new();
    let out = dif.fit_transform(&create_pair(), None).unwrap();
    assert_eq!(out.column("a_b_dif").unwrap().as_numeric().unwrap(), &[8.0, 16.0, 25.0]);
}

#[test]
fn test_ratio_by_zero_is_infinite() {
    let apps = create_applications();
    let mut ratio = PairwiseRatio::new();
    let out = ratio
        .fit_transform(&apps.select(&["income", "debt"]).unwrap(), None)
        .unwrap();

    let values = out.column("income_debt_ratio").unwrap().as_numeric().unwrap();
    assert_eq!(values[3], f64::INFINITY);
}

#[test]
fn test_age_twenty_years() {
    let x = Dataset::new(vec![
        Column::text("application_date", ["2020-01-01"]),
        Column::text("birthdate", ["2000-01-01"]),
    ])
    .unwrap();

    let mut stage = AgeFromDates::new();
    let out = stage.fit_transform(&x, None).unwrap();
    let age = out.column("age").unwrap().as_numeric().unwrap()[0];
    assert!((age - 20.0).abs() < 0.01, "age was {}", age);
}

#[test]
fn test_datetime_decomposition_all_disabled() {
    assert!(matches!(
        DatetimeDecomposition::new(false, false, false),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_datetime_decomposition_components() {
    let x = Dataset::new(vec![Column::text("ts", ["2024-02-29 06:30:15"])]).unwrap();
    let mut stage = DatetimeDecomposition::new(true, true, true).unwrap();
    let out = stage.fit_transform(&x, None).unwrap();

    let day = out.column("day").unwrap().as_categorical().unwrap();
    assert_eq!(day.label(0), Some("29"));
    // 2024-02-29 is a Thursday
    let weekday = out.column("weekday").unwrap().as_categorical().unwrap();
    assert_eq!(weekday.label(0), Some("3"));
    let seconds = out.column("seconds").unwrap().as_numeric().unwrap();
    assert_eq!(seconds[0], 6.0 * 3600.0 + 30.0 * 60.0 + 15.0);
}

#[test]
fn test_categorical_cast_unknown_becomes_missing() {
    let grades = CategoryDictionary::new().with("grade", ["A", "B"]).unwrap();
    let mut stage = CategoricalCast::new(grades);
    let out = stage.fit_transform(&create_applications(), None).unwrap();

    let grade = out.column("grade").unwrap().as_categorical().unwrap();
    assert_eq!(grade.codes(), &[Some(0), None, None, Some(1)]);
    assert_eq!(out.width(), create_applications().width());
}

#[test]
fn test_interest_rounding() {
    let x = Dataset::new(vec![
        Column::numeric("amount", vec![1000.0]),
        Column::numeric("days", vec![300.0]),
    ])
    .unwrap();
    let mut stage = InterestCalculation::new();
    let out = stage.fit_transform(&x, None).unwrap();

    // 1000 * 0.0010378267640343 * 300 = 311.348...
    assert_eq!(out.column("interest").unwrap().as_numeric().unwrap(), &[311.35]);
}

#[test]
fn test_width_mismatch_after_fit() {
    let mut stage = AbsoluteValue::new();
    stage.fit(&create_pair(), None).unwrap();

    let wider = create_pair()
        .with_column(Column::numeric("c", vec![1.0, 2.0, 3.0]))
        .unwrap();
    assert!(matches!(stage.transform(&wider), Err(Error::Schema(_))));
}
