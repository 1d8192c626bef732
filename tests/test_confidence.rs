use demand_forecast::confidence::{
    dispersion_confidence, residual_confidence, ConfidenceLevel, ConfidenceResult,
};
use demand_forecast::data::{DemandRecord, DemandSeries};
use rstest::rstest;

fn monthly_series(values: &[f64]) -> DemandSeries {
    let records: Vec<DemandRecord> = values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            DemandRecord::new("TEST", 2022 + (i / 12) as i32, (i % 12) as u32 + 1, value)
        })
        .collect();
    DemandSeries::from_records(&records).unwrap()
}

#[rstest]
#[case(100.0, ConfidenceLevel::High)]
#[case(70.01, ConfidenceLevel::High)]
#[case(70.0, ConfidenceLevel::Medium)]
#[case(50.0, ConfidenceLevel::Medium)]
#[case(40.01, ConfidenceLevel::Medium)]
#[case(40.0, ConfidenceLevel::Low)]
#[case(0.0, ConfidenceLevel::Low)]
fn test_level_step_function(#[case] score: f64, #[case] expected: ConfidenceLevel) {
    assert_eq!(ConfidenceLevel::from_score(score), expected);
}

#[test]
fn test_dispersion_zero_variance() {
    let series = monthly_series(&[100.0; 12]);
    let confidence = dispersion_confidence(&series);

    assert_eq!(confidence.score, 100.0);
    assert_eq!(confidence.level, ConfidenceLevel::High);
    assert!(confidence.mae.is_none());
}

#[test]
fn test_dispersion_score_stays_in_range() {
    // Wildly dispersed series would push the raw formula negative
    let series = monthly_series(&[1.0, 500.0, 2.0, 800.0, 1.0, 900.0, 3.0, 700.0, 2.0, 600.0, 1.0, 950.0]);
    let confidence = dispersion_confidence(&series);

    assert!(confidence.score >= 0.0 && confidence.score <= 100.0);
    assert_eq!(confidence.level, ConfidenceLevel::Low);
}

#[test]
fn test_dispersion_all_zero_series() {
    let series = monthly_series(&[0.0; 12]);
    let confidence = dispersion_confidence(&series);

    assert_eq!(confidence.score, 0.0);
    assert_eq!(confidence.level, ConfidenceLevel::Low);
}

#[test]
fn test_residual_perfect_fit() {
    let values = vec![100.0; 12];
    let series = monthly_series(&values);
    let confidence = residual_confidence(&series, &values);

    assert_eq!(confidence.score, 100.0);
    assert_eq!(confidence.level, ConfidenceLevel::High);
    assert_eq!(confidence.mae, Some(0.0));
}

#[test]
fn test_residual_known_error() {
    let actual = vec![100.0; 12];
    // Constant offset of 10 on every scoreable point
    let mut fitted = vec![90.0; 12];
    fitted[0] = 100.0;

    let series = monthly_series(&actual);
    let confidence = residual_confidence(&series, &fitted);

    assert_eq!(confidence.mae, Some(10.0));
    assert_eq!(confidence.score, 90.0);
    assert_eq!(confidence.level, ConfidenceLevel::High);
}

#[test]
fn test_residual_excludes_first_point() {
    let actual = vec![100.0; 12];
    // A huge miss on the first point must not affect the score
    let mut fitted = vec![100.0; 12];
    fitted[0] = 100_000.0;

    let series = monthly_series(&actual);
    let confidence = residual_confidence(&series, &fitted);

    assert_eq!(confidence.score, 100.0);
    assert_eq!(confidence.mae, Some(0.0));
}

#[test]
fn test_residual_zero_mean_series() {
    let values = vec![0.0; 12];
    let series = monthly_series(&values);
    let confidence = residual_confidence(&series, &values);

    // Relative error is pinned to 1.0 when the mean is zero
    assert_eq!(confidence.score, 0.0);
    assert_eq!(confidence.level, ConfidenceLevel::Low);
}

#[test]
fn test_residual_fails_soft() {
    let series = monthly_series(&[100.0; 12]);
    let mismatched = vec![100.0; 5];

    let confidence = residual_confidence(&series, &mismatched);

    assert_eq!(confidence, ConfidenceResult::neutral());
    assert_eq!(confidence.score, 50.0);
    assert_eq!(confidence.level, ConfidenceLevel::Medium);
    assert_eq!(confidence.mae, Some(0.0));
}
