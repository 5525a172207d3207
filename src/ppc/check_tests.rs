pub(crate) use super::*;
use crate::primitives::Matrix;

#[test]
fn test_check_on_matrix_rows() {
    let y = [1.0, 5.0, 3.0];
    let grid = Matrix::from_rows(&[
        vec![2.0, 4.0, 6.0],
        vec![0.0, 1.0, 2.0],
        vec![3.0, 3.0, 3.0],
        vec![1.5, 9.0, 2.0],
    ])
    .expect("equal rows");
    let check = check_statistic(&y, grid.iter_rows(), stat_max).expect("4 replicates");
    assert_eq!(check.observed, 5.0);
    assert_eq!(check.replicated, vec![6.0, 2.0, 3.0, 9.0]);
    assert_eq!(check.n_replicates(), 4);
    assert!((check.p_value_upper() - 0.5).abs() < 1e-12);
    assert!((check.p_value_lower() - 0.5).abs() < 1e-12);
    assert!((check.observed_quantile() - 0.5).abs() < 1e-12);
}

#[test]
fn test_empty_replicates() {
    let y = [1.0, 2.0];
    let none: Vec<Vec<f64>> = Vec::new();
    assert!(matches!(
        check_statistic(&y, &none, stat_mean),
        Err(EvalError::InsufficientReplicates)
    ));
}

#[test]
fn test_replicate_length_mismatch() {
    let y = [1.0, 2.0];
    let reps = vec![vec![1.0, 2.0], vec![1.0]];
    assert!(matches!(
        check_statistic(&y, &reps, stat_mean),
        Err(EvalError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_extreme_observed_minimum() {
    // Observed minimum far below every replicate
    let y = [-44.0, 20.0, 30.0];
    let reps: Vec<Vec<f64>> = (0..50)
        .map(|s| vec![10.0 + f64::from(s) * 0.1, 20.0, 30.0])
        .collect();
    let check = check_statistic(&y, &reps, stat_min).expect("50 replicates");
    assert_eq!(check.p_value_lower(), 0.0);
    assert_eq!(check.p_value_upper(), 1.0);
    assert_eq!(check.p_value_two_sided(), 0.0);
    assert_eq!(check.observed_quantile(), 0.0);
}

#[test]
fn test_two_sided_capped_at_one() {
    let check = CheckResult {
        observed: 1.0,
        replicated: vec![1.0, 1.0, 1.0],
    };
    assert_eq!(check.p_value_upper(), 1.0);
    assert_eq!(check.p_value_lower(), 1.0);
    assert_eq!(check.p_value_two_sided(), 1.0);
}

#[test]
fn test_streamed_replicates_are_accepted() {
    let y = vec![0.0; 3];
    let stream = (0..4).map(|s| vec![f64::from(s); 3]);
    let check = check_statistic(&y, stream, stat_sd).expect("4 replicates");
    assert!(check.replicated.iter().all(|&t| t == 0.0));
}

#[test]
fn test_builtin_statistics() {
    let y = [3.0, 1.0, 4.0, 1.0, 5.0];
    assert_eq!(stat_min(&y), 1.0);
    assert_eq!(stat_max(&y), 5.0);
    assert!((stat_mean(&y) - 2.8).abs() < 1e-12);
    // var = (0.04 + 3.24 + 1.44 + 3.24 + 4.84) / 4 = 3.2
    assert!((stat_sd(&y) - 3.2_f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_switches() {
    // Differences: -, +, -, + => 3 switches
    assert_eq!(stat_switches(&[3.0, 1.0, 4.0, 1.0, 5.0]), 3.0);
    // Monotone series never switches
    assert_eq!(stat_switches(&[1.0, 2.0, 3.0, 4.0]), 0.0);
    // A flat step counts as a change of sign
    assert_eq!(stat_switches(&[1.0, 2.0, 2.0, 3.0]), 2.0);
    assert_eq!(stat_switches(&[1.0, 2.0]), 0.0);
}

#[test]
fn test_min_max_empty() {
    assert_eq!(stat_min(&[]), f64::INFINITY);
    assert_eq!(stat_max(&[]), f64::NEG_INFINITY);
}
