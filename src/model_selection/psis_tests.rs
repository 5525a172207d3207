pub(crate) use super::*;
use crate::stats::normal_quantile;

fn quantile_grid(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| (i as f64 + 0.5) / n as f64)
}

#[test]
fn test_gpd_fit_recovers_shape() {
    for (k0, tol) in [(0.3, 0.03), (0.8, 0.03), (-0.2, 0.03)] {
        let x: Vec<f64> = quantile_grid(1000).map(|p| gpd_quantile(p, k0, 2.0)).collect();
        let (k, sigma) = gpd_fit(&x);
        assert!((k - k0).abs() < tol, "k0={k0}: fitted {k}");
        assert!((sigma - 2.0).abs() < 0.05, "k0={k0}: sigma {sigma}");
    }
}

#[test]
fn test_gpd_quantile_exponential_limit() {
    // k = 0 is the exponential distribution
    let q = gpd_quantile(0.5, 0.0, 1.0);
    assert!((q - 2.0_f64.ln()).abs() < 1e-12);
    assert!(gpd_quantile(0.5, 0.3, 0.0).is_nan());
    assert!(gpd_quantile(1.0, 0.3, 1.0).is_nan());
}

#[test]
fn test_light_tail_has_small_k() {
    let ratios: Vec<f64> = quantile_grid(4000)
        .map(|p| 0.3 * normal_quantile(p).expect("p in (0, 1)"))
        .collect();
    let smoothed = psis_smooth(&ratios);
    assert!(smoothed.pareto_k < 0.2, "k = {}", smoothed.pareto_k);
    let total: f64 = smoothed.log_weights.iter().map(|w| w.exp()).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_heavy_tail_has_large_k() {
    let ratios: Vec<f64> = quantile_grid(4000)
        .map(|p| (gpd_quantile(p, 1.0, 1.0) + 1.0).ln())
        .collect();
    let smoothed = psis_smooth(&ratios);
    assert!(smoothed.pareto_k > 0.7, "k = {}", smoothed.pareto_k);
}

#[test]
fn test_moderate_tail_shape() {
    let ratios: Vec<f64> = quantile_grid(4000)
        .map(|p| (gpd_quantile(p, 0.5, 1.0) + 1.0).ln())
        .collect();
    let smoothed = psis_smooth(&ratios);
    assert!((smoothed.pareto_k - 0.5).abs() < 0.1, "k = {}", smoothed.pareto_k);
}

#[test]
fn test_smoothing_preserves_order() {
    // Input is ascending, so weights must be non-decreasing
    let ratios: Vec<f64> = quantile_grid(1000)
        .map(|p| (gpd_quantile(p, 0.5, 1.0) + 1.0).ln())
        .collect();
    let smoothed = psis_smooth(&ratios);
    assert!(smoothed
        .log_weights
        .windows(2)
        .all(|w| w[0] <= w[1] + 1e-12));
    assert!(smoothed.log_weights.iter().all(|&w| w <= 0.0));
}

#[test]
fn test_short_tail_is_infinite_k() {
    // 10 draws leave a tail of 2
    let ratios: Vec<f64> = (0..10).map(f64::from).collect();
    let smoothed = psis_smooth(&ratios);
    assert_eq!(smoothed.pareto_k, f64::INFINITY);
    let total: f64 = smoothed.log_weights.iter().map(|w| w.exp()).sum();
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn test_constant_ratios_give_uniform_weights() {
    let smoothed = psis_smooth(&[2.5; 100]);
    let expected = -(100.0_f64).ln();
    assert!(smoothed
        .log_weights
        .iter()
        .all(|&w| (w - expected).abs() < 1e-12));
}

#[test]
fn test_empty_input() {
    let smoothed = psis_smooth(&[]);
    assert!(smoothed.log_weights.is_empty());
    assert_eq!(smoothed.pareto_k, f64::INFINITY);
}
