pub(crate) use super::*;

#[test]
fn test_normal_log_density_standard() {
    // log φ(0) = -0.5 ln(2π)
    let v = normal_log_density(0.0, 0.0, 1.0);
    assert!((v + 0.918_938_533_204_672_8).abs() < 1e-12);

    // Scale and shift: N(3; 1, 2)
    let expected = -0.5 * 1.0 - 2.0_f64.ln() - 0.918_938_533_204_672_8;
    assert!((normal_log_density(3.0, 1.0, 2.0) - expected).abs() < 1e-12);
}

#[test]
fn test_normal_quantile_known_values() {
    let cases = [
        (0.5, 0.0),
        (0.975, 1.959_963_985),
        (0.025, -1.959_963_985),
        (0.841_344_746, 1.0),
        (0.001, -3.090_232_306),
    ];
    for (p, z) in cases {
        let got = normal_quantile(p).expect("p in (0, 1)");
        assert!((got - z).abs() < 1e-6, "p={p}: expected {z}, got {got}");
    }
}

#[test]
fn test_normal_quantile_rejects_bounds() {
    assert!(normal_quantile(0.0).is_err());
    assert!(normal_quantile(1.0).is_err());
    assert!(normal_quantile(f64::NAN).is_err());
}

#[test]
fn test_students_t_cdf_symmetry() {
    for df in [1.0, 3.0, 10.0, 65.0] {
        for t in [0.3, 1.0, 2.5] {
            let upper = students_t_cdf(t, df).expect("df > 0");
            let lower = students_t_cdf(-t, df).expect("df > 0");
            assert!((upper + lower - 1.0).abs() < 1e-12);
        }
        assert!((students_t_cdf(0.0, df).expect("df > 0") - 0.5).abs() < 1e-12);
    }
}

#[test]
fn test_students_t_cdf_cauchy() {
    // df = 1 is the Cauchy distribution: F(1) = 0.75
    let f = students_t_cdf(1.0, 1.0).expect("df > 0");
    assert!((f - 0.75).abs() < 1e-9);
}

#[test]
fn test_students_t_quantile_known_values() {
    let cases = [
        (0.975, 1.0, 12.706_204_736),
        (0.975, 4.0, 2.776_445_105),
        (0.975, 9.0, 2.262_157_163),
        (0.75, 4.0, 0.740_697_084),
        (0.995, 19.0, 2.860_934_606),
        (0.025, 9.0, -2.262_157_163),
    ];
    for (p, df, t) in cases {
        let got = students_t_quantile(p, df).expect("valid arguments");
        assert!(
            (got - t).abs() < 1e-6 * t.abs().max(1.0),
            "p={p}, df={df}: expected {t}, got {got}"
        );
    }
}

#[test]
fn test_students_t_quantile_wider_than_normal() {
    let z = normal_quantile(0.975).expect("valid");
    for df in [2.0, 5.0, 20.0] {
        let t = students_t_quantile(0.975, df).expect("valid");
        assert!(t > z, "t quantile with df={df} must exceed the normal quantile");
    }
    let t_large = students_t_quantile(0.975, 1e6).expect("valid");
    assert!((t_large - z).abs() < 1e-4);
}

#[test]
fn test_students_t_quantile_inverts_cdf() {
    for p in [0.01, 0.2, 0.5, 0.8, 0.99] {
        let t = students_t_quantile(p, 7.0).expect("valid");
        let back = students_t_cdf(t, 7.0).expect("valid");
        assert!((back - p).abs() < 1e-10);
    }
}

#[test]
fn test_students_t_invalid_df() {
    assert!(students_t_quantile(0.9, 0.0).is_err());
    assert!(students_t_cdf(1.0, -2.0).is_err());
}

#[test]
fn test_regularized_incomplete_beta_edges() {
    assert_eq!(regularized_incomplete_beta(2.0, 3.0, 0.0), 0.0);
    assert_eq!(regularized_incomplete_beta(2.0, 3.0, 1.0), 1.0);
    // I_x(1, 1) = x
    assert!((regularized_incomplete_beta(1.0, 1.0, 0.3) - 0.3).abs() < 1e-12);
    // I_x(a, b) = 1 - I_{1-x}(b, a)
    let lhs = regularized_incomplete_beta(2.5, 4.0, 0.35);
    let rhs = 1.0 - regularized_incomplete_beta(4.0, 2.5, 0.65);
    assert!((lhs - rhs).abs() < 1e-12);
}

#[test]
fn test_ln_gamma() {
    // Γ(5) = 24, Γ(0.5) = √π
    assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-9);
    assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-9);
}
