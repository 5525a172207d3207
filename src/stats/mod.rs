//! Descriptive statistics and distribution helpers.
//!
//! - Sample mean, variance and standard deviation (n − 1 denominator)
//! - Median via sorting
//! - Numerically stable `log_sum_exp` / `log_mean_exp`
//! - Normal and Student-t distribution functions ([`distributions`])
//!
//! # Examples
//!
//! ```
//! use regeval::stats::{mean, std_dev, log_mean_exp};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0];
//! assert_eq!(mean(&data), 3.0);
//! assert!((std_dev(&data) - 1.581_138_83).abs() < 1e-8);
//! assert!((log_mean_exp(&[0.0, 0.0]) - 0.0).abs() < 1e-12);
//! ```

pub mod distributions;

pub use distributions::{
    normal_log_density, normal_quantile, regularized_incomplete_beta, students_t_cdf,
    students_t_quantile,
};

/// Arithmetic mean. Returns NaN for an empty slice.
#[must_use]
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample variance with n − 1 denominator. Returns NaN for fewer than two values.
#[must_use]
pub fn variance(xs: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(xs);
    xs.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation with n − 1 denominator.
#[must_use]
pub fn std_dev(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

/// Median. Returns NaN for an empty slice.
#[must_use]
pub fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}

/// log(Σ exp(xᵢ)) computed without overflow.
///
/// Returns negative infinity for an empty slice or when every term is −∞.
#[must_use]
pub fn log_sum_exp(xs: &[f64]) -> f64 {
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    max + xs.iter().map(|&x| (x - max).exp()).sum::<f64>().ln()
}

/// log((1/n) Σ exp(xᵢ)).
#[must_use]
pub fn log_mean_exp(xs: &[f64]) -> f64 {
    log_sum_exp(xs) - (xs.len() as f64).ln()
}
