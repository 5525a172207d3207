//! Confidence-interval coverage by repeated simulation.

use crate::error::{EvalError, Result};
use crate::stats::{mean, std_dev, students_t_quantile};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Empirical coverage rate per requested confidence level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Confidence levels, in the order requested
    pub levels: Vec<f64>,
    /// Fraction of repetitions whose interval covered the true value
    pub rates: Vec<f64>,
    /// Number of repetitions
    pub n_reps: usize,
}

impl CoverageReport {
    /// Coverage rate for `level`, if it was requested.
    #[must_use]
    pub fn rate(&self, level: f64) -> Option<f64> {
        self.levels
            .iter()
            .position(|&l| (l - level).abs() < 1e-12)
            .map(|i| self.rates[i])
    }

    /// (level, rate) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.levels.iter().copied().zip(self.rates.iter().copied())
    }
}

/// Simulates `n_reps` experiments and reports how often a t-interval covers
/// `true_value`.
///
/// Each repetition calls `generator(rng, n_draws)` for a fresh sample, forms
/// mean ± t₍₁₋₍₁₋level₎/₂, n_draws−1₎ · sd/√n_draws for every level and
/// records whether `true_value` lies inside. Student-t quantiles are used
/// because the Normal ones give intervals that are too narrow for small
/// samples.
///
/// # Errors
///
/// - [`EvalError::InsufficientDraws`] if `n_draws < 2`
/// - [`EvalError::InvalidHyperparameter`] if `n_reps == 0` or a level is
///   outside (0, 1)
/// - [`EvalError::DimensionMismatch`] if the generator returns a sample of
///   the wrong length
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_distr::{Distribution, Normal};
/// use regeval::diagnostics::coverage_simulation;
///
/// let normal = Normal::new(5.0, 2.0).expect("valid sd");
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let report = coverage_simulation(
///     5.0,
///     10,
///     500,
///     &[0.5, 0.95],
///     &mut rng,
///     |rng, n| normal.sample_iter(rng).take(n).collect(),
/// )
/// .expect("valid configuration");
/// assert!((report.rate(0.95).expect("requested") - 0.95).abs() < 0.05);
/// ```
pub fn coverage_simulation<R, G>(
    true_value: f64,
    n_draws: usize,
    n_reps: usize,
    levels: &[f64],
    rng: &mut R,
    mut generator: G,
) -> Result<CoverageReport>
where
    R: Rng + ?Sized,
    G: FnMut(&mut R, usize) -> Vec<f64>,
{
    if n_draws < 2 {
        return Err(EvalError::InsufficientDraws {
            needed: 2,
            got: n_draws,
        });
    }
    if n_reps == 0 {
        return Err(EvalError::invalid("n_reps", n_reps, "at least 1"));
    }
    if let Some(&bad) = levels.iter().find(|&&l| !(l > 0.0 && l < 1.0)) {
        return Err(EvalError::invalid(
            "confidence_level",
            bad,
            "a value in (0, 1)",
        ));
    }

    let df = (n_draws - 1) as f64;
    let multipliers = levels
        .iter()
        .map(|&l| students_t_quantile(1.0 - (1.0 - l) / 2.0, df))
        .collect::<Result<Vec<_>>>()?;
    let sqrt_n = (n_draws as f64).sqrt();
    let mut hits = vec![0usize; levels.len()];

    for rep in 0..n_reps {
        let sample = generator(rng, n_draws);
        if sample.len() != n_draws {
            return Err(EvalError::dims(
                format!("{n_draws} generated values"),
                format!("{} in repetition {rep}", sample.len()),
            ));
        }
        let center = mean(&sample);
        let se = std_dev(&sample) / sqrt_n;
        for (hit, t) in hits.iter_mut().zip(&multipliers) {
            if (true_value - center).abs() <= t * se {
                *hit += 1;
            }
        }
    }

    let rates: Vec<f64> = hits.iter().map(|&h| h as f64 / n_reps as f64).collect();
    debug!(n_draws, n_reps, ?rates, "coverage simulation finished");
    Ok(CoverageReport {
        levels: levels.to_vec(),
        rates,
        n_reps,
    })
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;
