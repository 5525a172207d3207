//! Predictive-check statistics.
//!
//! A test statistic T is applied to the observed outcome and to every
//! replicated dataset; the check compares T(y) with the distribution of
//! T(yʳᵉᵖ).

use crate::error::{EvalError, Result};
use crate::stats;
use serde::{Deserialize, Serialize};

/// Observed statistic alongside its replicated distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// T(y) on the observed outcome
    pub observed: f64,
    /// T(yʳᵉᵖₛ), one value per replicate, in replicate order
    pub replicated: Vec<f64>,
}

impl CheckResult {
    /// Fraction of replicates with T(yʳᵉᵖ) ≥ T(y).
    #[must_use]
    pub fn p_value_upper(&self) -> f64 {
        self.fraction(|t| t >= self.observed)
    }

    /// Fraction of replicates with T(yʳᵉᵖ) ≤ T(y).
    #[must_use]
    pub fn p_value_lower(&self) -> f64 {
        self.fraction(|t| t <= self.observed)
    }

    /// Twice the smaller tail, capped at 1.
    #[must_use]
    pub fn p_value_two_sided(&self) -> f64 {
        (2.0 * self.p_value_upper().min(self.p_value_lower())).min(1.0)
    }

    /// Fraction of replicates strictly below T(y).
    #[must_use]
    pub fn observed_quantile(&self) -> f64 {
        self.fraction(|t| t < self.observed)
    }

    /// Number of replicated statistics.
    #[must_use]
    pub fn n_replicates(&self) -> usize {
        self.replicated.len()
    }

    fn fraction(&self, pred: impl Fn(f64) -> bool) -> f64 {
        if self.replicated.is_empty() {
            return f64::NAN;
        }
        let hits = self.replicated.iter().filter(|&&t| pred(t)).count();
        hits as f64 / self.replicated.len() as f64
    }
}

/// Applies `statistic` to the observed data and to every replicate.
///
/// `replicates` may be rows of a replication matrix, a streamed iterator of
/// vectors, or anything else yielding slices.
///
/// # Errors
///
/// Returns [`EvalError::InsufficientReplicates`] if no replicate is given and
/// [`EvalError::DimensionMismatch`] if a replicate's length differs from the
/// observed data.
///
/// # Examples
///
/// ```
/// use regeval::ppc::{check_statistic, stat_min};
///
/// let y = [3.0, 1.0, 2.0];
/// let reps = vec![vec![2.0, 2.5, 3.0], vec![0.5, 1.0, 4.0]];
/// let check = check_statistic(&y, &reps, stat_min).expect("two replicates");
/// assert_eq!(check.observed, 1.0);
/// assert_eq!(check.replicated, vec![2.0, 0.5]);
/// assert_eq!(check.p_value_lower(), 0.5);
/// ```
pub fn check_statistic<I, F>(observed: &[f64], replicates: I, statistic: F) -> Result<CheckResult>
where
    I: IntoIterator,
    I::Item: AsRef<[f64]>,
    F: Fn(&[f64]) -> f64,
{
    let mut replicated = Vec::new();
    for (s, rep) in replicates.into_iter().enumerate() {
        let rep = rep.as_ref();
        if rep.len() != observed.len() {
            return Err(EvalError::dims(
                format!("{} values per replicate", observed.len()),
                format!("{} in replicate {s}", rep.len()),
            ));
        }
        replicated.push(statistic(rep));
    }
    if replicated.is_empty() {
        return Err(EvalError::InsufficientReplicates);
    }
    Ok(CheckResult {
        observed: statistic(observed),
        replicated,
    })
}

/// Smallest value; `+∞` for empty input.
#[must_use]
pub fn stat_min(y: &[f64]) -> f64 {
    y.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Largest value; `-∞` for empty input.
#[must_use]
pub fn stat_max(y: &[f64]) -> f64 {
    y.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Arithmetic mean.
#[must_use]
pub fn stat_mean(y: &[f64]) -> f64 {
    stats::mean(y)
}

/// Sample standard deviation.
#[must_use]
pub fn stat_sd(y: &[f64]) -> f64 {
    stats::std_dev(y)
}

/// Number of direction changes in a series: positions where the sign of
/// `y[i] - y[i-1]` differs from the sign of `y[i-1] - y[i-2]`.
///
/// Useful for time series, where independent replicates switch direction far
/// more often than autocorrelated data.
#[must_use]
pub fn stat_switches(y: &[f64]) -> f64 {
    fn sign(d: f64) -> i8 {
        if d > 0.0 {
            1
        } else if d < 0.0 {
            -1
        } else {
            0
        }
    }
    let switches = y
        .windows(3)
        .filter(|w| sign(w[2] - w[1]) != sign(w[1] - w[0]))
        .count();
    switches as f64
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
