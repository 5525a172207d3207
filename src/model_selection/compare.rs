//! Paired comparison of two cross-validation results.

use super::result::{summarize, EvaluationResult};
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};

/// Default number of standard errors for a decisive difference.
pub const DEFAULT_DECISIVE_SE: f64 = 2.0;

/// Which model has the higher expected log predictive density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preferred {
    /// The first argument
    First,
    /// The second argument
    Second,
    /// Identical totals
    Tie,
}

/// Outcome of [`compare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// elpd(first) − elpd(second)
    pub elpd_diff: f64,
    /// Standard error of the paired per-row differences
    pub se_diff: f64,
    /// Model with the higher elpd
    pub preferred: Preferred,
    /// |elpd_diff| is at least the threshold number of standard errors
    pub decisive: bool,
}

impl Comparison {
    /// elpd_diff / se_diff.
    #[must_use]
    pub fn z_score(&self) -> f64 {
        self.elpd_diff / self.se_diff
    }
}

/// Compares two results with the default threshold of
/// [`DEFAULT_DECISIVE_SE`] standard errors.
///
/// # Errors
///
/// See [`compare_with_threshold`].
pub fn compare(first: &EvaluationResult, second: &EvaluationResult) -> Result<Comparison> {
    compare_with_threshold(first, second, DEFAULT_DECISIVE_SE)
}

/// Compares two results through their paired per-row score differences.
///
/// `compare_with_threshold(b, a, t)` is the mirror image of
/// `compare_with_threshold(a, b, t)`: the difference changes sign, the
/// standard error and decisiveness do not.
///
/// # Errors
///
/// Returns [`EvalError::IncomparableResults`] if the results come from
/// different methods or score different rows, and
/// [`EvalError::InvalidHyperparameter`] for a negative or NaN threshold.
/// A result whose pointwise scores do not match its rows gives
/// [`EvalError::DimensionMismatch`].
///
/// # Examples
///
/// ```
/// use regeval::model_selection::{compare_with_threshold, EvaluationResult, Preferred};
///
/// let a: EvaluationResult = serde_json::from_str(
///     r#"{"method":"ExactLoo","rows":[0,1,2],"pointwise":[-1.0,-1.2,-0.9],
///         "elpd":-3.1,"se":0.26,"skipped":[],"pareto_k":null,"unstable":[],"p_loo":null}"#,
/// ).expect("valid JSON");
/// let mut b = a.clone();
/// b.pointwise = vec![-2.0, -2.1, -2.2];
/// b.elpd = -6.3;
///
/// let cmp = compare_with_threshold(&a, &b, 2.0).expect("same rows and method");
/// assert_eq!(cmp.preferred, Preferred::First);
/// assert!(cmp.decisive);
/// ```
pub fn compare_with_threshold(
    first: &EvaluationResult,
    second: &EvaluationResult,
    threshold_se: f64,
) -> Result<Comparison> {
    if !(threshold_se >= 0.0) {
        return Err(EvalError::invalid(
            "threshold_se",
            threshold_se,
            "a non-negative number of standard errors",
        ));
    }
    first.check_aligned()?;
    second.check_aligned()?;
    if first.method != second.method {
        return Err(EvalError::IncomparableResults {
            reason: format!(
                "methods differ: {:?} vs {:?}",
                first.method, second.method
            ),
        });
    }
    if first.rows != second.rows {
        return Err(EvalError::IncomparableResults {
            reason: format!(
                "scored rows differ ({} vs {} rows)",
                first.rows.len(),
                second.rows.len()
            ),
        });
    }

    let diffs: Vec<f64> = first
        .pointwise
        .iter()
        .zip(&second.pointwise)
        .map(|(a, b)| a - b)
        .collect();
    let (elpd_diff, se_diff) = summarize(&diffs);

    let preferred = if elpd_diff > 0.0 {
        Preferred::First
    } else if elpd_diff < 0.0 {
        Preferred::Second
    } else {
        Preferred::Tie
    };
    let decisive = elpd_diff != 0.0 && elpd_diff.abs() >= threshold_se * se_diff;

    Ok(Comparison {
        elpd_diff,
        se_diff,
        preferred,
        decisive,
    })
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
