//! Residual, R² and interval-coverage diagnostics.
//!
//! # Example
//!
//! ```
//! use regeval::diagnostics::residuals;
//!
//! let r = residuals(&[3.0, 5.0], &[2.5, 5.5]).expect("equal lengths");
//! assert_eq!(r, vec![0.5, -0.5]);
//! ```

mod coverage;

pub use coverage::{coverage_simulation, CoverageReport};

use crate::data::Dataset;
use crate::error::{EvalError, Result};
use crate::stats::{mean, median, variance};
use crate::traits::FittedModel;
use serde::{Deserialize, Serialize};

/// Elementwise `observed[i] - predicted[i]`.
///
/// # Errors
///
/// Returns [`EvalError::DimensionMismatch`] if the lengths differ.
pub fn residuals(observed: &[f64], predicted: &[f64]) -> Result<Vec<f64>> {
    if observed.len() != predicted.len() {
        return Err(EvalError::dims(
            format!("{} predicted values", observed.len()),
            format!("{}", predicted.len()),
        ));
    }
    Ok(observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| o - p)
        .collect())
}

/// Posterior mean of the linear predictor for every row of `data`.
///
/// # Errors
///
/// Propagates [`FittedModel::predict`] errors, and returns
/// [`EvalError::InsufficientDraws`] for a model without draws.
pub fn fitted_values<M: FittedModel + ?Sized>(model: &M, data: &Dataset) -> Result<Vec<f64>> {
    let mu = model.predict(data)?;
    if mu.is_empty() {
        return Err(EvalError::InsufficientDraws { needed: 1, got: 0 });
    }
    let n = data.n_rows();
    let mut sums = vec![0.0; n];
    for mu_s in &mu {
        if mu_s.len() != n {
            return Err(EvalError::dims(
                format!("{n} predicted rows"),
                format!("{}", mu_s.len()),
            ));
        }
        for (acc, m) in sums.iter_mut().zip(mu_s) {
            *acc += m;
        }
    }
    let s = mu.len() as f64;
    Ok(sums.into_iter().map(|v| v / s).collect())
}

/// Observed outcome minus [`fitted_values`].
///
/// # Errors
///
/// See [`fitted_values`].
pub fn fitted_residuals<M: FittedModel + ?Sized>(model: &M, data: &Dataset) -> Result<Vec<f64>> {
    let fitted = fitted_values(model, data)?;
    residuals(data.outcome(), &fitted)
}

/// Per-draw Bayesian R².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesR2 {
    /// Var(μₛ) / (Var(μₛ) + σₛ²), one value per posterior draw
    pub draws: Vec<f64>,
}

impl BayesR2 {
    /// Posterior median R².
    #[must_use]
    pub fn median(&self) -> f64 {
        median(&self.draws)
    }

    /// Posterior mean R².
    #[must_use]
    pub fn mean(&self) -> f64 {
        mean(&self.draws)
    }
}

/// Bayesian R²: for each draw, the variance of the linear predictor across
/// rows divided by that variance plus σₛ².
///
/// Unlike the classical R² it cannot exceed 1.
///
/// # Errors
///
/// Returns [`EvalError::InsufficientDraws`] if `data` has fewer than two rows,
/// and propagates prediction errors.
pub fn bayes_r2<M: FittedModel + ?Sized>(model: &M, data: &Dataset) -> Result<BayesR2> {
    if data.n_rows() < 2 {
        return Err(EvalError::InsufficientDraws {
            needed: 2,
            got: data.n_rows(),
        });
    }
    let mu = model.predict(data)?;
    let draws = mu
        .iter()
        .zip(model.draws().iter())
        .map(|(mu_s, draw)| {
            let v = variance(mu_s);
            v / (v + draw.sigma * draw.sigma)
        })
        .collect();
    Ok(BayesR2 { draws })
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
