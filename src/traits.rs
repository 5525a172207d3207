//! Core traits for the model-fitting collaborator.
//!
//! Fitting regressions is not this crate's job: callers plug their engine
//! in through [`ModelFitter`] and hand back a [`FittedModel`]. The
//! evaluation routines only ever see these two traits.

use crate::bayesian::PosteriorDrawSet;
use crate::data::Dataset;
use crate::error::{EvalError, Result};
use crate::stats::normal_log_density;

/// A fitted Bayesian regression, immutable once fit.
///
/// # Examples
///
/// ```
/// use regeval::prelude::*;
///
/// let data = Dataset::from_outcome("y", vec![9.8, 10.1, 10.4, 9.6, 10.0, 10.2]);
/// let model = BayesianLinearRegression::new(&[])
///     .with_n_draws(500)
///     .fit(&data, 42)
///     .expect("intercept-only fit succeeds");
///
/// assert_eq!(model.draws().len(), 500);
/// let mu = model.predict(&data).expect("same columns as the fit data");
/// assert_eq!(mu.len(), 500);
/// assert_eq!(mu[0].len(), 6);
/// ```
pub trait FittedModel: Send + Sync {
    /// Posterior draws of the coefficients and residual scale.
    fn draws(&self) -> &PosteriorDrawSet;

    /// Per-draw linear predictor for every row of `data`: S vectors of length n.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` lacks a predictor the model was fit with.
    fn predict(&self, data: &Dataset) -> Result<Vec<Vec<f64>>>;

    /// Pointwise log-likelihood: S vectors of length n holding
    /// log Normal(yᵢ; μₛᵢ, σₛ).
    ///
    /// # Errors
    ///
    /// Propagates [`FittedModel::predict`] errors.
    fn log_likelihood(&self, data: &Dataset) -> Result<Vec<Vec<f64>>> {
        let mu = self.predict(data)?;
        let y = data.outcome();
        let draws = self.draws();
        if mu.len() != draws.len() {
            return Err(EvalError::dims(
                format!("{} draws from predict", draws.len()),
                format!("{} draws", mu.len()),
            ));
        }
        mu.iter()
            .zip(draws.iter())
            .map(|(mu_s, draw)| {
                if mu_s.len() != y.len() {
                    return Err(EvalError::dims(
                        format!("{} predicted rows", y.len()),
                        format!("{} rows", mu_s.len()),
                    ));
                }
                Ok(mu_s
                    .iter()
                    .zip(y)
                    .map(|(&m, &yi)| normal_log_density(yi, m, draw.sigma))
                    .collect())
            })
            .collect()
    }
}

/// The model-fitting collaborator: `fit(dataset) -> FittedModel`.
///
/// The formula and prior live in the implementor's own configuration.
/// `seed` drives any internal randomness (posterior sampling) so that every
/// refit is reproducible regardless of execution order.
pub trait ModelFitter: Sync {
    /// The fitted model type.
    type Model: FittedModel;

    /// Fits the model to `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (too few rows, singular design,
    /// sampler failure). Cross-validation surfaces these as
    /// [`EvalError::RefitFailed`].
    fn fit(&self, data: &Dataset, seed: u64) -> Result<Self::Model>;
}
