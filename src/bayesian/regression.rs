//! Reference Bayesian linear regression.
//!
//! A conjugate Normal / scaled-inverse-χ² regression that samples posterior
//! draws directly, with no MCMC. It exists so that the evaluation routines
//! have a concrete, fast [`ModelFitter`] for tests and demos; real analyses
//! plug in their own engine.

use super::posterior::{PosteriorDraw, PosteriorDrawSet, INTERCEPT};
use crate::data::Dataset;
use crate::error::{EvalError, Result};
use crate::traits::{FittedModel, ModelFitter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{ChiSquared, Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Bayesian linear regression with a weak ridge prior.
///
/// # Model
///
/// ```text
/// y = Xβ + ε,  ε ~ N(0, σ²I)
/// β | σ² ~ N(0, σ²/λ · I)      # λ = prior_precision, weak by default
/// p(σ²) ∝ 1/σ²
/// ```
///
/// # Posterior sampling
///
/// ```text
/// Vβ = (XᵀX + λI)⁻¹,  β̂ = Vβ Xᵀy,  s² = ‖y − Xβ̂‖² / (n − p)
/// σ²ₛ = (n − p) s² / χ²(n − p)
/// βₛ  = β̂ + σₛ L⁻ᵀ z,   L Lᵀ = XᵀX + λI,  z ~ N(0, I)
/// ```
///
/// # Example
///
/// ```
/// use regeval::bayesian::BayesianLinearRegression;
/// use regeval::data::Dataset;
/// use regeval::traits::{FittedModel, ModelFitter};
///
/// let data = Dataset::new(
///     vec![
///         ("x".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
///         ("y".to_string(), vec![3.1, 4.9, 7.2, 8.8, 11.1, 13.0]),
///     ],
///     "y",
/// ).expect("valid columns");
///
/// let model = BayesianLinearRegression::new(&["x"])
///     .with_n_draws(1000)
///     .fit(&data, 7)
///     .expect("fit succeeds");
/// let slope = model.draws().param("x").expect("x is a predictor");
/// let mean_slope = slope.iter().sum::<f64>() / slope.len() as f64;
/// assert!((mean_slope - 2.0).abs() < 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianLinearRegression {
    predictors: Vec<String>,
    intercept: bool,
    prior_precision: f64,
    n_draws: usize,
}

impl BayesianLinearRegression {
    /// Creates a regression on the named predictors, with an intercept,
    /// a weak prior (λ = 1e-4) and 4000 posterior draws.
    #[must_use]
    pub fn new(predictors: &[&str]) -> Self {
        Self {
            predictors: predictors.iter().map(|p| (*p).to_string()).collect(),
            intercept: true,
            prior_precision: 1e-4,
            n_draws: 4000,
        }
    }

    /// Includes or drops the intercept column.
    #[must_use]
    pub fn with_intercept(mut self, intercept: bool) -> Self {
        self.intercept = intercept;
        self
    }

    /// Sets the prior precision λ on the coefficients (relative to σ²).
    #[must_use]
    pub fn with_prior_precision(mut self, prior_precision: f64) -> Self {
        self.prior_precision = prior_precision;
        self
    }

    /// Sets the number of posterior draws S.
    #[must_use]
    pub fn with_n_draws(mut self, n_draws: usize) -> Self {
        self.n_draws = n_draws;
        self
    }

    /// Predictor names, in design-matrix order (after any intercept).
    #[must_use]
    pub fn predictors(&self) -> &[String] {
        &self.predictors
    }

    /// Number of posterior draws produced per fit.
    #[must_use]
    pub fn n_draws(&self) -> usize {
        self.n_draws
    }

    fn coefficient_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.predictors.len() + 1);
        if self.intercept {
            names.push(INTERCEPT.to_string());
        }
        names.extend(self.predictors.iter().cloned());
        names
    }

    fn validate(&self) -> Result<()> {
        if !(self.prior_precision > 0.0 && self.prior_precision.is_finite()) {
            return Err(EvalError::invalid(
                "prior_precision",
                self.prior_precision,
                "a finite value > 0",
            ));
        }
        if self.n_draws == 0 {
            return Err(EvalError::InsufficientDraws { needed: 1, got: 0 });
        }
        if !self.intercept && self.predictors.is_empty() {
            return Err(EvalError::invalid(
                "predictors",
                "[]",
                "at least one predictor or an intercept",
            ));
        }
        Ok(())
    }
}

impl ModelFitter for BayesianLinearRegression {
    type Model = LinearPosterior;

    fn fit(&self, data: &Dataset, seed: u64) -> Result<LinearPosterior> {
        self.validate()?;

        let predictor_refs: Vec<&str> = self.predictors.iter().map(String::as_str).collect();
        let x = data.design_matrix(&predictor_refs, self.intercept)?;
        let y = data.outcome();
        let (n, p) = x.shape();

        if n <= p {
            return Err(EvalError::dims(
                format!("more than {p} rows for {p} coefficients"),
                format!("{n} rows"),
            ));
        }

        // Step 1: XᵀX + λI and Xᵀy
        let xt = x.transpose();
        let mut precision = xt.matmul(&x)?;
        for j in 0..p {
            precision.set(j, j, precision.get(j, j) + self.prior_precision);
        }
        let xty = xt.matvec(y)?;

        // Step 2: posterior mean β̂ through the Cholesky factor
        let chol = precision.cholesky()?;
        let beta_hat = chol.back_substitute_transpose(&chol.forward_substitute(&xty));

        // Step 3: residual scale s²
        let fitted = x.matvec(&beta_hat)?;
        let rss: f64 = y.iter().zip(&fitted).map(|(yi, fi)| (yi - fi).powi(2)).sum();
        let dof = (n - p) as f64;
        let s2 = rss / dof;
        if !(s2 > 0.0 && s2.is_finite()) {
            return Err(EvalError::SingularMatrix(format!(
                "residual variance {s2} leaves sigma undefined"
            )));
        }

        // Step 4: sample (σ², β) jointly
        let chi2 = ChiSquared::new(dof)
            .map_err(|e| EvalError::invalid("degrees of freedom", dof, e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut draws = Vec::with_capacity(self.n_draws);
        for _ in 0..self.n_draws {
            let sigma2 = dof * s2 / chi2.sample(&mut rng);
            let sigma = sigma2.sqrt();
            let z: Vec<f64> = (0..p).map(|_| StandardNormal.sample(&mut rng)).collect();
            let offset = chol.back_substitute_transpose(&z);
            let coefficients = beta_hat
                .iter()
                .zip(&offset)
                .map(|(b, o)| b + sigma * o)
                .collect();
            draws.push(PosteriorDraw {
                coefficients,
                sigma,
            });
        }

        Ok(LinearPosterior {
            predictors: self.predictors.clone(),
            intercept: self.intercept,
            draws: PosteriorDrawSet::new(self.coefficient_names(), draws)?,
        })
    }
}

/// Posterior draws from [`BayesianLinearRegression`], ready for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPosterior {
    predictors: Vec<String>,
    intercept: bool,
    draws: PosteriorDrawSet,
}

impl LinearPosterior {
    /// Posterior mean of each coefficient, in [`PosteriorDrawSet::names`] order.
    #[must_use]
    pub fn coefficient_means(&self) -> Vec<f64> {
        let s = self.draws.len() as f64;
        let mut means = vec![0.0; self.draws.n_coefficients()];
        for draw in &self.draws {
            for (m, c) in means.iter_mut().zip(&draw.coefficients) {
                *m += c / s;
            }
        }
        means
    }
}

impl FittedModel for LinearPosterior {
    fn draws(&self) -> &PosteriorDrawSet {
        &self.draws
    }

    fn predict(&self, data: &Dataset) -> Result<Vec<Vec<f64>>> {
        let predictor_refs: Vec<&str> = self.predictors.iter().map(String::as_str).collect();
        let x = data.design_matrix(&predictor_refs, self.intercept)?;
        self.draws.linear_predictors(&x)
    }
}

#[cfg(test)]
#[path = "regression_tests.rs"]
mod tests;
