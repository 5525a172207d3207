//! Expected log predictive density by exact LOO, k-fold and PSIS-LOO.
//!
//! Refit-based estimators run as map-reduce: partition the rows into units,
//! score each unit independently (in parallel with the `parallel` feature),
//! then reduce the per-row scores. Every refit is seeded from the base seed
//! and its held-out rows only, so results do not depend on execution order
//! or worker count.

use super::kfold::KFold;
use super::psis::psis_smooth;
use super::result::{CvMethod, EvaluationResult, RefitFailure, UnstableEstimate};
use crate::data::Dataset;
use crate::error::{EvalError, Result};
use crate::stats::{log_mean_exp, log_sum_exp};
use crate::traits::{FittedModel, ModelFitter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

/// Default Pareto k̂ above which a PSIS estimate is flagged unstable.
pub const DEFAULT_PARETO_K_THRESHOLD: f64 = 0.7;

/// What to do when the fitting collaborator fails on one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefitPolicy {
    /// Fail the whole evaluation with [`EvalError::RefitFailed`]
    #[default]
    Abort,
    /// Record the failure in [`EvaluationResult::skipped`] and continue
    Skip,
}

/// Cross-validation driver.
///
/// # Example
///
/// ```
/// use regeval::prelude::*;
///
/// let y: Vec<f64> = (0..12).map(|i| 10.0 + f64::from(i % 4) * 0.5).collect();
/// let data = Dataset::from_outcome("y", y);
/// let fitter = BayesianLinearRegression::new(&[]).with_n_draws(400);
///
/// let cv = CrossValidator::new().with_seed(2024);
/// let loo = cv.exact_loo(&fitter, &data).expect("every refit succeeds");
/// let kfold = cv.kfold(&fitter, &data, &KFold::new(12)).expect("every refit succeeds");
///
/// // With one row per fold, k-fold is leave-one-out
/// assert!((loo.elpd - kfold.elpd).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValidator {
    seed: u64,
    refit_policy: RefitPolicy,
    pareto_k_threshold: f64,
    parallel: bool,
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self {
            seed: 0,
            refit_policy: RefitPolicy::Abort,
            pareto_k_threshold: DEFAULT_PARETO_K_THRESHOLD,
            parallel: true,
        }
    }
}

impl CrossValidator {
    /// Creates a validator with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base seed for fold assignment and refits.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the refit failure policy.
    #[must_use]
    pub fn with_refit_policy(mut self, policy: RefitPolicy) -> Self {
        self.refit_policy = policy;
        self
    }

    /// Sets the Pareto k̂ stability threshold.
    #[must_use]
    pub fn with_pareto_k_threshold(mut self, threshold: f64) -> Self {
        self.pareto_k_threshold = threshold;
        self
    }

    /// Enables or disables parallel unit scoring.
    ///
    /// Has no effect without the `parallel` feature. Results are identical
    /// either way.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Base seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Refit failure policy.
    #[must_use]
    pub fn refit_policy(&self) -> RefitPolicy {
        self.refit_policy
    }

    /// Pareto k̂ stability threshold.
    #[must_use]
    pub fn pareto_k_threshold(&self) -> f64 {
        self.pareto_k_threshold
    }

    /// Whether units are scored in parallel.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Exact leave-one-out: one refit per row.
    ///
    /// Row i is scored as log( (1/S) Σₛ Normal(yᵢ; μₛᵢ, σₛ) ) under the model
    /// fit without row i.
    ///
    /// # Errors
    ///
    /// - [`EvalError::InvalidHyperparameter`] for fewer than two rows
    /// - [`EvalError::RefitFailed`] for the lowest failing row under
    ///   [`RefitPolicy::Abort`], or when every refit fails
    /// - errors from slicing the data or computing the log-likelihood
    pub fn exact_loo<F: ModelFitter>(&self, fitter: &F, data: &Dataset) -> Result<EvaluationResult> {
        let n = data.n_rows();
        if n < 2 {
            return Err(EvalError::invalid("n_rows", n, "at least 2 rows"));
        }
        let _span = info_span!("exact_loo", n_rows = n, seed = self.seed).entered();
        let units: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        self.refit_units(fitter, data, CvMethod::ExactLoo, &units)
    }

    /// K-fold cross-validation.
    ///
    /// A `folds` splitter without a random state is shuffled with this
    /// validator's seed.
    ///
    /// # Errors
    ///
    /// As [`CrossValidator::exact_loo`], plus invalid fold counts from
    /// [`KFold::folds`]. Under [`RefitPolicy::Abort`] the failing unit is
    /// the fold index.
    pub fn kfold<F: ModelFitter>(
        &self,
        fitter: &F,
        data: &Dataset,
        folds: &KFold,
    ) -> Result<EvaluationResult> {
        let splitter = match folds.random_state() {
            Some(_) => folds.clone(),
            None => folds.clone().with_random_state(self.seed),
        };
        let units = splitter.folds(data.n_rows())?;
        let _span = info_span!(
            "kfold",
            k = splitter.n_splits(),
            n_rows = data.n_rows(),
            seed = self.seed
        )
        .entered();
        self.refit_units(
            fitter,
            data,
            CvMethod::KFold {
                k: splitter.n_splits(),
            },
            &units,
        )
    }

    /// PSIS-LOO: fits once on all rows, then approximates leave-one-out with
    /// Pareto-smoothed importance sampling.
    ///
    /// # Errors
    ///
    /// Propagates the full-data fit error and the errors of
    /// [`CrossValidator::psis_loo_model`].
    pub fn psis_loo<F: ModelFitter>(&self, fitter: &F, data: &Dataset) -> Result<EvaluationResult> {
        self.check_pareto_k_threshold()?;
        let model = fitter.fit(data, unit_seed(self.seed, &[]))?;
        self.psis_loo_model(&model, data)
    }

    /// PSIS-LOO on an already fitted model.
    ///
    /// Raw log ratios for row i are −log p(yᵢ | θₛ). Rows whose k̂ exceeds
    /// the threshold are reported in [`EvaluationResult::unstable`].
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidHyperparameter`] for a NaN or negative
    /// Pareto k̂ threshold, [`EvalError::InsufficientDraws`] for fewer than
    /// two draws and [`EvalError::DimensionMismatch`] if the log-likelihood
    /// has the wrong shape.
    pub fn psis_loo_model<M: FittedModel + ?Sized>(
        &self,
        model: &M,
        data: &Dataset,
    ) -> Result<EvaluationResult> {
        self.check_pareto_k_threshold()?;
        let n = data.n_rows();
        let _span = info_span!("psis_loo", n_rows = n).entered();
        let log_lik = model.log_likelihood(data)?;
        if log_lik.len() < 2 {
            return Err(EvalError::InsufficientDraws {
                needed: 2,
                got: log_lik.len(),
            });
        }
        check_log_lik_shape(&log_lik, n)?;

        let rows: Vec<usize> = (0..n).collect();
        let per_row = self.map_units(&rows, |&i| {
            let ll_i = column(&log_lik, i);
            let ratios: Vec<f64> = ll_i.iter().map(|v| -v).collect();
            let smoothed = psis_smooth(&ratios);
            let weighted: Vec<f64> = smoothed
                .log_weights
                .iter()
                .zip(&ll_i)
                .map(|(w, l)| w + l)
                .collect();
            (log_sum_exp(&weighted), log_mean_exp(&ll_i), smoothed.pareto_k)
        });

        let scores: Vec<(usize, f64)> = per_row.iter().map(|r| r.0).enumerate().collect();
        let lppd: f64 = per_row.iter().map(|r| r.1).sum();
        let pareto_k: Vec<f64> = per_row.iter().map(|r| r.2).collect();

        let unstable: Vec<UnstableEstimate> = pareto_k
            .iter()
            .enumerate()
            .filter(|&(_, &k)| !(k <= self.pareto_k_threshold))
            .map(|(row, &k)| UnstableEstimate { row, pareto_k: k })
            .collect();
        for u in &unstable {
            warn!(row = u.row, pareto_k = u.pareto_k, "unstable PSIS estimate");
        }

        let mut result = EvaluationResult::from_scores(CvMethod::PsisLoo, scores);
        result.p_loo = Some(lppd - result.elpd);
        result.pareto_k = Some(pareto_k);
        result.unstable = unstable;
        info!(
            elpd = result.elpd,
            se = result.se,
            unstable = result.unstable.len(),
            "psis-loo finished"
        );
        Ok(result)
    }

    // +∞ is allowed and disables the warning.
    fn check_pareto_k_threshold(&self) -> Result<()> {
        if self.pareto_k_threshold >= 0.0 {
            Ok(())
        } else {
            Err(EvalError::invalid(
                "pareto_k_threshold",
                self.pareto_k_threshold,
                "a non-negative number",
            ))
        }
    }

    fn refit_units<F: ModelFitter>(
        &self,
        fitter: &F,
        data: &Dataset,
        method: CvMethod,
        units: &[Vec<usize>],
    ) -> Result<EvaluationResult> {
        let indexed: Vec<(usize, &[usize])> = units
            .iter()
            .enumerate()
            .map(|(u, rows)| (u, rows.as_slice()))
            .collect();
        let outcomes = self.map_units(&indexed, |&(unit, held_out)| {
            self.score_unit(fitter, data, unit, held_out)
        });

        let mut scores = Vec::with_capacity(data.n_rows());
        let mut skipped: Vec<RefitFailure> = Vec::new();
        for outcome in outcomes {
            match outcome? {
                Ok(unit_scores) => scores.extend(unit_scores),
                Err(failure) => match self.refit_policy {
                    RefitPolicy::Abort => {
                        return Err(EvalError::RefitFailed {
                            unit: failure.unit,
                            reason: failure.reason,
                        })
                    }
                    RefitPolicy::Skip => {
                        warn!(
                            unit = failure.unit,
                            rows = ?failure.rows,
                            reason = %failure.reason,
                            "skipping failed refit"
                        );
                        skipped.push(failure);
                    }
                },
            }
        }

        if scores.is_empty() {
            let first = skipped.into_iter().next();
            return Err(EvalError::RefitFailed {
                unit: first.as_ref().map_or(0, |f| f.unit),
                reason: first.map_or_else(
                    || "no units to score".to_string(),
                    |f| format!("every refit failed, first: {}", f.reason),
                ),
            });
        }

        let mut result = EvaluationResult::from_scores(method, scores);
        result.skipped = skipped;
        info!(
            elpd = result.elpd,
            se = result.se,
            skipped = result.skipped.len(),
            "cross-validation finished"
        );
        Ok(result)
    }

    /// Refits without `held_out` and scores each held-out row.
    ///
    /// The outer `Result` carries errors that end the evaluation regardless
    /// of policy; the inner one a fit failure subject to [`RefitPolicy`].
    fn score_unit<F: ModelFitter>(
        &self,
        fitter: &F,
        data: &Dataset,
        unit: usize,
        held_out: &[usize],
    ) -> Result<std::result::Result<Vec<(usize, f64)>, RefitFailure>> {
        let seed = unit_seed(self.seed, held_out);
        let train = data.without(held_out)?;
        let test = data.subset(held_out)?;

        debug!(unit, rows = ?held_out, seed, "refit started");
        let model = match fitter.fit(&train, seed) {
            Ok(model) => model,
            Err(e) => {
                return Ok(Err(RefitFailure {
                    unit,
                    rows: held_out.to_vec(),
                    reason: e.to_string(),
                }))
            }
        };

        let log_lik = model.log_likelihood(&test)?;
        if log_lik.is_empty() {
            return Err(EvalError::InsufficientDraws { needed: 1, got: 0 });
        }
        check_log_lik_shape(&log_lik, held_out.len())?;

        let scores = held_out
            .iter()
            .enumerate()
            .map(|(j, &row)| (row, log_mean_exp(&column(&log_lik, j))))
            .collect();
        debug!(unit, "refit scored");
        Ok(Ok(scores))
    }

    /// Applies `f` to every item, in parallel when enabled. Output order
    /// always matches input order.
    fn map_units<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                use rayon::prelude::*;
                return items.par_iter().map(f).collect();
            }
        }
        items.iter().map(f).collect()
    }
}

/// Seed for the refit that holds out `rows`.
///
/// Depends only on the base seed and the set of held-out rows, so a
/// leave-one-out refit of row i and a single-row fold {i} share a seed.
pub(crate) fn unit_seed(base: u64, rows: &[usize]) -> u64 {
    let mut sorted = rows.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .fold(splitmix64(base), |acc, &row| splitmix64(acc ^ row as u64))
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn check_log_lik_shape(log_lik: &[Vec<f64>], n: usize) -> Result<()> {
    match log_lik.iter().position(|ll_s| ll_s.len() != n) {
        Some(s) => Err(EvalError::dims(
            format!("{n} log-likelihood values per draw"),
            format!("{} in draw {s}", log_lik[s].len()),
        )),
        None => Ok(()),
    }
}

/// Values of one row across draws.
fn column(log_lik: &[Vec<f64>], row: usize) -> Vec<f64> {
    log_lik.iter().map(|ll_s| ll_s[row]).collect()
}

#[cfg(test)]
#[path = "cross_validation_tests.rs"]
mod tests;
