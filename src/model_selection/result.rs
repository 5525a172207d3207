//! Cross-validation results.

use crate::error::{EvalError, Result};
use crate::stats::std_dev;
use serde::{Deserialize, Serialize};

/// Which estimator produced an [`EvaluationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CvMethod {
    /// Exact leave-one-out, one refit per row
    ExactLoo,
    /// K-fold with `k` folds
    KFold {
        /// Number of folds
        k: usize,
    },
    /// Pareto-smoothed importance-sampling leave-one-out, single fit
    PsisLoo,
}

/// A unit whose refit failed and was skipped under [`RefitPolicy::Skip`].
///
/// [`RefitPolicy::Skip`]: super::RefitPolicy::Skip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefitFailure {
    /// Row index (leave-one-out) or fold index (k-fold)
    pub unit: usize,
    /// Rows that were held out and therefore left unscored
    pub rows: Vec<usize>,
    /// Collaborator-supplied reason
    pub reason: String,
}

/// Warning attached to an observation whose PSIS estimate is unreliable.
///
/// This is not an error: the estimate is still reported, but the shape
/// parameter of the fitted tail exceeded the stability threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnstableEstimate {
    /// Observation row
    pub row: usize,
    /// Estimated generalized-Pareto shape k̂
    pub pareto_k: f64,
}

/// Expected log predictive density estimate with per-row scores.
///
/// `rows` is sorted ascending and `pointwise[j]` is the log predictive
/// density of row `rows[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Estimator that produced the scores
    pub method: CvMethod,
    /// Scored rows, ascending
    pub rows: Vec<usize>,
    /// Per-row log predictive densities
    pub pointwise: Vec<f64>,
    /// Σ pointwise
    pub elpd: f64,
    /// sd(pointwise) · √n
    pub se: f64,
    /// Units skipped because their refit failed
    pub skipped: Vec<RefitFailure>,
    /// Per-row Pareto k̂ (PSIS only)
    pub pareto_k: Option<Vec<f64>>,
    /// Rows whose k̂ exceeded the threshold (PSIS only)
    pub unstable: Vec<UnstableEstimate>,
    /// Effective number of parameters, lppd − elpd (PSIS only)
    pub p_loo: Option<f64>,
}

impl EvaluationResult {
    /// Builds a result from (row, score) pairs in any order.
    pub(crate) fn from_scores(method: CvMethod, mut scores: Vec<(usize, f64)>) -> Self {
        scores.sort_by_key(|&(row, _)| row);
        let (rows, pointwise): (Vec<usize>, Vec<f64>) = scores.into_iter().unzip();
        let (elpd, se) = summarize(&pointwise);
        Self {
            method,
            rows,
            pointwise,
            elpd,
            se,
            skipped: Vec::new(),
            pareto_k: None,
            unstable: Vec::new(),
            p_loo: None,
        }
    }

    /// Number of scored rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// LOO information criterion, −2 · elpd.
    #[must_use]
    pub fn looic(&self) -> f64 {
        -2.0 * self.elpd
    }

    /// True if any observation carries an [`UnstableEstimate`].
    #[must_use]
    pub fn has_unstable(&self) -> bool {
        !self.unstable.is_empty()
    }

    /// Checks that `pointwise` and `pareto_k` hold one entry per scored row.
    pub(crate) fn check_aligned(&self) -> Result<()> {
        let n = self.rows.len();
        if self.pointwise.len() != n {
            return Err(EvalError::dims(
                format!("{n} pointwise scores"),
                format!("{} scores", self.pointwise.len()),
            ));
        }
        match &self.pareto_k {
            Some(ks) if ks.len() != n => Err(EvalError::dims(
                format!("{n} pareto k values"),
                format!("{} values", ks.len()),
            )),
            _ => Ok(()),
        }
    }

    /// Combines two results of the same method over disjoint rows.
    ///
    /// elpd adds up; se is recomputed from the merged pointwise scores.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::IncomparableResults`] if the methods differ or a
    /// row is scored in both, and [`EvalError::DimensionMismatch`] if either
    /// result's per-row vectors disagree in length.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        self.check_aligned()?;
        other.check_aligned()?;
        if self.method != other.method {
            return Err(EvalError::IncomparableResults {
                reason: format!("cannot merge {:?} with {:?}", self.method, other.method),
            });
        }
        if let Some(row) = self
            .rows
            .iter()
            .find(|&&r| other.rows.binary_search(&r).is_ok())
        {
            return Err(EvalError::IncomparableResults {
                reason: format!("row {row} is scored in both results"),
            });
        }

        let mut scored: Vec<(usize, f64, Option<f64>)> =
            Vec::with_capacity(self.n_rows() + other.n_rows());
        for part in [self, other] {
            for (j, (&row, &score)) in part.rows.iter().zip(&part.pointwise).enumerate() {
                let k = part.pareto_k.as_ref().map(|ks| ks[j]);
                scored.push((row, score, k));
            }
        }
        scored.sort_by_key(|&(row, _, _)| row);

        let rows: Vec<usize> = scored.iter().map(|s| s.0).collect();
        let pointwise: Vec<f64> = scored.iter().map(|s| s.1).collect();
        let pareto_k = match (&self.pareto_k, &other.pareto_k) {
            (Some(_), Some(_)) => Some(scored.iter().filter_map(|s| s.2).collect()),
            _ => None,
        };
        let (elpd, se) = summarize(&pointwise);

        let mut skipped = self.skipped.clone();
        skipped.extend(other.skipped.iter().cloned());
        let mut unstable = self.unstable.clone();
        unstable.extend(other.unstable.iter().copied());
        unstable.sort_by_key(|u| u.row);

        Ok(Self {
            method: self.method,
            rows,
            pointwise,
            elpd,
            se,
            skipped,
            pareto_k,
            unstable,
            p_loo: self.p_loo.zip(other.p_loo).map(|(a, b)| a + b),
        })
    }
}

/// Total and standard error of pointwise scores. The standard error is 0
/// when fewer than two rows are scored.
pub(crate) fn summarize(pointwise: &[f64]) -> (f64, f64) {
    let total = pointwise.iter().sum();
    let se = if pointwise.len() < 2 {
        0.0
    } else {
        std_dev(pointwise) * (pointwise.len() as f64).sqrt()
    };
    (total, se)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loo(scores: &[(usize, f64)]) -> EvaluationResult {
        EvaluationResult::from_scores(CvMethod::ExactLoo, scores.to_vec())
    }

    #[test]
    fn test_from_scores_sorts_rows() {
        let r = loo(&[(2, -1.0), (0, -2.0), (1, -3.0)]);
        assert_eq!(r.rows, vec![0, 1, 2]);
        assert_eq!(r.pointwise, vec![-2.0, -3.0, -1.0]);
        assert!((r.elpd + 6.0).abs() < 1e-12);
        // sd = 1, √3
        assert!((r.se - 3.0_f64.sqrt()).abs() < 1e-12);
        assert!((r.looic() - 12.0).abs() < 1e-12);
        assert!(!r.has_unstable());
    }

    #[test]
    fn test_single_row_has_zero_se() {
        let r = loo(&[(4, -1.5)]);
        assert_eq!(r.se, 0.0);
        assert_eq!(r.n_rows(), 1);
    }

    #[test]
    fn test_merge_disjoint() {
        let a = loo(&[(0, -1.0), (2, -2.0)]);
        let b = loo(&[(1, -3.0)]);
        let m = a.merge(&b).expect("disjoint rows");
        assert_eq!(m.rows, vec![0, 1, 2]);
        assert_eq!(m.pointwise, vec![-1.0, -3.0, -2.0]);
        assert!((m.elpd - (a.elpd + b.elpd)).abs() < 1e-12);
        assert_eq!(m.se, loo(&[(0, -1.0), (1, -3.0), (2, -2.0)]).se);
    }

    #[test]
    fn test_merge_rejects_overlap_and_mixed_methods() {
        let a = loo(&[(0, -1.0)]);
        let b = loo(&[(0, -2.0)]);
        assert!(matches!(a.merge(&b), Err(EvalError::IncomparableResults { .. })));

        let c = EvaluationResult::from_scores(CvMethod::KFold { k: 2 }, vec![(1, -1.0)]);
        assert!(matches!(a.merge(&c), Err(EvalError::IncomparableResults { .. })));
    }

    #[test]
    fn test_merge_keeps_pareto_k_alignment() {
        let mut a = EvaluationResult::from_scores(CvMethod::PsisLoo, vec![(0, -1.0), (3, -1.0)]);
        a.pareto_k = Some(vec![0.1, 0.9]);
        a.unstable = vec![UnstableEstimate {
            row: 3,
            pareto_k: 0.9,
        }];
        a.p_loo = Some(0.5);
        let mut b = EvaluationResult::from_scores(CvMethod::PsisLoo, vec![(1, -1.0)]);
        b.pareto_k = Some(vec![0.2]);
        b.p_loo = Some(0.25);

        let m = a.merge(&b).expect("disjoint rows");
        assert_eq!(m.pareto_k, Some(vec![0.1, 0.2, 0.9]));
        assert_eq!(m.unstable.len(), 1);
        assert_eq!(m.p_loo, Some(0.75));
    }

    #[test]
    fn test_merge_rejects_misaligned_pareto_k() {
        let mut a = EvaluationResult::from_scores(CvMethod::PsisLoo, vec![(0, -1.0), (2, -1.0)]);
        a.pareto_k = Some(vec![0.1]);
        let mut b = EvaluationResult::from_scores(CvMethod::PsisLoo, vec![(1, -1.0)]);
        b.pareto_k = Some(vec![0.2]);
        assert!(matches!(a.merge(&b), Err(EvalError::DimensionMismatch { .. })));
        assert!(matches!(b.merge(&a), Err(EvalError::DimensionMismatch { .. })));

        // Same shape loaded from JSON
        let loaded: EvaluationResult = serde_json::from_str(
            r#"{"method":"PsisLoo","rows":[3,4],"pointwise":[-1.0,-2.0],"elpd":-3.0,"se":0.7,
                "skipped":[],"pareto_k":[0.3],"unstable":[],"p_loo":0.1}"#,
        )
        .expect("valid JSON");
        assert!(loaded.merge(&b).is_err());
    }
}
