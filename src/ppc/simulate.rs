//! Posterior predictive simulation.
//!
//! For draw s the simulator computes μₛ = Xβₛ and samples n independent
//! values yʳᵉᵖₛᵢ ~ Normal(μₛᵢ, σₛ). Draws are visited in order 0..S and rows
//! in order 0..n, one standard-normal variate per value, so the streaming,
//! matrix and tidy shapes consume the random source identically.

use crate::bayesian::PosteriorDrawSet;
use crate::error::{EvalError, Result};
use crate::primitives::Matrix;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// One replicated outcome vector of length n, drawn for a single posterior draw.
pub type ReplicatedDataset = Vec<f64>;

/// One value of a replication set in long ("tidy") form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TidyReplicate {
    /// Posterior draw index s
    pub draw: usize,
    /// Observation row index i
    pub row: usize,
    /// Simulated outcome
    pub value: f64,
}

/// Validated pairing of posterior draws with a design matrix.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use regeval::bayesian::PosteriorDrawSet;
/// use regeval::ppc::PosteriorPredictive;
/// use regeval::primitives::Matrix;
///
/// let draws = PosteriorDrawSet::intercept_only(&[26.2, 26.0, 26.5], &[10.7, 11.1, 10.9])
///     .expect("valid draws");
/// let design = Matrix::ones(66, 1);
/// let ppc = PosteriorPredictive::new(&draws, &design, 66).expect("shapes agree");
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
/// let yrep = ppc.simulate_matrix(&mut rng);
/// assert_eq!(yrep.shape(), (3, 66));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PosteriorPredictive<'a> {
    draws: &'a PosteriorDrawSet,
    design: &'a Matrix<f64>,
}

impl<'a> PosteriorPredictive<'a> {
    /// Pairs draws with a design matrix that must have `n` rows.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::DimensionMismatch`] if `design` does not have `n`
    /// rows or its column count differs from the coefficients per draw, and
    /// [`EvalError::InsufficientDraws`] if there are no draws.
    pub fn new(draws: &'a PosteriorDrawSet, design: &'a Matrix<f64>, n: usize) -> Result<Self> {
        if design.n_rows() != n {
            return Err(EvalError::dims(
                format!("{n} design rows"),
                format!("{} rows", design.n_rows()),
            ));
        }
        if design.n_cols() != draws.n_coefficients() {
            return Err(EvalError::dims(
                format!("{} coefficients per draw", design.n_cols()),
                format!("{}", draws.n_coefficients()),
            ));
        }
        if draws.is_empty() {
            return Err(EvalError::InsufficientDraws { needed: 1, got: 0 });
        }
        Ok(Self { draws, design })
    }

    /// Number of rows n in each replicate.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.design.n_rows()
    }

    /// Number of posterior draws S.
    #[must_use]
    pub fn n_draws(&self) -> usize {
        self.draws.len()
    }

    /// Simulates the replicate for draw `s`, calling `emit(row, value)` per row.
    fn replicate_with<R, F>(&self, s: usize, rng: &mut R, mut emit: F)
    where
        R: Rng + ?Sized,
        F: FnMut(usize, f64),
    {
        let Some(draw) = self.draws.get(s) else {
            return;
        };
        for i in 0..self.design.n_rows() {
            let mu: f64 = self
                .design
                .row(i)
                .iter()
                .zip(&draw.coefficients)
                .map(|(x, b)| x * b)
                .sum();
            let z: f64 = StandardNormal.sample(rng);
            emit(i, mu + draw.sigma * z);
        }
    }

    /// Simulates one replicated dataset for draw `s`.
    ///
    /// Returns an empty vector if `s` is out of range.
    pub fn replicate<R: Rng + ?Sized>(&self, s: usize, rng: &mut R) -> ReplicatedDataset {
        let mut out = Vec::with_capacity(self.n_rows());
        self.replicate_with(s, rng, |_, v| out.push(v));
        out
    }

    /// Streams replicated datasets one n-vector at a time, in draw order.
    pub fn replicates<'r, R: Rng + ?Sized>(&'r self, rng: &'r mut R) -> Replicates<'r, 'a, R> {
        Replicates {
            sim: self,
            rng,
            next: 0,
        }
    }

    /// Matrix mode: an S×n grid, row s holding the replicate for draw s.
    pub fn simulate_matrix<R: Rng + ?Sized>(&self, rng: &mut R) -> Matrix<f64> {
        let (s_total, n) = (self.n_draws(), self.n_rows());
        let mut data = Vec::with_capacity(s_total * n);
        for s in 0..s_total {
            self.replicate_with(s, rng, |_, v| data.push(v));
        }
        Matrix::from_raw(s_total, n, data)
    }

    /// Tidy mode: one flat sequence of (draw, row, value) triples.
    pub fn simulate_tidy<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<TidyReplicate> {
        let mut out = Vec::with_capacity(self.n_draws() * self.n_rows());
        for s in 0..self.n_draws() {
            self.replicate_with(s, rng, |row, value| {
                out.push(TidyReplicate {
                    draw: s,
                    row,
                    value,
                });
            });
        }
        out
    }
}

/// Iterator over replicated datasets, see [`PosteriorPredictive::replicates`].
pub struct Replicates<'r, 'a, R: Rng + ?Sized> {
    sim: &'r PosteriorPredictive<'a>,
    rng: &'r mut R,
    next: usize,
}

impl<R: Rng + ?Sized> Iterator for Replicates<'_, '_, R> {
    type Item = ReplicatedDataset;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.sim.n_draws() {
            return None;
        }
        let s = self.next;
        self.next += 1;
        Some(self.sim.replicate(s, self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.sim.n_draws() - self.next;
        (left, Some(left))
    }
}

impl<R: Rng + ?Sized> ExactSizeIterator for Replicates<'_, '_, R> {}

/// Matrix-mode simulation: S×n replicated outcomes.
///
/// # Errors
///
/// See [`PosteriorPredictive::new`].
pub fn simulate<R: Rng + ?Sized>(
    draws: &PosteriorDrawSet,
    design: &Matrix<f64>,
    n: usize,
    rng: &mut R,
) -> Result<Matrix<f64>> {
    Ok(PosteriorPredictive::new(draws, design, n)?.simulate_matrix(rng))
}

/// Tidy-mode simulation: S·n (draw, row, value) triples.
///
/// # Errors
///
/// See [`PosteriorPredictive::new`].
pub fn simulate_tidy<R: Rng + ?Sized>(
    draws: &PosteriorDrawSet,
    design: &Matrix<f64>,
    n: usize,
    rng: &mut R,
) -> Result<Vec<TidyReplicate>> {
    Ok(PosteriorPredictive::new(draws, design, n)?.simulate_tidy(rng))
}

#[cfg(test)]
#[path = "simulate_tests.rs"]
mod tests;
