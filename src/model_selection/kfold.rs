//! K-fold partitioning of row indices.

use crate::error::{EvalError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Default number of folds.
pub const DEFAULT_N_SPLITS: usize = 10;

/// K-Fold cross-validator.
///
/// Splits rows into K folds. Each fold is used once as the held-out set
/// while the remaining K-1 folds form the training set. Fold sizes differ by
/// at most one row: the first `n % k` folds get the extra row.
///
/// Without a random state the folds are consecutive blocks; with one, the
/// rows are assigned by a single seeded permutation.
///
/// # Example
///
/// ```rust
/// use regeval::model_selection::KFold;
///
/// let kfold = KFold::new(5).with_random_state(42);
///
/// for (train_idx, test_idx) in kfold.split(10).expect("5 folds over 10 rows") {
///     assert_eq!(train_idx.len() + test_idx.len(), 10);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KFold {
    n_splits: usize,
    random_state: Option<u64>,
}

impl Default for KFold {
    fn default() -> Self {
        Self::new(DEFAULT_N_SPLITS)
    }
}

impl KFold {
    /// Create a new K-Fold cross-validator.
    ///
    /// # Arguments
    ///
    /// * `n_splits` - Number of folds. Must be at least 2.
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            random_state: None,
        }
    }

    /// Set random state for reproducible shuffling.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Number of folds.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Seed of the row permutation, if shuffling.
    #[must_use]
    pub fn random_state(&self) -> Option<u64> {
        self.random_state
    }

    /// Held-out row sets, one per fold.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidHyperparameter`] unless
    /// `2 <= n_splits <= n_samples`.
    pub fn folds(&self, n_samples: usize) -> Result<Vec<Vec<usize>>> {
        if self.n_splits < 2 {
            return Err(EvalError::invalid("n_splits", self.n_splits, "at least 2"));
        }
        if self.n_splits > n_samples {
            return Err(EvalError::invalid(
                "n_splits",
                self.n_splits,
                format!("at most the number of rows ({n_samples})"),
            ));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if let Some(seed) = self.random_state {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            indices.shuffle(&mut rng);
        }

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            // Distribute remainder across first folds
            let current_fold_size = if i < remainder {
                fold_size + 1
            } else {
                fold_size
            };
            let end = start + current_fold_size;
            folds.push(indices[start..end].to_vec());
            start = end;
        }
        Ok(folds)
    }

    /// Generate train/test indices for each fold.
    ///
    /// Returns a vector of (train_indices, test_indices) tuples.
    ///
    /// # Errors
    ///
    /// See [`KFold::folds`].
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        let folds = self.folds(n_samples)?;
        let mut fold_of = vec![0usize; n_samples];
        for (f, fold) in folds.iter().enumerate() {
            for &i in fold {
                fold_of[i] = f;
            }
        }
        Ok(folds
            .into_iter()
            .enumerate()
            .map(|(f, test)| {
                let train = (0..n_samples).filter(|&i| fold_of[i] != f).collect();
                (train, test)
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "kfold_tests.rs"]
mod tests;
