//! `Dataset` module: named predictor columns plus one designated outcome.
//!
//! A dataset is immutable once built; refits work on row subsets produced
//! by [`Dataset::subset`] and [`Dataset::without`].

use crate::error::{EvalError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Deserializer, Serialize};

/// An ordered collection of rows with named numeric columns, one of which
/// is the outcome.
///
/// # Examples
///
/// ```
/// use regeval::data::Dataset;
///
/// let columns = vec![
///     ("x".to_string(), vec![1.0, 2.0, 3.0]),
///     ("y".to_string(), vec![2.1, 3.9, 6.2]),
/// ];
/// let data = Dataset::new(columns, "y").expect("columns are consistent");
/// assert_eq!(data.n_rows(), 3);
/// assert_eq!(data.predictor_names(), vec!["x"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<(String, Vec<f64>)>,
    outcome: String,
    n_rows: usize,
}

// A stored `n_rows` is ignored; `new` recomputes it from the columns.
impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            columns: Vec<(String, Vec<f64>)>,
            outcome: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.columns, &raw.outcome).map_err(serde::de::Error::custom)
    }
}

impl Dataset {
    /// Creates a new `Dataset` from named columns and the outcome column name.
    ///
    /// # Errors
    ///
    /// Returns an error if columns have different lengths, a name is empty or
    /// duplicated, or the outcome column is missing.
    pub fn new(columns: Vec<(String, Vec<f64>)>, outcome: &str) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |(_, col)| col.len());

        for (name, col) in &columns {
            if name.is_empty() {
                return Err(EvalError::invalid(
                    "column name",
                    "\"\"",
                    "a non-empty name",
                ));
            }
            if col.len() != n_rows {
                return Err(EvalError::dims(
                    format!("{n_rows} rows in every column"),
                    format!("{} rows in column '{name}'", col.len()),
                ));
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        if let Some(dup) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(EvalError::invalid(
                "column name",
                dup[0],
                "unique column names",
            ));
        }

        if !columns.iter().any(|(n, _)| n == outcome) {
            return Err(EvalError::NotFound {
                what: format!("outcome column '{outcome}'"),
            });
        }

        Ok(Self {
            columns,
            outcome: outcome.to_string(),
            n_rows,
        })
    }

    /// Creates a dataset holding only an outcome column (intercept-only models).
    #[must_use]
    pub fn from_outcome(name: &str, values: Vec<f64>) -> Self {
        let n_rows = values.len();
        Self {
            columns: vec![(name.to_string(), values)],
            outcome: name.to_string(),
            n_rows,
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns true if the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Returns all column names in insertion order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns the names of all non-outcome columns.
    #[must_use]
    pub fn predictor_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|(n, _)| n.as_str())
            .filter(|n| *n != self.outcome)
            .collect()
    }

    /// Returns the outcome column name.
    #[must_use]
    pub fn outcome_name(&self) -> &str {
        &self.outcome
    }

    /// Returns a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::NotFound`] if the column doesn't exist.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .ok_or_else(|| EvalError::NotFound {
                what: format!("column '{name}'"),
            })
    }

    /// Returns the outcome column.
    #[must_use]
    pub fn outcome(&self) -> &[f64] {
        self.columns
            .iter()
            .find(|(n, _)| *n == self.outcome)
            .map_or(&[], |(_, v)| v.as_slice())
    }

    /// Returns one row as (column name, value) pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds.
    pub fn row(&self, idx: usize) -> Result<Vec<(&str, f64)>> {
        if idx >= self.n_rows {
            return Err(EvalError::dims(
                format!("row index < {}", self.n_rows),
                format!("row index {idx}"),
            ));
        }
        Ok(self
            .columns
            .iter()
            .map(|(n, col)| (n.as_str(), col[idx]))
            .collect())
    }

    /// Returns a new dataset containing the given rows, in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if any index is out of bounds.
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_rows) {
            return Err(EvalError::dims(
                format!("row index < {}", self.n_rows),
                format!("row index {bad}"),
            ));
        }
        let columns = self
            .columns
            .iter()
            .map(|(n, col)| (n.clone(), indices.iter().map(|&i| col[i]).collect()))
            .collect();
        Ok(Self {
            columns,
            outcome: self.outcome.clone(),
            n_rows: indices.len(),
        })
    }

    /// Returns a new dataset with the given rows removed, keeping the order
    /// of the remaining rows.
    ///
    /// # Errors
    ///
    /// Returns an error if any index is out of bounds.
    pub fn without(&self, held_out: &[usize]) -> Result<Self> {
        let mut keep = vec![true; self.n_rows];
        for &i in held_out {
            if i >= self.n_rows {
                return Err(EvalError::dims(
                    format!("row index < {}", self.n_rows),
                    format!("row index {i}"),
                ));
            }
            keep[i] = false;
        }
        let indices: Vec<usize> = (0..self.n_rows).filter(|&i| keep[i]).collect();
        self.subset(&indices)
    }

    /// Builds the n×p design matrix for the named predictors.
    ///
    /// With `intercept` set, a leading column of ones is added. An empty
    /// predictor list with `intercept` gives the intercept-only design.
    ///
    /// # Errors
    ///
    /// Returns an error if a predictor is missing or is the outcome column.
    pub fn design_matrix(&self, predictors: &[&str], intercept: bool) -> Result<Matrix<f64>> {
        let mut cols: Vec<&[f64]> = Vec::with_capacity(predictors.len());
        for &name in predictors {
            if name == self.outcome {
                return Err(EvalError::invalid(
                    "predictor",
                    name,
                    "a column other than the outcome",
                ));
            }
            cols.push(self.column(name)?);
        }

        let p = cols.len() + usize::from(intercept);
        let mut data = Vec::with_capacity(self.n_rows * p);
        for i in 0..self.n_rows {
            if intercept {
                data.push(1.0);
            }
            data.extend(cols.iter().map(|c| c[i]));
        }
        Matrix::from_vec(self.n_rows, p, data)
    }
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
