//! Error types for regeval operations.
//!
//! Every fallible routine returns [`Result`]. Errors are reported per call;
//! a result value is either complete or the call fails before producing one.

use thiserror::Error;

/// Main error type for model-evaluation operations.
///
/// # Examples
///
/// ```
/// use regeval::error::EvalError;
///
/// let err = EvalError::DimensionMismatch {
///     expected: "66 rows".to_string(),
///     actual: "65 rows".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum EvalError {
    /// Input shapes are inconsistent for the operation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A predictive check was asked to run against zero replicated datasets.
    #[error("insufficient replicates: at least one replicated dataset is required")]
    InsufficientReplicates,

    /// Too few draws (posterior draws or sample draws) for the computation.
    #[error("insufficient draws: need at least {needed}, got {got}")]
    InsufficientDraws {
        /// Minimum number of draws required
        needed: usize,
        /// Number of draws supplied
        got: usize,
    },

    /// Invalid parameter value provided.
    #[error("invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Matrix is not positive definite and cannot be factored.
    #[error("singular matrix: {0}")]
    SingularMatrix(String),

    /// The fitting collaborator could not fit the sub-model for one unit
    /// (a held-out row or fold).
    #[error("refit failed for unit {unit}: {reason}")]
    RefitFailed {
        /// Row index (leave-one-out) or fold index (k-fold) of the failed refit
        unit: usize,
        /// Collaborator-supplied reason
        reason: String,
    },

    /// Two evaluation results cannot be compared.
    #[error("incomparable results: {reason}")]
    IncomparableResults {
        /// Why the comparison is meaningless
        reason: String,
    },

    /// A named column or parameter does not exist.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing item
        what: String,
    },
}

impl EvalError {
    /// Shorthand for a [`EvalError::DimensionMismatch`] built from displayable parts.
    pub(crate) fn dims(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        EvalError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Shorthand for a [`EvalError::InvalidHyperparameter`].
    pub(crate) fn invalid(
        param: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        EvalError::InvalidHyperparameter {
            param: param.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Returns the failed unit index if this is a refit failure.
    #[must_use]
    pub fn refit_unit(&self) -> Option<usize> {
        match self {
            EvalError::RefitFailed { unit, .. } => Some(*unit),
            _ => None,
        }
    }
}

/// Convenience type alias for regeval results.
pub type Result<T> = std::result::Result<T, EvalError>;
