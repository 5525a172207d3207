//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use regeval::prelude::*;
//! ```

pub use crate::bayesian::{BayesianLinearRegression, PosteriorDrawSet};
pub use crate::data::Dataset;
pub use crate::diagnostics::{coverage_simulation, fitted_values, residuals};
pub use crate::error::EvalError;
pub use crate::model_selection::{compare, CrossValidator, EvaluationResult, KFold, RefitPolicy};
pub use crate::ppc::{check_statistic, PosteriorPredictive};
pub use crate::primitives::Matrix;
pub use crate::traits::{FittedModel, ModelFitter};
