//! Regeval: model evaluation for Bayesian linear regression in pure Rust.
//!
//! Regeval takes a fitted regression (anything implementing
//! [`FittedModel`]) and answers how well it fits and how well it predicts:
//! posterior predictive checks, residual and coverage diagnostics, and
//! cross-validated expected log predictive density.
//!
//! # Quick Start
//!
//! ```
//! use rand::SeedableRng;
//! use regeval::prelude::*;
//! use regeval::ppc::stat_min;
//!
//! // Speed-of-light style measurements with one wild value
//! let y = vec![
//!     28.0, 26.0, 33.0, 24.0, 34.0, -44.0, 27.0, 16.0, 40.0, -2.0,
//!     29.0, 22.0, 24.0, 21.0, 25.0, 30.0, 23.0, 29.0, 31.0, 19.0,
//! ];
//! let data = Dataset::from_outcome("y", y.clone());
//!
//! let model = BayesianLinearRegression::new(&[])
//!     .with_n_draws(1000)
//!     .fit(&data, 42)
//!     .expect("intercept-only fit succeeds");
//!
//! let design = Matrix::ones(y.len(), 1);
//! let ppc = PosteriorPredictive::new(model.draws(), &design, y.len()).expect("shapes agree");
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let check = check_statistic(&y, ppc.replicates(&mut rng), stat_min).expect("1000 replicates");
//! assert!(check.p_value_lower() < 0.05);
//!
//! let loo = CrossValidator::new()
//!     .psis_loo(&BayesianLinearRegression::new(&[]), &data)
//!     .expect("single fit succeeds");
//! assert_eq!(loo.n_rows(), 20);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Row-major `Matrix` with Cholesky solves
//! - [`data`]: `Dataset` of named columns with a designated outcome
//! - [`stats`]: Descriptive statistics, Normal and Student-t distributions
//! - [`bayesian`]: Posterior draws and a conjugate reference fitter
//! - [`ppc`]: Posterior predictive simulation and check statistics
//! - [`diagnostics`]: Residuals, fitted values, Bayesian R², interval coverage
//! - [`model_selection`]: K-fold, exact LOO, PSIS-LOO and model comparison

pub mod bayesian;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod model_selection;
pub mod ppc;
pub mod prelude;
pub mod primitives;
pub mod stats;
pub mod traits;

pub use error::{EvalError, Result};
pub use primitives::Matrix;
pub use traits::{FittedModel, ModelFitter};
