//! Posterior draws and the reference Bayesian regression.
//!
//! - [`PosteriorDrawSet`]: S draws of coefficients plus residual scale σ
//! - [`BayesianLinearRegression`]: conjugate regression that implements
//!   [`ModelFitter`](crate::traits::ModelFitter) by sampling draws directly
//!
//! # Example
//!
//! ```
//! use regeval::bayesian::{BayesianLinearRegression, INTERCEPT};
//! use regeval::data::Dataset;
//! use regeval::traits::{FittedModel, ModelFitter};
//!
//! let data = Dataset::from_outcome("y", vec![4.9, 5.2, 5.0, 4.7, 5.3, 5.1]);
//! let fit = BayesianLinearRegression::new(&[])
//!     .with_n_draws(200)
//!     .fit(&data, 1)
//!     .expect("intercept-only fit");
//! assert_eq!(fit.draws().names(), &[INTERCEPT.to_string()]);
//! ```

mod posterior;
mod regression;

pub use posterior::{PosteriorDraw, PosteriorDrawSet, INTERCEPT};
pub use regression::{BayesianLinearRegression, LinearPosterior};
