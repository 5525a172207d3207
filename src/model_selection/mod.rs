//! Model selection by expected log predictive density.
//!
//! This module provides:
//! - K-fold partitioning ([`KFold`])
//! - Exact leave-one-out, k-fold and PSIS leave-one-out ([`CrossValidator`])
//! - Paired comparison of two models ([`compare`])
//!
//! # Example
//!
//! ```
//! use regeval::prelude::*;
//! use regeval::model_selection::{compare, Preferred};
//!
//! let x: Vec<f64> = (0..30).map(f64::from).collect();
//! let y: Vec<f64> = x.iter().map(|&xi| 3.0 + 0.8 * xi + (xi * 1.7).sin()).collect();
//! let data = Dataset::new(vec![("x".into(), x), ("y".into(), y)], "y").expect("valid columns");
//!
//! let slope = BayesianLinearRegression::new(&["x"]).with_n_draws(1000);
//! let flat = BayesianLinearRegression::new(&[]).with_n_draws(1000);
//!
//! let cv = CrossValidator::new().with_seed(1);
//! let folds = KFold::new(5);
//! let a = cv.kfold(&slope, &data, &folds).expect("refits succeed");
//! let b = cv.kfold(&flat, &data, &folds).expect("refits succeed");
//!
//! let cmp = compare(&a, &b).expect("same rows and method");
//! assert_eq!(cmp.preferred, Preferred::First);
//! assert!(cmp.decisive);
//! ```

mod compare;
mod cross_validation;
mod kfold;
mod psis;
mod result;

pub use compare::{compare, compare_with_threshold, Comparison, Preferred, DEFAULT_DECISIVE_SE};
pub use cross_validation::{CrossValidator, RefitPolicy, DEFAULT_PARETO_K_THRESHOLD};
pub use kfold::{KFold, DEFAULT_N_SPLITS};
pub use psis::{gpd_fit, gpd_quantile, psis_smooth, PsisWeights};
pub use result::{CvMethod, EvaluationResult, RefitFailure, UnstableEstimate};
