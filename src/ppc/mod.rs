//! Posterior predictive checking.
//!
//! [`PosteriorPredictive`] turns posterior draws into replicated datasets
//! (streamed, as an S×n matrix, or in tidy long form) and
//! [`check_statistic`] compares a test statistic on the observed data with
//! its replicated distribution.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use regeval::prelude::*;
//! use regeval::ppc::{check_statistic, stat_mean, PosteriorPredictive};
//! use regeval::primitives::Matrix;
//!
//! let y = vec![9.8, 10.1, 10.4, 9.6, 10.0, 10.2, 9.9, 10.3];
//! let data = Dataset::from_outcome("y", y.clone());
//! let fit = BayesianLinearRegression::new(&[])
//!     .with_n_draws(300)
//!     .fit(&data, 7)
//!     .expect("fit succeeds");
//!
//! let design = Matrix::ones(y.len(), 1);
//! let ppc = PosteriorPredictive::new(fit.draws(), &design, y.len()).expect("shapes agree");
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let check = check_statistic(&y, ppc.replicates(&mut rng), stat_mean).expect("300 replicates");
//! assert!(check.p_value_two_sided() > 0.05);
//! ```

mod check;
mod simulate;

pub use check::{
    check_statistic, stat_max, stat_mean, stat_min, stat_sd, stat_switches, CheckResult,
};
pub use simulate::{
    simulate, simulate_tidy, PosteriorPredictive, ReplicatedDataset, Replicates, TidyReplicate,
};
