//! Core compute primitives.
//!
//! Sequences of observations are plain `Vec<f64>` / `&[f64]`; the only
//! structured type is the row-major [`Matrix`] used for design matrices
//! and the small linear solves inside the reference fitter.

mod matrix;

pub use matrix::Matrix;
