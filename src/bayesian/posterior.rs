//! Posterior draw containers.

use crate::error::{EvalError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Deserializer, Serialize};

/// One posterior draw: regression coefficients plus residual scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorDraw {
    /// Coefficients in the order of [`PosteriorDrawSet::names`]
    pub coefficients: Vec<f64>,
    /// Residual standard deviation σ
    pub sigma: f64,
}

/// An ordered set of S posterior draws sharing one parameter layout.
///
/// Every draw carries exactly one value per name in `names` and a finite,
/// positive `sigma`; [`PosteriorDrawSet::new`] enforces both.
///
/// # Examples
///
/// ```
/// use regeval::bayesian::PosteriorDrawSet;
///
/// let draws = PosteriorDrawSet::intercept_only(&[26.1, 26.4], &[10.5, 11.0])
///     .expect("matching lengths, positive sigma");
/// assert_eq!(draws.len(), 2);
/// assert_eq!(draws.param("(Intercept)").expect("exists"), vec![26.1, 26.4]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosteriorDrawSet {
    names: Vec<String>,
    draws: Vec<PosteriorDraw>,
}

// Loaded draws go through the same layout checks as `new`.
impl<'de> Deserialize<'de> for PosteriorDrawSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            names: Vec<String>,
            draws: Vec<PosteriorDraw>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.names, raw.draws).map_err(serde::de::Error::custom)
    }
}

/// Name used for the intercept coefficient.
pub const INTERCEPT: &str = "(Intercept)";

impl PosteriorDrawSet {
    /// Creates a draw set, validating the shared parameter layout.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::DimensionMismatch`] if a draw has the wrong number
    /// of coefficients, or [`EvalError::InvalidHyperparameter`] if a sigma is
    /// not finite and positive.
    pub fn new(names: Vec<String>, draws: Vec<PosteriorDraw>) -> Result<Self> {
        for (s, draw) in draws.iter().enumerate() {
            if draw.coefficients.len() != names.len() {
                return Err(EvalError::dims(
                    format!("{} coefficients per draw", names.len()),
                    format!("{} in draw {s}", draw.coefficients.len()),
                ));
            }
            if !(draw.sigma.is_finite() && draw.sigma > 0.0) {
                return Err(EvalError::invalid(
                    format!("sigma[{s}]"),
                    draw.sigma,
                    "a finite value > 0",
                ));
            }
        }
        Ok(Self { names, draws })
    }

    /// Creates draws for an intercept-only model from parallel slices.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length or a sigma is invalid.
    pub fn intercept_only(intercepts: &[f64], sigmas: &[f64]) -> Result<Self> {
        if intercepts.len() != sigmas.len() {
            return Err(EvalError::dims(
                format!("{} sigma draws", intercepts.len()),
                format!("{} sigma draws", sigmas.len()),
            ));
        }
        let draws = intercepts
            .iter()
            .zip(sigmas)
            .map(|(&b0, &sigma)| PosteriorDraw {
                coefficients: vec![b0],
                sigma,
            })
            .collect();
        Self::new(vec![INTERCEPT.to_string()], draws)
    }

    /// Number of draws S.
    #[must_use]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    /// Returns true if there are no draws.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Coefficient names shared by every draw.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of coefficients per draw.
    #[must_use]
    pub fn n_coefficients(&self) -> usize {
        self.names.len()
    }

    /// Iterates over draws in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PosteriorDraw> {
        self.draws.iter()
    }

    /// Returns draw `s`, if present.
    #[must_use]
    pub fn get(&self, s: usize) -> Option<&PosteriorDraw> {
        self.draws.get(s)
    }

    /// All draws of one named coefficient.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::NotFound`] for an unknown name.
    pub fn param(&self, name: &str) -> Result<Vec<f64>> {
        let j = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| EvalError::NotFound {
                what: format!("parameter '{name}'"),
            })?;
        Ok(self.draws.iter().map(|d| d.coefficients[j]).collect())
    }

    /// All sigma draws.
    #[must_use]
    pub fn sigma(&self) -> Vec<f64> {
        self.draws.iter().map(|d| d.sigma).collect()
    }

    /// Linear predictor μ = Xβₛ for draw `s`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::DimensionMismatch`] if the design matrix column
    /// count differs from the coefficient count, or `s` is out of range.
    pub fn linear_predictor(&self, s: usize, x: &Matrix<f64>) -> Result<Vec<f64>> {
        let draw = self.draws.get(s).ok_or_else(|| {
            EvalError::dims(format!("draw index < {}", self.len()), format!("{s}"))
        })?;
        if x.n_cols() != draw.coefficients.len() {
            return Err(EvalError::dims(
                format!("{} design columns", draw.coefficients.len()),
                format!("{} columns", x.n_cols()),
            ));
        }
        x.matvec(&draw.coefficients)
    }

    /// Linear predictors for every draw: S vectors of length `x.n_rows()`.
    ///
    /// # Errors
    ///
    /// Same as [`PosteriorDrawSet::linear_predictor`].
    pub fn linear_predictors(&self, x: &Matrix<f64>) -> Result<Vec<Vec<f64>>> {
        (0..self.len())
            .map(|s| self.linear_predictor(s, x))
            .collect()
    }
}

impl<'a> IntoIterator for &'a PosteriorDrawSet {
    type Item = &'a PosteriorDraw;
    type IntoIter = std::slice::Iter<'a, PosteriorDraw>;

    fn into_iter(self) -> Self::IntoIter {
        self.draws.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_coef_draws() -> PosteriorDrawSet {
        PosteriorDrawSet::new(
            vec![INTERCEPT.to_string(), "x".to_string()],
            vec![
                PosteriorDraw {
                    coefficients: vec![1.0, 2.0],
                    sigma: 0.5,
                },
                PosteriorDraw {
                    coefficients: vec![0.0, 1.0],
                    sigma: 1.5,
                },
            ],
        )
        .expect("consistent draws")
    }

    #[test]
    fn test_new_rejects_ragged_draws() {
        let result = PosteriorDrawSet::new(
            vec!["a".into(), "b".into()],
            vec![PosteriorDraw {
                coefficients: vec![1.0],
                sigma: 1.0,
            }],
        );
        assert!(matches!(result, Err(EvalError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_deserialize_validates_layout() {
        let ragged = r#"{"names":["(Intercept)","x"],"draws":[
            {"coefficients":[1.0,2.0],"sigma":0.5},
            {"coefficients":[5.0],"sigma":0.5}]}"#;
        let err = serde_json::from_str::<PosteriorDrawSet>(ragged).expect_err("ragged draws");
        assert!(err.to_string().contains("dimension mismatch"));

        let bad_sigma = r#"{"names":["(Intercept)"],"draws":[{"coefficients":[1.0],"sigma":-1.0}]}"#;
        assert!(serde_json::from_str::<PosteriorDrawSet>(bad_sigma).is_err());

        let draws = two_coef_draws();
        let json = serde_json::to_string(&draws).expect("serializable");
        let back: PosteriorDrawSet = serde_json::from_str(&json).expect("valid layout");
        assert_eq!(back, draws);
    }

    #[test]
    fn test_new_rejects_bad_sigma() {
        for sigma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = PosteriorDrawSet::intercept_only(&[0.0], &[sigma]);
            assert!(
                matches!(result, Err(EvalError::InvalidHyperparameter { .. })),
                "sigma={sigma} should be rejected"
            );
        }
    }

    #[test]
    fn test_intercept_only_length_mismatch() {
        assert!(PosteriorDrawSet::intercept_only(&[0.0, 1.0], &[1.0]).is_err());
    }

    #[test]
    fn test_param_and_sigma() {
        let draws = two_coef_draws();
        assert_eq!(draws.param("x").expect("exists"), vec![2.0, 1.0]);
        assert_eq!(draws.sigma(), vec![0.5, 1.5]);
        assert!(matches!(draws.param("z"), Err(EvalError::NotFound { .. })));
        assert_eq!(draws.n_coefficients(), 2);
        assert_eq!((&draws).into_iter().count(), 2);
    }

    #[test]
    fn test_linear_predictors() {
        let draws = two_coef_draws();
        let x = Matrix::from_vec(3, 2, vec![1.0, 0.0, 1.0, 1.0, 1.0, 2.0]).expect("3x2");
        let mu = draws.linear_predictors(&x).expect("columns match");
        assert_eq!(mu, vec![vec![1.0, 3.0, 5.0], vec![0.0, 1.0, 2.0]]);
    }

    #[test]
    fn test_linear_predictor_column_mismatch() {
        let draws = two_coef_draws();
        let x = Matrix::ones(3, 3);
        assert!(matches!(
            draws.linear_predictor(0, &x),
            Err(EvalError::DimensionMismatch { .. })
        ));
        assert!(draws.linear_predictor(5, &Matrix::ones(3, 2)).is_err());
    }
}
