//! Distribution functions used by the evaluation routines.
//!
//! - Normal log density and quantile
//! - Student-t CDF and quantile (via the regularized incomplete beta function)
//!
//! Coverage intervals for small samples depend on the Student-t quantile;
//! the Normal quantile is kept for comparison and as a starting bracket.

use crate::error::{EvalError, Result};

const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// Log density of Normal(`mean`, `sd`) at `x`.
#[must_use]
pub fn normal_log_density(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    -0.5 * z * z - sd.ln() - LN_SQRT_2PI
}

/// Standard Normal quantile (inverse CDF).
///
/// Uses Acklam's rational approximation (relative error below 1.2e-9).
///
/// # Errors
///
/// Returns an error unless `0 < p < 1`.
pub fn normal_quantile(p: f64) -> Result<f64> {
    check_probability(p)?;

    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.024_25;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    let x = if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    };
    Ok(x)
}

/// Student-t cumulative distribution function with `df` degrees of freedom.
///
/// # Errors
///
/// Returns an error unless `df > 0`.
pub fn students_t_cdf(t: f64, df: f64) -> Result<f64> {
    if !(df > 0.0) {
        return Err(EvalError::invalid("df", df, "degrees of freedom > 0"));
    }
    if t.is_nan() {
        return Ok(f64::NAN);
    }
    if t.is_infinite() {
        return Ok(if t > 0.0 { 1.0 } else { 0.0 });
    }

    // P(|T| > |t|) = I_x(df/2, 1/2) with x = df / (df + t²)
    let x = df / (df + t * t);
    let tail = 0.5 * regularized_incomplete_beta(df / 2.0, 0.5, x);
    Ok(if t > 0.0 { 1.0 - tail } else { tail })
}

/// Student-t quantile (inverse CDF) with `df` degrees of freedom.
///
/// Brackets the root starting from the Normal quantile and bisects on
/// [`students_t_cdf`] to an absolute tolerance of 1e-12.
///
/// # Errors
///
/// Returns an error unless `0 < p < 1` and `df > 0`.
///
/// # Examples
///
/// ```
/// use regeval::stats::students_t_quantile;
///
/// let t = students_t_quantile(0.975, 9.0).expect("valid arguments");
/// assert!((t - 2.262_157).abs() < 1e-5);
/// ```
pub fn students_t_quantile(p: f64, df: f64) -> Result<f64> {
    check_probability(p)?;
    if !(df > 0.0) {
        return Err(EvalError::invalid("df", df, "degrees of freedom > 0"));
    }
    if (p - 0.5).abs() < f64::EPSILON {
        return Ok(0.0);
    }

    // The t quantile is always further from zero than the Normal one.
    let z = normal_quantile(p)?;
    let (mut lo, mut hi) = if z > 0.0 { (0.0, z.max(1.0)) } else { (z.min(-1.0), 0.0) };
    while students_t_cdf(hi, df)? < p {
        lo = hi;
        hi *= 2.0;
    }
    while students_t_cdf(lo, df)? > p {
        hi = lo;
        lo *= 2.0;
    }

    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if students_t_cdf(mid, df)? < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-12 * hi.abs().max(1.0) {
            break;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Regularized incomplete beta function I_x(a, b).
#[must_use]
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_bt = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let bt = ln_bt.exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        bt * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - bt * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

fn check_probability(p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(EvalError::invalid("p", p, "a probability in (0, 1)"))
    }
}

include!("beta_continued_fraction.rs");

#[cfg(test)]
#[path = "distributions_tests.rs"]
mod tests;
