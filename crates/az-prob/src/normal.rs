//! Normal and half-normal distributions.

use az_core::{Error, Result};

use crate::math::LN_SQRT_2PI;

/// Log-PDF of a Normal distribution `N(mu, sigma)` at `x`.
///
/// `log p(x) = -0.5 * ((x-mu)/sigma)^2 - ln(sigma) - ln(sqrt(2π))`
pub fn logpdf(x: f64, mu: f64, sigma: f64) -> Result<f64> {
    validate_sigma(sigma)?;
    let z = (x - mu) / sigma;
    Ok(-0.5 * z * z - sigma.ln() - LN_SQRT_2PI)
}

/// Log-PDF of a half-normal distribution with scale `sigma` at `x`.
///
/// Support: `x >= 0`.
pub fn half_logpdf(x: f64, sigma: f64) -> Result<f64> {
    validate_sigma(sigma)?;
    if x.is_nan() || x < 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    Ok(std::f64::consts::LN_2 + logpdf(x, 0.0, sigma)?)
}

/// Reject non-positive or non-finite scales.
pub fn validate_sigma(sigma: f64) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(Error::Validation(format!("sigma must be finite and > 0, got {}", sigma)));
    }
    Ok(())
}
