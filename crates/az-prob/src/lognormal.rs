//! Log-normal distribution.

use az_core::Result;

/// Log-PDF of LogNormal(mu, sigma) at `x`.
///
/// Defined as: `ln X ~ Normal(mu, sigma)`. Support: `x > 0`.
pub fn logpdf(x: f64, mu: f64, sigma: f64) -> Result<f64> {
    crate::normal::validate_sigma(sigma)?;
    if !x.is_finite() || x <= 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    let lx = x.ln();
    let lp = crate::normal::logpdf(lx, mu, sigma)?;
    Ok(lp - lx)
}
