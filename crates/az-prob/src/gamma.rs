//! Gamma distribution utilities.

use az_core::{Error, Result};
use statrs::function::gamma::ln_gamma;

/// Log-PDF of a Gamma distribution with `shape` and `scale` at `x`.
///
/// Parameterization:
/// - `shape > 0`
/// - `scale > 0`
/// Support: `x >= 0`.
pub fn logpdf_shape_scale(x: f64, shape: f64, scale: f64) -> Result<f64> {
    validate(shape, scale)?;
    if x.is_nan() || x < 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    if x == 0.0 {
        if shape < 1.0 {
            return Ok(f64::INFINITY);
        }
        if shape > 1.0 {
            return Ok(f64::NEG_INFINITY);
        }
        // shape == 1 => exponential with rate 1/scale
        return Ok(-scale.ln());
    }

    let ln_norm = -shape * scale.ln() - ln_gamma(shape);
    Ok(ln_norm + (shape - 1.0) * x.ln() - x / scale)
}

/// Reject non-positive or non-finite shape/scale.
pub fn validate(shape: f64, scale: f64) -> Result<()> {
    if !shape.is_finite() || shape <= 0.0 {
        return Err(Error::Validation(format!("shape must be finite and > 0, got {}", shape)));
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::Validation(format!("scale must be finite and > 0, got {}", scale)));
    }
    Ok(())
}
