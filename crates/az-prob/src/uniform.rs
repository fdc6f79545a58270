//! Continuous uniform distribution.

use az_core::{Error, Result};

/// Log-PDF of `Uniform(low, high)` at `x`.
///
/// Support is the closed interval `[low, high]`; outside it (or for NaN) the
/// density is zero and the log-density is `-inf`.
pub fn logpdf(x: f64, low: f64, high: f64) -> Result<f64> {
    validate(low, high)?;
    if x >= low && x <= high { Ok(-(high - low).ln()) } else { Ok(f64::NEG_INFINITY) }
}

/// Bounds from a location/width pair: `[loc, loc + scale]`.
pub fn bounds_from_loc_scale(loc: f64, scale: f64) -> Result<(f64, f64)> {
    let high = loc + scale;
    validate(loc, high)?;
    Ok((loc, high))
}

/// Reject empty or non-finite intervals.
pub fn validate(low: f64, high: f64) -> Result<()> {
    if !low.is_finite() || !high.is_finite() || high <= low {
        return Err(Error::Validation(format!(
            "uniform bounds must be finite with low < high, got [{}, {}]",
            low, high
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inside_support() {
        let lp = logpdf(2.35, 2.30, 2.40).unwrap();
        assert_relative_eq!(lp, -(0.1f64).ln(), epsilon = 1e-9);
    }

    #[test]
    fn test_edges_are_inclusive() {
        assert!(logpdf(0.0, 0.0, 100.0).unwrap().is_finite());
        assert!(logpdf(100.0, 0.0, 100.0).unwrap().is_finite());
    }

    #[test]
    fn test_out_of_support() {
        for x in [-1e-9, 100.0 + 1e-9, f64::NAN] {
            let lp = logpdf(x, 0.0, 100.0).unwrap();
            assert!(lp.is_infinite() && lp.is_sign_negative(), "x={}", x);
        }
    }

    #[test]
    fn test_loc_scale() {
        let (lo, hi) = bounds_from_loc_scale(-10.0, 20.0).unwrap();
        assert_eq!((lo, hi), (-10.0, 10.0));
        assert!(bounds_from_loc_scale(0.0, 0.0).is_err());
        assert!(bounds_from_loc_scale(0.0, -1.0).is_err());
    }
}
