//! Small numeric helpers shared by the distributions and the likelihood.

use std::f64::consts::PI;

/// Natural log of `sqrt(2π)`.
pub const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// Log normalizing constant of a Gaussian measurement: `-0.5 * ln(2π σ²)`.
#[inline]
pub fn gaussian_log_norm(sigma: f64) -> f64 {
    -0.5 * (2.0 * PI * sigma * sigma).ln()
}

/// Log-density of a Gaussian measurement `y ± sigma` against the prediction `mu`.
///
/// `sigma_norm` enters only the normalizing constant, `sigma_dev` only the
/// squared deviation. Passing the same value for both gives the textbook term.
#[inline]
pub fn gaussian_term(mu: f64, y: f64, sigma_norm: f64, sigma_dev: f64) -> f64 {
    let pull = (mu - y) / sigma_dev;
    gaussian_log_norm(sigma_norm) - 0.5 * pull * pull
}
