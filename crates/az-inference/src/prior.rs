//! Independent univariate priors, one per sampled parameter.

use az_core::{Error, Result};
use az_prob::{gamma, lognormal, normal, uniform};
use serde::{Deserialize, Serialize};

/// Prior distribution for a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dist", rename_all = "snake_case")]
pub enum Prior {
    /// Flat (improper) prior; contributes 0 everywhere.
    Flat,
    /// Normal prior `N(mean, sd)`.
    Normal {
        /// Center of the Gaussian prior.
        mean: f64,
        /// Width (standard deviation) of the Gaussian prior.
        sd: f64,
    },
    /// Uniform prior on the closed interval `[low, high]`.
    Uniform {
        /// Lower edge.
        low: f64,
        /// Upper edge.
        high: f64,
    },
    /// Log-normal prior: `ln x ~ N(mu, sigma)`.
    LogNormal {
        /// Mean of `ln x`.
        mu: f64,
        /// Standard deviation of `ln x`.
        sigma: f64,
    },
    /// Gamma prior with shape and scale.
    Gamma {
        /// Shape `k`.
        shape: f64,
        /// Scale `theta`.
        scale: f64,
    },
    /// Half-normal prior on `x >= 0`.
    HalfNormal {
        /// Scale.
        sd: f64,
    },
}

impl Prior {
    /// Uniform prior on `[loc, loc + scale]`.
    pub fn uniform_loc_scale(loc: f64, scale: f64) -> Result<Self> {
        let (low, high) = uniform::bounds_from_loc_scale(loc, scale)?;
        Ok(Self::Uniform { low, high })
    }

    /// Check hyper-parameters.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Flat => Ok(()),
            Self::Normal { sd, .. } | Self::HalfNormal { sd } => normal::validate_sigma(sd),
            Self::Uniform { low, high } => uniform::validate(low, high),
            Self::LogNormal { sigma, .. } => normal::validate_sigma(sigma),
            Self::Gamma { shape, scale } => gamma::validate(shape, scale),
        }
    }

    /// Log-density at `x`. Outside the support this is `-inf`.
    pub fn logpdf(&self, x: f64) -> Result<f64> {
        match *self {
            Self::Flat => Ok(0.0),
            Self::Normal { mean, sd } => normal::logpdf(x, mean, sd),
            Self::Uniform { low, high } => uniform::logpdf(x, low, high),
            Self::LogNormal { mu, sigma } => lognormal::logpdf(x, mu, sigma),
            Self::Gamma { shape, scale } => gamma::logpdf_shape_scale(x, shape, scale),
            Self::HalfNormal { sd } => normal::half_logpdf(x, sd),
        }
    }

    /// Representative starting point inside the support, if one exists.
    pub fn center(&self) -> Option<f64> {
        match *self {
            Self::Flat => None,
            Self::Normal { mean, .. } => Some(mean),
            Self::Uniform { low, high } => Some(0.5 * (low + high)),
            Self::LogNormal { mu, .. } => Some(mu.exp()),
            Self::Gamma { shape, scale } => Some(shape * scale),
            Self::HalfNormal { sd } => Some(sd),
        }
    }
}

/// Ordered priors for the full parameter vector.
#[derive(Debug, Clone)]
pub struct PriorSet {
    priors: Vec<Prior>,
}

impl PriorSet {
    /// Validate every prior and build the set.
    pub fn new(priors: Vec<Prior>) -> Result<Self> {
        for (i, prior) in priors.iter().enumerate() {
            prior
                .validate()
                .map_err(|e| Error::Validation(format!("prior {}: {}", i, e)))?;
        }
        Ok(Self { priors })
    }

    /// Flat priors for `n` parameters.
    pub fn flat(n: usize) -> Self {
        Self { priors: vec![Prior::Flat; n] }
    }

    /// Number of priors.
    pub fn len(&self) -> usize {
        self.priors.len()
    }

    /// `true` if there are no priors.
    pub fn is_empty(&self) -> bool {
        self.priors.is_empty()
    }

    /// Priors in parameter order.
    pub fn priors(&self) -> &[Prior] {
        &self.priors
    }

    /// Sum of the log-densities of every entry.
    ///
    /// All entries are evaluated; an out-of-support entry makes the sum
    /// `-inf` without stopping the loop.
    pub fn log_prior(&self, theta: &[f64]) -> Result<f64> {
        if theta.len() != self.priors.len() {
            return Err(Error::Validation(format!(
                "expected {} parameters for the priors, got {}",
                self.priors.len(),
                theta.len()
            )));
        }
        let mut lp = 0.0;
        for (prior, &x) in self.priors.iter().zip(theta) {
            lp += prior.logpdf(x)?;
        }
        Ok(lp)
    }
}
