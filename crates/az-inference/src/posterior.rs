//! Posterior distribution for Bayesian inference.
//!
//! Wraps a [`Likelihood`] and a [`PriorSet`]:
//!
//! - `log_posterior(theta) = log_likelihood(theta) + log_prior(theta)`
//! - `log_posterior(theta) = -inf` whenever `log_prior(theta)` is not finite,
//!   in which case the engine is never called.

use std::collections::HashMap;

use az_core::{EngineFactory, Error, Evaluation, LogDensity, Result, WorkerId};
use rayon::prelude::*;

use crate::likelihood::Likelihood;
use crate::prior::PriorSet;
use crate::solver::current_worker;

/// Posterior over the full sampled parameter vector.
pub struct Posterior<'a, F: EngineFactory> {
    likelihood: &'a Likelihood<F>,
    priors: PriorSet,
}

impl<'a, F: EngineFactory> Posterior<'a, F> {
    /// Create a posterior with flat priors.
    pub fn new(likelihood: &'a Likelihood<F>) -> Self {
        let priors = PriorSet::flat(likelihood.parameters().dim());
        Self { likelihood, priors }
    }

    /// Set priors (one per parameter). Length must match the parameter layout.
    pub fn with_priors(mut self, priors: PriorSet) -> Result<Self> {
        let dim = self.likelihood.parameters().dim();
        if priors.len() != dim {
            return Err(Error::Validation(format!(
                "expected {} priors ({} physics + {} norms), got {}",
                dim,
                self.likelihood.parameters().n_physics(),
                self.likelihood.parameters().n_norms(),
                priors.len()
            )));
        }
        self.priors = priors;
        Ok(self)
    }

    /// Number of parameters.
    pub fn dim(&self) -> usize {
        self.likelihood.parameters().dim()
    }

    /// Reference to the underlying likelihood.
    pub fn likelihood(&self) -> &Likelihood<F> {
        self.likelihood
    }

    /// Reference to the priors.
    pub fn priors(&self) -> &PriorSet {
        &self.priors
    }

    /// Sum of the prior log-densities.
    pub fn log_prior(&self, theta: &[f64]) -> Result<f64> {
        self.priors.log_prior(theta)
    }

    /// Log-likelihood on the current worker.
    pub fn log_likelihood(&self, theta: &[f64]) -> Result<f64> {
        self.likelihood.log_likelihood(theta)
    }

    /// Log-posterior on the current worker.
    pub fn log_posterior(&self, theta: &[f64]) -> Result<f64> {
        self.log_posterior_on(theta, current_worker())
    }

    /// Log-posterior on `worker`'s engine.
    pub fn log_posterior_on(&self, theta: &[f64], worker: WorkerId) -> Result<f64> {
        Ok(self.evaluate_on(theta, worker)?.log_posterior)
    }

    /// Log-posterior from a name-to-value mapping.
    pub fn log_posterior_named(&self, values: &HashMap<String, f64>) -> Result<f64> {
        let theta = self.likelihood.parameters().vector_from_named(values)?;
        self.log_posterior(&theta)
    }

    /// Full record on the current worker.
    pub fn evaluate(&self, theta: &[f64]) -> Result<Evaluation> {
        self.evaluate_on(theta, current_worker())
    }

    /// Full record on `worker`'s engine.
    pub fn evaluate_on(&self, theta: &[f64], worker: WorkerId) -> Result<Evaluation> {
        let lp = self.priors.log_prior(theta)?;
        if !lp.is_finite() {
            return Ok(Evaluation::rejected(theta.to_vec(), lp));
        }
        let ll = self.likelihood.log_likelihood_on(theta, worker)?;
        Ok(Evaluation::scored(theta.to_vec(), lp, ll))
    }

    /// Evaluate many vectors in parallel, one per rayon task.
    ///
    /// Output order matches input order. A failure affects only its own entry.
    pub fn evaluate_batch(&self, thetas: &[Vec<f64>]) -> Vec<Result<Evaluation>> {
        thetas.par_iter().map(|theta| self.evaluate(theta)).collect()
    }

    /// Log-posterior of many vectors in parallel.
    pub fn log_posterior_batch(&self, thetas: &[Vec<f64>]) -> Vec<Result<f64>> {
        thetas.par_iter().map(|theta| self.log_posterior(theta)).collect()
    }
}

impl<F: EngineFactory> LogDensity for Posterior<'_, F> {
    fn dim(&self) -> usize {
        Posterior::dim(self)
    }

    fn parameter_names(&self) -> Vec<String> {
        self.likelihood.parameters().names().to_vec()
    }

    fn parameter_init(&self) -> Vec<f64> {
        // Engine defaults can sit outside a configured prior; prefer the prior's center then.
        let mut init = self.likelihood.initial().unwrap_or_else(|_| vec![0.0; self.dim()]);
        for (x, prior) in init.iter_mut().zip(self.priors.priors()) {
            let inside = prior.logpdf(*x).map(f64::is_finite).unwrap_or(false);
            if !inside {
                if let Some(c) = prior.center() {
                    *x = c;
                }
            }
        }
        init
    }

    fn log_density(&self, params: &[f64]) -> Result<f64> {
        self.log_posterior(params)
    }
}
