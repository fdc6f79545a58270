//! Common data types for azpost

use serde::{Deserialize, Serialize};

/// Identity of the worker evaluating a parameter vector.
///
/// `WorkerId(0)` is the default worker, used when no parallel context is
/// active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
pub struct WorkerId(pub usize);

impl WorkerId {
    /// Raw worker index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// One scored parameter vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Full sampled parameter vector.
    pub parameters: Vec<f64>,

    /// Sum of prior log-densities.
    pub log_prior: f64,

    /// Log-likelihood. `None` when the prior rejected the vector and the
    /// engine was never called.
    pub log_likelihood: Option<f64>,

    /// Log-posterior (`-inf` outside the prior support).
    pub log_posterior: f64,
}

impl Evaluation {
    /// Record for a vector rejected by the prior.
    pub fn rejected(parameters: Vec<f64>, log_prior: f64) -> Self {
        Self { parameters, log_prior, log_likelihood: None, log_posterior: f64::NEG_INFINITY }
    }

    /// Record for a vector inside the prior support.
    pub fn scored(parameters: Vec<f64>, log_prior: f64, log_likelihood: f64) -> Self {
        Self {
            parameters,
            log_prior,
            log_likelihood: Some(log_likelihood),
            log_posterior: log_likelihood + log_prior,
        }
    }

    /// `true` if the likelihood was evaluated.
    pub fn is_accepted(&self) -> bool {
        self.log_likelihood.is_some()
    }
}
