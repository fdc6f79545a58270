//! Core traits for azpost
//!
//! The inference layer never depends on a concrete reaction code. It talks to
//! a [`ReactionEngine`] built per worker by an [`EngineFactory`], and exposes
//! its own objective through [`LogDensity`].

use crate::Result;
use crate::types::WorkerId;

/// External reaction-calculation engine.
///
/// An engine is stateful (caches, scratch buffers, an open handle to an
/// external code) and is therefore only ever driven through `&mut self` by
/// the single worker that owns it.
pub trait ReactionEngine: Send {
    /// Number of native physics parameters.
    fn n_params(&self) -> usize;

    /// Physics parameter names (stable order).
    fn parameter_names(&self) -> Vec<String> {
        (0..self.n_params()).map(|i| format!("param_{i}")).collect()
    }

    /// Native starting values of the physics parameters (stable order).
    fn parameter_init(&self) -> Vec<f64>;

    /// Predicted cross sections, one sequence per configured data segment.
    ///
    /// `dress_up` toggles engine-side post-processing of derived quantities.
    fn calculate(&mut self, physics: &[f64], dress_up: bool) -> Result<Vec<Vec<f64>>>;
}

/// Builds one [`ReactionEngine`] per worker.
pub trait EngineFactory: Send + Sync {
    /// Engine type produced by this factory.
    type Engine: ReactionEngine;

    /// Create the engine owned by `worker`.
    fn create(&self, worker: WorkerId) -> Result<Self::Engine>;
}

impl<E, F> EngineFactory for F
where
    E: ReactionEngine,
    F: Fn(WorkerId) -> Result<E> + Send + Sync,
{
    type Engine = E;

    fn create(&self, worker: WorkerId) -> Result<E> {
        self(worker)
    }
}

/// Unnormalized log-density consumed by sampling and optimization drivers.
pub trait LogDensity: Send + Sync {
    /// Number of parameters.
    fn dim(&self) -> usize;

    /// Parameter names (stable order).
    fn parameter_names(&self) -> Vec<String>;

    /// Suggested initial values (stable order).
    fn parameter_init(&self) -> Vec<f64>;

    /// Log-density at `params`. Rejected regions return `-inf`.
    fn log_density(&self, params: &[f64]) -> Result<f64>;
}
