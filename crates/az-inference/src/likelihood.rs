//! Gaussian log-likelihood of cross-section data.
//!
//! Segmented form, for segment `i` with normalization factor `n_i`:
//!
//! `ln L = Σ_i Σ_j [ -0.5 ln(2π σ_ij²) - 0.5 ((μ_ij - n_i y_ij) / (n_i σ_ij))² ]`
//!
//! The normalizing constant keeps the unscaled uncertainty `σ_ij` while the
//! pull uses the scaled one `n_i σ_ij`. A zero factor is not guarded; the
//! resulting non-finite value propagates to the caller.
//!
//! Combined form: every parameter is a physics parameter, the engine's
//! segments are concatenated and scored against one flat array with
//! `n_i = 1`.

use az_core::{EngineFactory, Error, Result, WorkerId};
use az_prob::math::gaussian_term;

use crate::data::{CombinedData, DataSegment, Dataset};
use crate::params::ParameterModel;
use crate::solver::{SolverPool, current_worker};

/// Log-likelihood of one segment under normalization factor `norm`.
///
/// Empty segments contribute `0`.
pub fn segment_log_likelihood(
    values: &[f64],
    uncertainties: &[f64],
    mu: &[f64],
    norm: f64,
) -> f64 {
    values
        .iter()
        .zip(uncertainties)
        .zip(mu)
        .map(|((&y, &yerr), &m)| gaussian_term(m, y * norm, yerr, yerr * norm))
        .sum()
}

/// Likelihood evaluator over a per-worker engine pool.
pub struct Likelihood<F: EngineFactory> {
    solver: SolverPool<F>,
    data: Dataset,
    params: ParameterModel,
}

impl<F: EngineFactory> Likelihood<F> {
    /// Build the evaluator. The parameter layout is the engine's physics
    /// parameters followed by one factor per segment (none when combined).
    pub fn new(solver: SolverPool<F>, data: Dataset) -> Result<Self> {
        let physics_names = solver.layout().names.clone();
        let params = ParameterModel::new(physics_names, &data.norm_names())?;
        Ok(Self { solver, data, params })
    }

    /// Sampled parameter layout.
    pub fn parameters(&self) -> &ParameterModel {
        &self.params
    }

    /// Engine pool.
    pub fn solver(&self) -> &SolverPool<F> {
        &self.solver
    }

    /// Measured data.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Starting vector: engine defaults followed by unit normalization factors.
    pub fn initial(&self) -> Result<Vec<f64>> {
        self.params.initial(&self.solver.layout().init)
    }

    /// Log-likelihood evaluated on the current worker's engine.
    pub fn log_likelihood(&self, theta: &[f64]) -> Result<f64> {
        self.log_likelihood_on(theta, current_worker())
    }

    /// Log-likelihood evaluated on `worker`'s engine.
    pub fn log_likelihood_on(&self, theta: &[f64], worker: WorkerId) -> Result<f64> {
        let (physics, norms) = self.params.split(theta)?;
        let predictions = self.solver.calculate(physics, worker)?;

        let ll = match &self.data {
            Dataset::Segmented { segments } => segmented(segments, &predictions, norms)?,
            Dataset::Combined { data } => combined(data, predictions)?,
        };

        if !ll.is_finite() {
            log::debug!("non-finite log-likelihood {} on {}", ll, worker);
        }
        Ok(ll)
    }
}

fn segmented(segments: &[DataSegment], predictions: &[Vec<f64>], norms: &[f64]) -> Result<f64> {
    if predictions.len() != segments.len() {
        return Err(Error::Validation(format!(
            "engine returned {} segments, data has {}",
            predictions.len(),
            segments.len()
        )));
    }

    let mut total = 0.0;
    for ((segment, mu), &norm) in segments.iter().zip(predictions).zip(norms) {
        check_len(segment.name(), mu.len(), segment.len())?;
        total += segment_log_likelihood(segment.values(), segment.uncertainties(), mu, norm);
    }
    Ok(total)
}

fn combined(data: &CombinedData, predictions: Vec<Vec<f64>>) -> Result<f64> {
    let mu: Vec<f64> = predictions.into_iter().flatten().collect();
    check_len("combined", mu.len(), data.len())?;
    Ok(segment_log_likelihood(data.values(), data.uncertainties(), &mu, 1.0))
}

fn check_len(name: &str, predicted: usize, measured: usize) -> Result<()> {
    if predicted != measured {
        return Err(Error::Validation(format!(
            "segment '{}': engine returned {} points, data has {}",
            name, predicted, measured
        )));
    }
    Ok(())
}
