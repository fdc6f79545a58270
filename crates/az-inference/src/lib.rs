//! # az-inference
//!
//! Bayesian scoring of R-matrix parameters against cross-section data.
//!
//! This crate provides:
//! - the sampled parameter layout (physics parameters, then one normalization
//!   factor per dataset)
//! - a per-worker pool of reaction engines
//! - the Gaussian likelihood over multi-segment or combined datasets
//! - priors and the short-circuiting posterior consumed by external drivers
//!
//! ## Architecture
//!
//! This crate depends on the `ReactionEngine` / `EngineFactory` traits from
//! az-core, NOT on a concrete reaction code.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Measured datasets and column-file loading.
pub mod data;
/// Multi-level Breit-Wigner reference engine.
pub mod engine;
/// Gaussian log-likelihood over segmented or combined data.
pub mod likelihood;
/// Sampled parameter layout and name table.
pub mod params;
/// Posterior API: prior-then-likelihood composition and batch evaluation.
pub mod posterior;
/// Parameter priors and their sum.
pub mod prior;
/// Per-worker engine pool.
pub mod solver;

pub use data::{CombinedData, DataSegment, Dataset};
pub use engine::{BreitWignerConfig, BreitWignerEngine, BreitWignerFactory, Level};
pub use likelihood::Likelihood;
pub use params::ParameterModel;
pub use posterior::Posterior;
pub use prior::{Prior, PriorSet};
pub use solver::{SolverPool, current_worker};
