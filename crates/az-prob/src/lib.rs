//! Probability building blocks for azpost.
//!
//! This crate hosts the scalar log-densities used as parameter priors and the
//! Gaussian measurement term shared by every likelihood:
//! - base distributions (logpdf with explicit support handling)
//! - small numeric helpers

pub mod math;
pub mod gamma;
pub mod lognormal;
pub mod normal;
pub mod uniform;
