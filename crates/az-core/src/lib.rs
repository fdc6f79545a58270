//! # az-core
//!
//! Core types, traits, and error handling for azpost.
//!
//! This crate provides:
//! - Common error types
//! - Core traits (ReactionEngine, EngineFactory, LogDensity)
//! - Shared data structures (worker identity, evaluation records)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{EngineFactory, LogDensity, ReactionEngine};
pub use types::{Evaluation, WorkerId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
