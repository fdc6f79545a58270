//! Multi-level Breit-Wigner reference engine.
//!
//! `σ(E) = Σ_k s_k (Γ_k/2)² / ((E - E_k)² + (Γ_k/2)²)`
//!
//! Physics parameters per level, in order: resonance energy `E_k`, total
//! width `Γ_k`, peak cross section `s_k`. Predictions are produced on one
//! energy grid per data segment. With `dress_up` a constant background is
//! added to every point.

use std::sync::Arc;

use az_core::{EngineFactory, Error, ReactionEngine, Result, WorkerId};
use serde::{Deserialize, Serialize};

/// Parameters of one resonance level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Resonance energy.
    pub energy: f64,
    /// Total width.
    pub width: f64,
    /// Peak cross section.
    pub strength: f64,
}

/// Static engine configuration shared by every worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreitWignerConfig {
    /// Starting level parameters.
    pub levels: Vec<Level>,
    /// Energy grid of each data segment, in segment order.
    pub grids: Vec<Vec<f64>>,
    /// Background added when dressing up the predictions.
    #[serde(default)]
    pub background: f64,
}

impl BreitWignerConfig {
    /// Parameter names `level{k}_energy`, `level{k}_width`, `level{k}_strength`.
    pub fn parameter_names(&self) -> Vec<String> {
        (0..self.levels.len())
            .flat_map(|k| {
                ["energy", "width", "strength"].into_iter().map(move |p| format!("level{k}_{p}"))
            })
            .collect()
    }
}

/// Stateful engine instance owned by one worker.
///
/// Keeps the last physics vector and its predictions so that a repeated
/// request is served without recomputation.
#[derive(Debug)]
pub struct BreitWignerEngine {
    config: Arc<BreitWignerConfig>,
    last: Option<(Vec<f64>, bool, Vec<Vec<f64>>)>,
    n_evaluations: u64,
}

impl BreitWignerEngine {
    /// Create an engine over a shared configuration.
    pub fn new(config: Arc<BreitWignerConfig>) -> Self {
        Self { config, last: None, n_evaluations: 0 }
    }

    /// Number of cross-section evaluations actually computed.
    pub fn n_evaluations(&self) -> u64 {
        self.n_evaluations
    }

    fn levels(physics: &[f64]) -> Result<Vec<Level>> {
        physics
            .chunks_exact(3)
            .enumerate()
            .map(|(k, p)| {
                let level = Level { energy: p[0], width: p[1], strength: p[2] };
                if !(level.energy.is_finite() && level.energy > 0.0) {
                    return Err(Error::Engine(format!(
                        "level {}: non-physical resonance energy {}",
                        k, level.energy
                    )));
                }
                if !(level.width.is_finite() && level.width > 0.0) {
                    return Err(Error::Engine(format!(
                        "level {}: width must be > 0, got {}",
                        k, level.width
                    )));
                }
                if !level.strength.is_finite() {
                    return Err(Error::Engine(format!("level {}: strength is not finite", k)));
                }
                Ok(level)
            })
            .collect()
    }
}

/// Cross section of `levels` at energy `e`.
pub fn cross_section(levels: &[Level], e: f64) -> f64 {
    levels
        .iter()
        .map(|l| {
            let half = 0.5 * l.width;
            let de = e - l.energy;
            l.strength * half * half / (de * de + half * half)
        })
        .sum()
}

impl ReactionEngine for BreitWignerEngine {
    fn n_params(&self) -> usize {
        3 * self.config.levels.len()
    }

    fn parameter_names(&self) -> Vec<String> {
        self.config.parameter_names()
    }

    fn parameter_init(&self) -> Vec<f64> {
        self.config.levels.iter().flat_map(|l| [l.energy, l.width, l.strength]).collect()
    }

    fn calculate(&mut self, physics: &[f64], dress_up: bool) -> Result<Vec<Vec<f64>>> {
        if physics.len() != self.n_params() {
            return Err(Error::Engine(format!(
                "expected {} physics parameters, got {}",
                self.n_params(),
                physics.len()
            )));
        }
        if let Some((p, d, out)) = &self.last {
            if p.as_slice() == physics && *d == dress_up {
                return Ok(out.clone());
            }
        }

        let levels = Self::levels(physics)?;
        let background = if dress_up { self.config.background } else { 0.0 };
        let out: Vec<Vec<f64>> = self
            .config
            .grids
            .iter()
            .map(|grid| grid.iter().map(|&e| cross_section(&levels, e) + background).collect())
            .collect();

        self.n_evaluations += 1;
        self.last = Some((physics.to_vec(), dress_up, out.clone()));
        Ok(out)
    }
}

/// Builds one [`BreitWignerEngine`] per worker over a shared configuration.
#[derive(Debug, Clone)]
pub struct BreitWignerFactory {
    config: Arc<BreitWignerConfig>,
}

impl BreitWignerFactory {
    /// Validate the configuration and wrap it for sharing.
    pub fn new(config: BreitWignerConfig) -> Result<Self> {
        if config.levels.is_empty() {
            return Err(Error::Validation("at least one resonance level is required".into()));
        }
        let init: Vec<f64> =
            config.levels.iter().flat_map(|l| [l.energy, l.width, l.strength]).collect();
        BreitWignerEngine::levels(&init)
            .map_err(|e| Error::Validation(format!("initial levels: {}", e)))?;
        Ok(Self { config: Arc::new(config) })
    }

    /// Shared configuration.
    pub fn config(&self) -> &BreitWignerConfig {
        &self.config
    }
}

impl EngineFactory for BreitWignerFactory {
    type Engine = BreitWignerEngine;

    fn create(&self, worker: WorkerId) -> Result<BreitWignerEngine> {
        log::debug!("creating Breit-Wigner engine for {}", worker);
        Ok(BreitWignerEngine::new(Arc::clone(&self.config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> BreitWignerConfig {
        BreitWignerConfig {
            levels: vec![
                Level { energy: 0.42, width: 0.04, strength: 3.0 },
                Level { energy: 1.56, width: 0.05, strength: 1.2 },
            ],
            grids: vec![vec![0.40, 0.42, 0.44], vec![1.50, 1.56]],
            background: 0.01,
        }
    }

    #[test]
    fn test_peak_value() {
        let levels = [Level { energy: 1.0, width: 0.2, strength: 5.0 }];
        assert_relative_eq!(cross_section(&levels, 1.0), 5.0, epsilon = 1e-12);
        // Half maximum at E_r ± Γ/2.
        assert_relative_eq!(cross_section(&levels, 1.1), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_layout() {
        let engine = BreitWignerEngine::new(Arc::new(config()));
        assert_eq!(engine.n_params(), 6);
        assert_eq!(engine.parameter_names()[4], "level1_width");
        assert_eq!(engine.parameter_init(), vec![0.42, 0.04, 3.0, 1.56, 0.05, 1.2]);
    }

    #[test]
    fn test_segments_follow_grids() {
        let mut engine = BreitWignerEngine::new(Arc::new(config()));
        let init = engine.parameter_init();
        let out = engine.calculate(&init, false).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 3);
        assert_eq!(out[1].len(), 2);

        let dressed = engine.calculate(&init, true).unwrap();
        assert_relative_eq!(dressed[0][1] - out[0][1], 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_repeated_call_is_cached() {
        let mut engine = BreitWignerEngine::new(Arc::new(config()));
        let init = engine.parameter_init();
        let a = engine.calculate(&init, false).unwrap();
        let b = engine.calculate(&init, false).unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.n_evaluations(), 1);
    }

    #[test]
    fn test_non_physical_parameters() {
        let mut engine = BreitWignerEngine::new(Arc::new(config()));
        let mut p = engine.parameter_init();
        p[0] = -0.1;
        assert!(matches!(engine.calculate(&p, false), Err(Error::Engine(_))));
        p[0] = 0.42;
        p[4] = 0.0;
        assert!(matches!(engine.calculate(&p, false), Err(Error::Engine(_))));
    }

    #[test]
    fn test_factory_validation() {
        let mut bad = config();
        bad.levels[0].width = -1.0;
        assert!(BreitWignerFactory::new(bad).is_err());
        let empty = BreitWignerConfig { levels: vec![], grids: vec![], background: 0.0 };
        assert!(BreitWignerFactory::new(empty).is_err());
        assert!(BreitWignerFactory::new(config()).is_ok());
    }
}
