//! JSON run configuration: engine levels, data segments, priors.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use az_inference::data::{ColumnSpec, load_segment};
use az_inference::{
    BreitWignerConfig, BreitWignerFactory, CombinedData, DataSegment, Dataset, Level, Likelihood,
    Prior, PriorSet, SolverPool,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub engine: EngineSection,
    /// Add the engine background to every prediction.
    #[serde(default)]
    pub dress_up: bool,
    /// Score all segments as one flat array without normalization factors.
    #[serde(default)]
    pub combined: bool,
    pub segments: Vec<SegmentSource>,
    /// One prior per sampled parameter. Omitted means flat everywhere.
    #[serde(default)]
    pub priors: Option<Vec<Prior>>,
    /// Rayon threads (0 = auto). The command-line flag wins when given.
    #[serde(default)]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    pub levels: Vec<Level>,
    #[serde(default)]
    pub background: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SegmentSource {
    Inline {
        name: String,
        energies: Vec<f64>,
        values: Vec<f64>,
        uncertainties: Vec<f64>,
    },
    File {
        name: String,
        /// Relative paths resolve against the config file's directory.
        file: PathBuf,
        #[serde(default)]
        grid_col: Option<usize>,
        #[serde(default)]
        value_col: Option<usize>,
        #[serde(default)]
        err_col: Option<usize>,
    },
}

impl SegmentSource {
    fn load(&self, base_dir: &Path) -> Result<(Vec<f64>, DataSegment)> {
        match self {
            Self::Inline { name, energies, values, uncertainties } => {
                if energies.len() != values.len() {
                    anyhow::bail!(
                        "segment '{}': {} energies but {} values",
                        name,
                        energies.len(),
                        values.len()
                    );
                }
                let seg = DataSegment::new(name.clone(), values.clone(), uncertainties.clone())?;
                Ok((energies.clone(), seg))
            }
            Self::File { name, file, grid_col, value_col, err_col } => {
                let defaults = ColumnSpec::default();
                let columns = ColumnSpec {
                    grid: grid_col.unwrap_or(defaults.grid),
                    value: value_col.unwrap_or(defaults.value),
                    error: err_col.unwrap_or(defaults.error),
                };
                let path = if file.is_absolute() { file.clone() } else { base_dir.join(file) };
                tracing::info!(segment = %name, path = %path.display(), "loading data file");
                Ok(load_segment(&path, name.clone(), columns)?)
            }
        }
    }
}

/// Everything needed to build a posterior: the likelihood owns the engine pool.
pub struct Problem {
    pub likelihood: Likelihood<BreitWignerFactory>,
    pub priors: PriorSet,
}

/// Theta vectors to evaluate, positional or by name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParamsInput {
    Vector(Vec<f64>),
    Named(HashMap<String, f64>),
}

pub fn read_run_config(path: &Path) -> Result<RunConfig> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: RunConfig =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

/// Parse a params file: a single vector/object or a list of them.
pub fn read_params(path: &Path) -> Result<Vec<ParamsInput>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    let batch = match &value {
        serde_json::Value::Array(items) if items.iter().all(|v| !v.is_number()) => {
            serde_json::from_value(value)?
        }
        _ => vec![serde_json::from_value(value)?],
    };
    Ok(batch)
}

impl RunConfig {
    pub fn build(&self, base_dir: &Path) -> Result<Problem> {
        if self.segments.is_empty() {
            anyhow::bail!("at least one data segment is required");
        }

        let mut grids = Vec::with_capacity(self.segments.len());
        let mut segments = Vec::with_capacity(self.segments.len());
        for source in &self.segments {
            let (grid, segment) = source.load(base_dir)?;
            grids.push(grid);
            segments.push(segment);
        }

        let factory = BreitWignerFactory::new(BreitWignerConfig {
            levels: self.engine.levels.clone(),
            grids,
            background: self.engine.background,
        })?;
        let solver = SolverPool::new(factory)?.with_dress_up(self.dress_up);

        let data = if self.combined {
            Dataset::combined(CombinedData::from_segments(&segments))
        } else {
            Dataset::segmented(segments)
        };
        let likelihood = Likelihood::new(solver, data)?;

        let dim = likelihood.parameters().dim();
        let priors = match &self.priors {
            Some(p) => PriorSet::new(p.clone())?,
            None => PriorSet::flat(dim),
        };
        tracing::info!(
            parameters = dim,
            points = likelihood.data().total_points(),
            "posterior configured"
        );
        Ok(Problem { likelihood, priors })
    }
}
