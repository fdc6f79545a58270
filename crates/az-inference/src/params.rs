//! Layout of the sampled parameter vector.
//!
//! The vector seen by drivers is `[physics..., norm_0, norm_1, ...]`: the
//! engine's native physics parameters followed by one multiplicative
//! normalization factor per data segment.

use std::collections::HashMap;

use az_core::{Error, Result};

/// Initial value of every normalization factor.
pub const NORM_INIT: f64 = 1.0;

/// Ordered parameter names with a name-to-index table built once.
#[derive(Debug, Clone)]
pub struct ParameterModel {
    names: Vec<String>,
    index: HashMap<String, usize>,
    n_physics: usize,
}

impl ParameterModel {
    /// Layout with one `norm_{segment}` factor appended per segment.
    pub fn new(physics_names: Vec<String>, segment_names: &[String]) -> Result<Self> {
        let n_physics = physics_names.len();
        let mut names = physics_names;
        names.extend(segment_names.iter().map(|s| format!("norm_{s}")));

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(Error::Validation(format!("duplicate parameter name '{}'", name)));
            }
        }

        Ok(Self { names, index, n_physics })
    }

    /// Layout without normalization factors (combined dataset).
    pub fn physics_only(physics_names: Vec<String>) -> Result<Self> {
        Self::new(physics_names, &[])
    }

    /// Total number of sampled parameters.
    pub fn dim(&self) -> usize {
        self.names.len()
    }

    /// Number of physics parameters.
    pub fn n_physics(&self) -> usize {
        self.n_physics
    }

    /// Number of normalization factors.
    pub fn n_norms(&self) -> usize {
        self.names.len() - self.n_physics
    }

    /// Parameter names (stable order).
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of `name`, if it exists.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// `true` if index `i` is a normalization factor.
    pub fn is_norm(&self, i: usize) -> bool {
        i >= self.n_physics && i < self.names.len()
    }

    /// Full starting vector: `physics_init` followed by `1.0` per segment.
    pub fn initial(&self, physics_init: &[f64]) -> Result<Vec<f64>> {
        if physics_init.len() != self.n_physics {
            return Err(Error::Validation(format!(
                "expected {} physics initial values, got {}",
                self.n_physics,
                physics_init.len()
            )));
        }
        let mut theta = physics_init.to_vec();
        theta.resize(self.dim(), NORM_INIT);
        Ok(theta)
    }

    /// Split a full vector into `(physics, norms)`.
    pub fn split<'t>(&self, theta: &'t [f64]) -> Result<(&'t [f64], &'t [f64])> {
        self.check_len(theta)?;
        Ok(theta.split_at(self.n_physics))
    }

    /// Fail unless `theta` has exactly [`Self::dim`] entries.
    pub fn check_len(&self, theta: &[f64]) -> Result<()> {
        if theta.len() != self.dim() {
            return Err(Error::Validation(format!(
                "parameter vector length mismatch: expected {} ({} physics + {} norms), got {}",
                self.dim(),
                self.n_physics,
                self.n_norms(),
                theta.len()
            )));
        }
        Ok(())
    }

    /// Ordered vector from a name-to-value mapping.
    ///
    /// Every parameter must be present and no unknown names are accepted.
    pub fn vector_from_named(&self, values: &HashMap<String, f64>) -> Result<Vec<f64>> {
        if let Some(unknown) = values.keys().find(|k| !self.index.contains_key(k.as_str())) {
            return Err(Error::Validation(format!("unknown parameter '{}'", unknown)));
        }
        self.names
            .iter()
            .map(|name| {
                values
                    .get(name)
                    .copied()
                    .ok_or_else(|| Error::Validation(format!("missing parameter '{}'", name)))
            })
            .collect()
    }
}
