//! Measured cross-section data.
//!
//! A [`Dataset`] is either a list of named [`DataSegment`]s, each scaled by
//! its own normalization factor, or one [`CombinedData`] array scored without
//! normalization factors.

use std::path::Path;

use az_core::{Error, Result};
use serde::Serialize;

/// One experimental dataset: measured values and their uncertainties.
#[derive(Debug, Clone, Serialize)]
pub struct DataSegment {
    name: String,
    values: Vec<f64>,
    uncertainties: Vec<f64>,
}

impl DataSegment {
    /// Create a segment. `values` and `uncertainties` must have equal length.
    pub fn new(name: impl Into<String>, values: Vec<f64>, uncertainties: Vec<f64>) -> Result<Self> {
        let name = name.into();
        check_pairs(&name, &values, &uncertainties)?;
        Ok(Self { name, values, uncertainties })
    }

    /// Segment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Measured values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Measurement uncertainties.
    pub fn uncertainties(&self) -> &[f64] {
        &self.uncertainties
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if the segment has no points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// All data points concatenated into a single array.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedData {
    values: Vec<f64>,
    uncertainties: Vec<f64>,
}

impl CombinedData {
    /// Create from flat arrays of equal length.
    pub fn new(values: Vec<f64>, uncertainties: Vec<f64>) -> Result<Self> {
        check_pairs("combined", &values, &uncertainties)?;
        Ok(Self { values, uncertainties })
    }

    /// Concatenate segments in order.
    pub fn from_segments(segments: &[DataSegment]) -> Self {
        let values = segments.iter().flat_map(|s| s.values.iter().copied()).collect();
        let uncertainties = segments.iter().flat_map(|s| s.uncertainties.iter().copied()).collect();
        Self { values, uncertainties }
    }

    /// Measured values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Measurement uncertainties (never rescaled).
    pub fn uncertainties(&self) -> &[f64] {
        &self.uncertainties
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if there are no points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Data organization selecting the likelihood form.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dataset {
    /// Named segments, one normalization factor each.
    Segmented {
        /// Segments in engine output order.
        segments: Vec<DataSegment>,
    },
    /// One flat array, no normalization factors.
    Combined {
        /// Concatenated data.
        data: CombinedData,
    },
}

impl Dataset {
    /// Segmented dataset.
    pub fn segmented(segments: Vec<DataSegment>) -> Self {
        Self::Segmented { segments }
    }

    /// Combined dataset.
    pub fn combined(data: CombinedData) -> Self {
        Self::Combined { data }
    }

    /// Names of the segments that carry a normalization factor.
    pub fn norm_names(&self) -> Vec<String> {
        match self {
            Self::Segmented { segments } => segments.iter().map(|s| s.name.clone()).collect(),
            Self::Combined { .. } => Vec::new(),
        }
    }

    /// Total number of data points.
    pub fn total_points(&self) -> usize {
        match self {
            Self::Segmented { segments } => segments.iter().map(DataSegment::len).sum(),
            Self::Combined { data } => data.len(),
        }
    }
}

/// Column indices of a whitespace-separated data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Independent variable (energy or angle).
    pub grid: usize,
    /// Measured cross section.
    pub value: usize,
    /// Cross-section uncertainty.
    pub error: usize,
}

impl Default for ColumnSpec {
    /// Layout of the reaction code's output files: centre-of-mass energy in
    /// column 0, cross section in column 5, uncertainty in column 6.
    fn default() -> Self {
        Self { grid: 0, value: 5, error: 6 }
    }
}

/// Read a segment and its grid from a column file.
pub fn load_segment(
    path: impl AsRef<Path>,
    name: impl Into<String>,
    columns: ColumnSpec,
) -> Result<(Vec<f64>, DataSegment)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let name = name.into();
    parse_columns(&text, name, columns)
        .map_err(|e| Error::Validation(format!("{}: {}", path.display(), e)))
}

/// Parse whitespace-separated columns. Blank lines and `#` comments are skipped.
pub fn parse_columns(
    text: &str,
    name: impl Into<String>,
    columns: ColumnSpec,
) -> Result<(Vec<f64>, DataSegment)> {
    let width = columns.grid.max(columns.value).max(columns.error) + 1;
    let mut grid = Vec::new();
    let mut values = Vec::new();
    let mut uncertainties = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields = line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Validation(format!("line {}: {}", lineno + 1, e)))?;
        if fields.len() < width {
            return Err(Error::Validation(format!(
                "line {}: expected at least {} columns, got {}",
                lineno + 1,
                width,
                fields.len()
            )));
        }
        grid.push(fields[columns.grid]);
        values.push(fields[columns.value]);
        uncertainties.push(fields[columns.error]);
    }

    Ok((grid, DataSegment::new(name, values, uncertainties)?))
}

fn check_pairs(name: &str, values: &[f64], uncertainties: &[f64]) -> Result<()> {
    if values.len() != uncertainties.len() {
        return Err(Error::Validation(format!(
            "segment '{}': {} values but {} uncertainties",
            name,
            values.len(),
            uncertainties.len()
        )));
    }
    Ok(())
}
