//! Pipeline configuration. Artifact locations and tuning knobs are passed to each
//! component explicitly; nothing reads module-level path constants.

use serde::{Deserialize, Serialize};
use crate::error::Result;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory for intermediate artifacts (chunks, session tables, splits)
    pub artifacts_dir: PathBuf,
    /// Serialized model artifact (forest + schema + vocabulary)
    pub model_path: PathBuf,
    /// Loading and flattening
    pub ingest: IngestConfig,
    /// Session aggregation
    pub aggregate: AggregateConfig,
    /// Train/test split by source IP
    pub split: SplitConfig,
    /// Balanced forest parameters
    pub forest: ForestConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Records flattened per chunk; bounds peak memory of the flattening stage
    pub chunk_size: usize,
}

/// How a session-constant column is folded from the session's event rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantFold {
    /// Value of the session's first event row, null included
    First,
    /// First non-null value in event order
    FirstNonNull,
    /// First non-null value; any other non-null value that differs is an error
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Snapshot the session table every N sessions when artifacts are enabled (0 = never)
    pub snapshot_every: usize,
    /// Progress log interval (sessions / IPs)
    pub progress_every: usize,
    pub fold: ConstantFold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of unique IPs held out for testing
    pub test_fraction: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("artifacts"),
            model_path: PathBuf::from("artifacts/model.bin"),
            ingest: IngestConfig::default(),
            aggregate: AggregateConfig::default(),
            split: SplitConfig::default(),
            forest: ForestConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { chunk_size: 10_000 }
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            snapshot_every: 100,
            progress_every: 100,
            fold: ConstantFold::FirstNonNull,
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.33,
            seed: 42,
        }
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 16,
            min_samples_leaf: 1,
            min_samples_split: 2,
            seed: 4,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PipelineConfig {
    /// Load from JSON file if present; otherwise return default. A file that
    /// exists but does not parse is an error.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
