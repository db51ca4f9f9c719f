//! Trained model bundle: forest plus the schema and vocabulary it was fitted against.

use super::forest::BalancedForest;
use crate::error::{PipelineError, Result};
use crate::features::{FeatureSchema, Vocabulary};
use crate::storage::{read_bincode, write_bincode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema: FeatureSchema,
    pub vocabulary: Vocabulary,
    pub forest: BalancedForest,
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    pub fn new(schema: FeatureSchema, vocabulary: Vocabulary, forest: BalancedForest) -> Self {
        Self {
            schema,
            vocabulary,
            forest,
            trained_at: Utc::now(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_bincode(path, self)?;
        tracing::info!(
            path = %path.display(),
            schema = %self.schema.fingerprint(),
            "saved model"
        );
        Ok(())
    }

    /// Load from `path`; a missing file is [`PipelineError::ModelMissing`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::ModelMissing(path.to_path_buf()));
        }
        let artifact: Self = read_bincode(path)?;
        tracing::info!(
            path = %path.display(),
            trees = artifact.forest.n_trees(),
            schema = %artifact.schema.fingerprint(),
            trained_at = %artifact.trained_at,
            "loaded model"
        );
        Ok(artifact)
    }
}
