//! Inference path: sessions from a new export scored by the persisted model.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::Preprocessor;
use crate::ingest::load_events;
use crate::model::{BalancedForest, ModelArtifact};
use crate::storage::ArtifactStore;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPrediction {
    pub session_id: String,
    pub ip: Option<String>,
    /// Fraction of trees voting "recurring"
    pub score: f64,
    pub label: usize,
}

/// Score every session in the export at `path`. The export is read, then the model
/// is loaded, so a missing model fails before any preprocessing work.
pub fn run_predictor(
    path: &Path,
    config: &PipelineConfig,
    save_data: bool,
) -> Result<Vec<SessionPrediction>> {
    let records = load_events(path)?;
    let artifact = ModelArtifact::load(&config.model_path)?;
    let store = ArtifactStore::new(&config.artifacts_dir, save_data);
    let preprocessor = Preprocessor::new(config, &store, false);
    let sessions = preprocessor.process_records(&records)?;
    let matrix = preprocessor.encode(&sessions, &artifact.schema, &artifact.vocabulary)?;

    let scores = artifact.forest.predict_scores(&matrix.values)?;
    let predictions: Vec<SessionPrediction> = sessions
        .iter()
        .zip(scores)
        .map(|(s, score)| SessionPrediction {
            session_id: s.session_id.clone(),
            ip: s.ip().map(str::to_string),
            score,
            label: BalancedForest::threshold(score),
        })
        .collect();

    for p in &predictions {
        tracing::debug!(session = %p.session_id, score = p.score, label = p.label, "prediction");
    }
    Ok(predictions)
}
