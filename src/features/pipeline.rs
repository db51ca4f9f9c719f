//! Preprocessing pipeline: events → flat table → pruned → sessions → (labels) → matrix.

use super::aggregate::SessionAggregator;
use super::factorize::Vocabulary;
use super::label::label_sessions;
use super::matrix::{FeatureMatrix, FeatureSchema};
use super::prune::{binarize_uptime, prune};
use super::session::SessionTable;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::ingest::{load_events, Flattener};
use crate::storage::ArtifactStore;
use serde_json::Value;
use std::path::Path;

pub struct Preprocessor<'a> {
    config: &'a PipelineConfig,
    store: &'a ArtifactStore,
    add_label: bool,
}

impl<'a> Preprocessor<'a> {
    pub fn new(config: &'a PipelineConfig, store: &'a ArtifactStore, add_label: bool) -> Self {
        Self {
            config,
            store,
            add_label,
        }
    }

    /// Load the export at `path` and aggregate it into (optionally labeled) sessions.
    pub fn process(&self, path: &Path) -> Result<SessionTable> {
        let records = load_events(path)?;
        self.process_records(&records)
    }

    pub fn process_records(&self, records: &[Value]) -> Result<SessionTable> {
        let mut flat = Flattener::new(self.config.ingest.chunk_size).flatten(records, self.store)?;
        prune(&mut flat);
        binarize_uptime(&mut flat);

        let mut sessions =
            SessionAggregator::new(self.config.aggregate.clone()).aggregate(&flat, self.store)?;
        sessions.retain_complete();

        if self.add_label {
            tracing::info!("starting add label");
            let summary = label_sessions(&mut sessions, self.config.aggregate.progress_every);
            tracing::info!(
                positives = summary.positives,
                negatives = summary.negatives,
                "finished add label"
            );
        }
        Ok(sessions)
    }

    /// Encode sessions onto a schema and vocabulary; persisted as `factorized`.
    pub fn encode(
        &self,
        sessions: &SessionTable,
        schema: &FeatureSchema,
        vocabulary: &Vocabulary,
    ) -> Result<FeatureMatrix> {
        let matrix = FeatureMatrix::build(sessions, schema, vocabulary);
        if self.store.save("factorized", &matrix)?.is_some() {
            tracing::info!("saved factorized data");
        }
        Ok(matrix)
    }
}
