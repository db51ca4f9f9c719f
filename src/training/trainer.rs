//! Training run: preprocess, freeze schema and vocabulary, split by IP, fit, evaluate.

use super::metrics::{evaluate, Metrics};
use super::split::split_by_ip;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::features::{FeatureSchema, Preprocessor, Vocabulary};
use crate::model::{BalancedForest, ModelArtifact};
use crate::storage::ArtifactStore;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    pub save_model: bool,
    /// Persist intermediate tables and the train/test splits
    pub save_data: bool,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            save_model: true,
            save_data: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub positives: usize,
    pub negatives: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_ips: usize,
    pub test_ips: usize,
    pub metrics: Metrics,
    pub schema_fingerprint: String,
    pub model_path: Option<PathBuf>,
}

fn pick(labels: &[usize], rows: &[usize]) -> Vec<usize> {
    rows.iter().map(|&i| labels[i]).collect()
}

pub fn run_trainer(path: &Path, config: &PipelineConfig, options: TrainOptions) -> Result<TrainReport> {
    let store = ArtifactStore::new(&config.artifacts_dir, options.save_data);
    let preprocessor = Preprocessor::new(config, &store, true);
    let sessions = preprocessor.process(path)?;
    let labels = sessions
        .labels()
        .ok_or_else(|| PipelineError::Model("sessions were not labeled".to_string()))?;

    let positives = labels.iter().filter(|&&l| l == 1).count();
    let negatives = labels.len() - positives;
    info!(positives, negatives, "class balance");

    let schema = FeatureSchema::fit(&sessions);
    let vocabulary = Vocabulary::fit(&sessions);
    let matrix = preprocessor.encode(&sessions, &schema, &vocabulary)?;

    let split = split_by_ip(&sessions, &config.split)?;
    let x_train = matrix.select_rows(&split.train);
    let y_train = pick(&labels, &split.train);
    let x_test = matrix.select_rows(&split.test);
    let y_test = pick(&labels, &split.test);

    store.save("x_train", &x_train)?;
    store.save("y_train", &y_train)?;
    store.save("x_test", &x_test)?;
    store.save("y_test", &y_test)?;
    info!(
        x_train = x_train.nrows(),
        y_train = y_train.len(),
        x_test = x_test.nrows(),
        y_test = y_test.len(),
        "split by ip"
    );

    let forest = BalancedForest::fit(&x_train.values, &y_train, &config.forest)?;
    let predicted = forest.predict(&x_test.values)?;
    let metrics = evaluate(&y_test, &predicted);
    info!(
        precision = metrics.precision,
        recall = metrics.recall,
        false_positives = metrics.false_positives,
        false_positive_rate = metrics.false_positive_rate,
        "evaluated on test split"
    );

    let schema_fingerprint = schema.fingerprint();
    let model_path = if options.save_model {
        ModelArtifact::new(schema, vocabulary, forest).save(&config.model_path)?;
        Some(config.model_path.clone())
    } else {
        None
    };

    Ok(TrainReport {
        positives,
        negatives,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        train_ips: split.train_ips,
        test_ips: split.test_ips,
        metrics,
        schema_fingerprint,
        model_path,
    })
}
