//! Honeypot recurrence: predicts whether an attacker's source IP will return.
//!
//! Modular structure:
//! - [`ingest`] — JSON export loading and chunked flattening
//! - [`features`] — Pruning, session aggregation, labeling, categorical encoding
//! - [`model`] — Balanced decision-tree ensemble and its persisted artifact
//! - [`training`] — IP-grouped split, fitting and evaluation
//! - [`predict`] — Scoring new sessions with a trained artifact
//! - [`storage`] — Binary artifact directory
//! - [`logging`] — Tracing setup

pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod predict;
pub mod storage;
pub mod training;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use features::{FeatureMatrix, Preprocessor, SessionRecord, SessionTable};
pub use logging::StructuredLogger;
pub use model::{BalancedForest, ModelArtifact};
pub use predict::{run_predictor, SessionPrediction};
pub use storage::ArtifactStore;
pub use training::{run_trainer, TrainOptions, TrainReport};
