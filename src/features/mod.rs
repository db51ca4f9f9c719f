//! Session feature engineering: pruning, aggregation, labeling and encoding.

mod aggregate;
mod columns;
mod factorize;
mod label;
mod matrix;
mod pipeline;
mod prune;
mod session;

pub use aggregate::SessionAggregator;
pub use columns::{
    Categorical, EventType, BRUTE_FORCE_COLUMN, EVENT_ID_COLUMN, MESSAGE_COLUMN, PRUNED_COLUMNS,
    SESSION_COLUMN, UPTIME_COLUMN,
};
pub use factorize::{factorize, ColumnVocabulary, Vocabulary, MISSING_CODE};
pub use label::{label_sessions, LabelSummary};
pub use matrix::{FeatureColumn, FeatureMatrix, FeatureSchema};
pub use pipeline::Preprocessor;
pub use prune::{binarize_uptime, prune};
pub use session::{EventCounts, SessionRecord, SessionTable};
