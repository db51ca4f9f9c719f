//! Recurrence classifier and its persisted artifact.

mod artifact;
mod forest;

pub use artifact::ModelArtifact;
pub use forest::BalancedForest;
