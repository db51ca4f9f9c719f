//! Binary artifact persistence for intermediate tables, splits and the model.

mod artifacts;

pub use artifacts::{read_bincode, write_bincode, ArtifactStore};
