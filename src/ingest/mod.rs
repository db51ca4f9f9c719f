//! Event ingestion: load the JSON export and flatten it into a table.

mod flatten;
mod loader;

pub use flatten::{cell, flatten_record, FlatRow, FlatTable, Flattener};
pub use loader::load_events;
