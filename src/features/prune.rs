//! Row/column pruning and the uptime presence flag.

use super::columns::{PRUNED_COLUMNS, SESSION_COLUMN, UPTIME_COLUMN};
use crate::ingest::{cell, FlatTable};
use serde_json::Value;

/// Drop rows without a session id and every column in [`PRUNED_COLUMNS`] that is present.
pub fn prune(table: &mut FlatTable) {
    let before = table.len();
    table.retain_rows(|row| cell(row, SESSION_COLUMN).is_some());
    let dropped_cols = PRUNED_COLUMNS
        .iter()
        .filter(|c| table.drop_column(c))
        .count();
    tracing::info!(
        rows_dropped = before - table.len(),
        columns_dropped = dropped_cols,
        "pruned flat table"
    );
}

/// Replace source uptime with 1 when known and 0 when missing.
pub fn binarize_uptime(table: &mut FlatTable) {
    table.map_column(UPTIME_COLUMN, |v| Value::from(u8::from(v.is_some())));
}
