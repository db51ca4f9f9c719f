//! Nested event JSON → flat rows keyed by dotted paths, processed in fixed-size chunks.

use crate::error::{PipelineError, Result};
use crate::storage::ArtifactStore;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One event with nested objects collapsed to dotted keys (`data.sensor_geo.$binary.base64`).
pub type FlatRow = BTreeMap<String, Value>;

/// Cell lookup treating JSON null and an absent key alike.
pub fn cell<'a>(row: &'a FlatRow, column: &str) -> Option<&'a Value> {
    row.get(column).filter(|v| !v.is_null())
}

/// Flat event table. The column list is the union of keys over all rows, in
/// first-seen order; rows keep input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlatTable {
    columns: Vec<String>,
    rows: Vec<FlatRow>,
}

impl FlatTable {
    pub fn from_rows(rows: Vec<FlatRow>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| cell(r, column))
    }

    /// Concatenate another table below this one (column union).
    pub fn append(&mut self, other: FlatTable) {
        for c in other.columns {
            if !self.has_column(&c) {
                self.columns.push(c);
            }
        }
        self.rows.extend(other.rows);
    }

    pub fn retain_rows(&mut self, f: impl FnMut(&FlatRow) -> bool) {
        self.rows.retain(f);
    }

    /// Remove a column from the schema and every row. Returns false if it was absent.
    pub fn drop_column(&mut self, column: &str) -> bool {
        let Some(pos) = self.columns.iter().position(|c| c == column) else {
            return false;
        };
        self.columns.remove(pos);
        for row in &mut self.rows {
            row.remove(column);
        }
        true
    }

    /// Overwrite `column` in every row with `f(current value)`; adds the column if absent.
    pub fn map_column(&mut self, column: &str, mut f: impl FnMut(Option<&Value>) -> Value) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
        for row in &mut self.rows {
            let next = f(cell(row, column));
            row.insert(column.to_string(), next);
        }
    }
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut FlatRow) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(&path, inner, out),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

/// Flatten a single event object. Arrays and scalars are kept as leaf values.
pub fn flatten_record(record: &Value) -> Result<FlatRow> {
    let Value::Object(map) = record else {
        return Err(PipelineError::MalformedInput(format!(
            "event record is not an object: {}",
            record
        )));
    };
    let mut row = FlatRow::new();
    flatten_into("", map, &mut row);
    Ok(row)
}

pub struct Flattener {
    chunk_size: usize,
}

impl Flattener {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Flatten `records` chunk by chunk and concatenate. Each chunk is persisted as
    /// `flat_chunk_<i>` when the store is enabled.
    pub fn flatten(&self, records: &[Value], store: &ArtifactStore) -> Result<FlatTable> {
        let mut table = FlatTable::default();
        for (i, chunk) in records.chunks(self.chunk_size).enumerate() {
            let rows = chunk
                .iter()
                .map(flatten_record)
                .collect::<Result<Vec<_>>>()?;
            let flat = FlatTable::from_rows(rows);
            tracing::debug!(chunk = i, rows = flat.len(), "flattened chunk");
            store.save(&format!("flat_chunk_{}", i), &flat)?;
            table.append(flat);
        }
        tracing::info!(rows = table.len(), columns = table.columns().len(), "flattened events");
        Ok(table)
    }
}
