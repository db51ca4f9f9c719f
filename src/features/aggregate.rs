//! Session aggregation: flat event rows → one record per session id.

use super::columns::{
    Categorical, BRUTE_FORCE_COLUMN, EVENT_ID_COLUMN, MESSAGE_COLUMN, SESSION_COLUMN,
    UPTIME_COLUMN,
};
use super::session::{EventCounts, SessionRecord, SessionTable};
use crate::config::{AggregateConfig, ConstantFold};
use crate::error::{PipelineError, Result};
use crate::ingest::{cell, FlatRow, FlatTable};
use crate::storage::ArtifactStore;
use serde_json::Value;
use std::collections::HashMap;

/// Render a cell as text: strings verbatim, anything else as compact JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn brute_force_flag(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Bool(b)) => i64::from(*b),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Row indices grouped by session id, in first-appearance order.
fn group_sessions(table: &FlatTable) -> Vec<(String, Vec<usize>)> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        let Some(id) = cell(row, SESSION_COLUMN) else {
            continue;
        };
        let id = value_text(id);
        match index.get(&id) {
            Some(&g) => groups[g].1.push(i),
            None => {
                index.insert(id.clone(), groups.len());
                groups.push((id, vec![i]));
            }
        }
    }
    groups
}

#[derive(Debug, Clone, Default)]
struct AggregateStats {
    sessions: usize,
    rows: usize,
    /// Session-constant columns whose non-null values disagreed within a session
    conflicts: usize,
    /// Rows without an event id (not counted in any event column)
    untyped_rows: usize,
}

pub struct SessionAggregator {
    config: AggregateConfig,
}

impl SessionAggregator {
    pub fn new(config: AggregateConfig) -> Self {
        Self { config }
    }

    /// Fold one session-constant column. Returns the chosen value and whether the
    /// session's non-null values disagreed.
    fn fold<'a>(
        &self,
        session: &str,
        column: &str,
        rows: &[&'a FlatRow],
    ) -> Result<(Option<&'a Value>, bool)> {
        let chosen = match self.config.fold {
            ConstantFold::First => rows.first().and_then(|r| cell(*r, column)),
            ConstantFold::FirstNonNull | ConstantFold::Strict => {
                rows.iter().find_map(|r| cell(*r, column))
            }
        };
        let conflict = match chosen {
            Some(v) => rows.iter().filter_map(|r| cell(r, column)).any(|o| o != v),
            None => false,
        };
        if conflict && self.config.fold == ConstantFold::Strict {
            return Err(PipelineError::SessionConflict {
                session: session.to_string(),
                column: column.to_string(),
            });
        }
        Ok((chosen, conflict))
    }

    /// The binarized uptime column holds 0 where the source value was null, so a
    /// 0 never counts as a disagreement. `first` reads the first row only; the
    /// other rules report uptime as known when any row carried it.
    fn fold_uptime(&self, rows: &[&FlatRow]) -> u8 {
        let known = |row: &&FlatRow| {
            cell(row, UPTIME_COLUMN)
                .and_then(Value::as_u64)
                .is_some_and(|v| v > 0)
        };
        let any_known = match self.config.fold {
            ConstantFold::First => rows.first().is_some_and(known),
            ConstantFold::FirstNonNull | ConstantFold::Strict => rows.iter().any(known),
        };
        u8::from(any_known)
    }

    fn build_record(
        &self,
        session_id: String,
        rows: &[&FlatRow],
        stats: &mut AggregateStats,
    ) -> Result<SessionRecord> {
        let mut record = SessionRecord {
            session_id,
            ..Default::default()
        };

        for column in Categorical::ALL.into_iter().filter(|c| c.is_session_constant()) {
            let (value, conflict) = self.fold(&record.session_id, column.column(), rows)?;
            stats.conflicts += usize::from(conflict);
            if let Some(v) = value {
                record.constants.insert(column, value_text(v));
            }
        }

        record.uptime_known = self.fold_uptime(rows);

        let (bf, conflict) = self.fold(&record.session_id, BRUTE_FORCE_COLUMN, rows)?;
        stats.conflicts += usize::from(conflict);
        record.brute_force = brute_force_flag(bf);

        let mut events = EventCounts::default();
        let mut messages: Vec<String> = Vec::new();
        for row in rows {
            match cell(row, EVENT_ID_COLUMN) {
                Some(id) => events.record(&value_text(id)),
                None => stats.untyped_rows += 1,
            }
            if let Some(m) = cell(row, MESSAGE_COLUMN) {
                messages.push(value_text(m));
            }
        }
        record.events = events;
        record.message = messages.join("\n");
        Ok(record)
    }

    /// Aggregate a pruned, binarized flat table. Output has exactly one record per
    /// distinct non-null session id, in first-appearance order.
    pub fn aggregate(&self, table: &FlatTable, store: &ArtifactStore) -> Result<SessionTable> {
        let groups = group_sessions(table);
        tracing::info!(sessions = groups.len(), "number of unique session ids");

        let mut stats = AggregateStats::default();
        let mut records: Vec<SessionRecord> = Vec::with_capacity(groups.len());
        for (session_id, indices) in groups {
            let rows: Vec<&FlatRow> = indices.iter().map(|&i| &table.rows()[i]).collect();
            stats.rows += rows.len();

            if self.config.progress_every > 0 && records.len() % self.config.progress_every == 0 {
                tracing::info!(processed = records.len(), session = %session_id, "aggregating");
            }
            records.push(self.build_record(session_id, &rows, &mut stats)?);

            let n = records.len();
            if store.is_enabled() && self.config.snapshot_every > 0 && n % self.config.snapshot_every == 0 {
                store.save(&format!("sessions_{}", n), &records)?;
            }
        }
        stats.sessions = records.len();

        if stats.conflicts > 0 {
            tracing::warn!(
                conflicts = stats.conflicts,
                fold = ?self.config.fold,
                "session-constant columns disagreed within sessions"
            );
        }
        tracing::info!(
            sessions = stats.sessions,
            rows = stats.rows,
            untyped_rows = stats.untyped_rows,
            "aggregated sessions"
        );

        let sessions = SessionTable::new(records);
        store.save("sessions", &sessions)?;
        Ok(sessions)
    }
}
