//! Per-session records produced by aggregation.

use super::columns::{Categorical, EventType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Event-id counts for one session. Known ids use fixed slots; anything else is
/// counted by name so the per-session total always equals the counted rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    known: [u32; 13],
    extra: BTreeMap<String, u32>,
}

impl EventCounts {
    pub fn record(&mut self, event_id: &str) {
        match EventType::from_id(event_id) {
            Some(t) => self.known[t.index()] += 1,
            None => *self.extra.entry(event_id.to_string()).or_insert(0) += 1,
        }
    }

    pub fn get(&self, event: EventType) -> u32 {
        self.known[event.index()]
    }

    /// Count by raw event id, known or not.
    pub fn get_id(&self, event_id: &str) -> u32 {
        match EventType::from_id(event_id) {
            Some(t) => self.get(t),
            None => self.extra.get(event_id).copied().unwrap_or(0),
        }
    }

    pub fn extra(&self) -> &BTreeMap<String, u32> {
        &self.extra
    }

    pub fn total(&self) -> u32 {
        self.known.iter().sum::<u32>() + self.extra.values().sum::<u32>()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    /// Session-constant categorical values; absent key = null
    pub constants: BTreeMap<Categorical, String>,
    /// 1 if the source uptime was known
    pub uptime_known: u8,
    pub brute_force: i64,
    pub events: EventCounts,
    /// Event messages joined with `\n` in row order
    pub message: String,
    pub label: Option<u8>,
}

impl SessionRecord {
    pub fn categorical(&self, column: Categorical) -> Option<&str> {
        match column {
            Categorical::Message => Some(self.message.as_str()),
            other => self.constants.get(&other).map(String::as_str),
        }
    }

    pub fn ip(&self) -> Option<&str> {
        self.categorical(Categorical::Ip)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionTable {
    records: Vec<SessionRecord>,
}

impl SessionTable {
    pub fn new(records: Vec<SessionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [SessionRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    /// Event ids outside [`EventType`] seen in any session, sorted.
    pub fn extra_event_ids(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|r| r.events.extra().keys().cloned())
            .collect()
    }

    /// Drop sessions missing a source IP. Returns how many were dropped.
    pub fn retain_complete(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.ip().is_some());
        let dropped = before - self.records.len();
        if dropped > 0 {
            tracing::warn!(dropped, "dropped sessions without source ip");
        }
        dropped
    }

    /// Labels as class indices; `None` if any session is unlabeled.
    pub fn labels(&self) -> Option<Vec<usize>> {
        self.records
            .iter()
            .map(|r| r.label.map(usize::from))
            .collect()
    }
}
