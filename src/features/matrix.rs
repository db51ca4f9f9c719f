//! Numeric feature matrix with a frozen, fingerprinted column schema.

use super::columns::{Categorical, EventType};
use super::factorize::{Vocabulary, MISSING_CODE};
use super::session::{SessionRecord, SessionTable};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureColumn {
    Categorical(Categorical),
    UptimeKnown,
    BruteForce,
    Event(EventType),
    /// Event id outside [`EventType`] observed when the schema was fitted
    ExtraEvent(String),
}

impl FeatureColumn {
    pub fn name(&self) -> &str {
        match self {
            FeatureColumn::Categorical(c) => c.column(),
            FeatureColumn::UptimeKnown => super::columns::UPTIME_COLUMN,
            FeatureColumn::BruteForce => super::columns::BRUTE_FORCE_COLUMN,
            FeatureColumn::Event(e) => e.as_str(),
            FeatureColumn::ExtraEvent(id) => id.as_str(),
        }
    }

    fn value(&self, record: &SessionRecord, vocabulary: &Vocabulary) -> f64 {
        match self {
            FeatureColumn::Categorical(c) => vocabulary.encode(*c, record.categorical(*c)) as f64,
            FeatureColumn::UptimeKnown => f64::from(record.uptime_known),
            FeatureColumn::BruteForce => record.brute_force as f64,
            FeatureColumn::Event(e) => f64::from(record.events.get(*e)),
            FeatureColumn::ExtraEvent(id) => f64::from(record.events.get_id(id)),
        }
    }
}

/// Model input columns. Identifier columns (`ip`, `data.src_ip`) are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    /// Fixed columns plus every extra event id present in `table`.
    pub fn fit(table: &SessionTable) -> Self {
        let mut columns: Vec<FeatureColumn> = Categorical::ALL
            .into_iter()
            .filter(|c| !c.is_identifier())
            .map(FeatureColumn::Categorical)
            .collect();
        columns.push(FeatureColumn::UptimeKnown);
        columns.push(FeatureColumn::BruteForce);
        columns.extend(EventType::ALL.into_iter().map(FeatureColumn::Event));
        columns.extend(table.extra_event_ids().into_iter().map(FeatureColumn::ExtraEvent));
        Self { columns }
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    /// SHA-256 over the ordered column names; identifies the schema version.
    pub fn fingerprint(&self) -> String {
        let mut h = Sha256::new();
        for c in &self.columns {
            h.update(c.name().as_bytes());
            h.update(b"\n");
        }
        format!("{:x}", h.finalize())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl FeatureMatrix {
    /// Encode `table` onto `schema`. Extra event ids unknown to the schema are dropped.
    pub fn build(table: &SessionTable, schema: &FeatureSchema, vocabulary: &Vocabulary) -> Self {
        let mut values = Array2::<f64>::zeros((table.len(), schema.len()));
        for (i, record) in table.iter().enumerate() {
            for (j, column) in schema.columns().iter().enumerate() {
                values[[i, j]] = column.value(record, vocabulary);
            }
        }

        let unseen = schema
            .columns()
            .iter()
            .filter_map(|c| match c {
                FeatureColumn::Categorical(c) => Some(*c),
                _ => None,
            })
            .map(|c| {
                table
                    .iter()
                    .filter(|r| r.categorical(c).is_some() && vocabulary.lookup(c, r.categorical(c)).is_none())
                    .count()
            })
            .sum::<usize>();
        let dropped_extra = table
            .extra_event_ids()
            .into_iter()
            .filter(|id| !schema.columns().contains(&FeatureColumn::ExtraEvent(id.clone())))
            .count();
        if unseen > 0 || dropped_extra > 0 {
            tracing::debug!(
                unseen_values = unseen,
                missing_code = MISSING_CODE,
                dropped_event_ids = dropped_extra,
                "encoded sessions outside the fitted vocabulary"
            );
        }

        Self {
            columns: schema.names(),
            values,
        }
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), rows),
        }
    }
}
