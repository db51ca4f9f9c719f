//! Categorical → integer codes in first-appearance order.
//!
//! [`factorize`] is the plain per-call operation. [`Vocabulary`] freezes the code
//! assignment of a training run so inference encodes with the same code space.

use super::columns::Categorical;
use super::session::SessionTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Code for null values, and for values a frozen vocabulary has never seen.
pub const MISSING_CODE: i64 = -1;

/// Codes for `values` plus the distinct values in code order. Nulls get [`MISSING_CODE`].
pub fn factorize<'a, I>(values: I) -> (Vec<i64>, Vec<String>)
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut uniques: Vec<String> = Vec::new();
    let mut index: HashMap<&'a str, i64> = HashMap::new();
    let codes = values
        .into_iter()
        .map(|v| match v {
            None => MISSING_CODE,
            Some(s) => *index.entry(s).or_insert_with(|| {
                uniques.push(s.to_string());
                (uniques.len() - 1) as i64
            }),
        })
        .collect();
    (codes, uniques)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnVocabulary {
    values: Vec<String>,
    index: HashMap<String, i64>,
}

impl ColumnVocabulary {
    fn from_uniques(values: Vec<String>) -> Self {
        let index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i as i64))
            .collect();
        Self { values, index }
    }

    pub fn lookup(&self, value: &str) -> Option<i64> {
        self.index.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-column code spaces fitted on one session table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    columns: BTreeMap<Categorical, ColumnVocabulary>,
}

impl Vocabulary {
    pub fn fit(table: &SessionTable) -> Self {
        let columns = Categorical::ALL
            .into_iter()
            .map(|c| {
                let (_, uniques) = factorize(table.iter().map(|r| r.categorical(c)));
                (c, ColumnVocabulary::from_uniques(uniques))
            })
            .collect();
        tracing::info!("done factorizing sessions");
        Self { columns }
    }

    pub fn column(&self, column: Categorical) -> Option<&ColumnVocabulary> {
        self.columns.get(&column)
    }

    /// Code for a value, `None` when null or unseen at fit time.
    pub fn lookup(&self, column: Categorical, value: Option<&str>) -> Option<i64> {
        let value = value?;
        self.columns.get(&column)?.lookup(value)
    }

    pub fn encode(&self, column: Categorical, value: Option<&str>) -> i64 {
        self.lookup(column, value).unwrap_or(MISSING_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::session::SessionRecord;

    #[test]
    fn first_seen_order() {
        let (codes, uniques) = factorize(["a", "b", "a", "c"].into_iter().map(Some));
        assert_eq!(codes, vec![0, 1, 0, 2]);
        assert_eq!(uniques, vec!["a", "b", "c"]);
    }

    #[test]
    fn nulls_get_missing_code() {
        let (codes, uniques) = factorize(vec![None, Some("x"), None, Some("x")]);
        assert_eq!(codes, vec![MISSING_CODE, 0, MISSING_CODE, 0]);
        assert_eq!(uniques.len(), 1);
    }

    #[test]
    fn frozen_vocabulary_is_stable_across_tables() {
        let rec = |country: &str| {
            let mut r = SessionRecord::default();
            r.constants.insert(Categorical::IpCountry, country.into());
            r
        };
        let train = SessionTable::new(vec![rec("NL"), rec("US"), rec("NL")]);
        let vocab = Vocabulary::fit(&train);
        assert_eq!(vocab.encode(Categorical::IpCountry, Some("US")), 1);
        assert_eq!(vocab.encode(Categorical::IpCountry, Some("NL")), 0);
        assert_eq!(vocab.encode(Categorical::IpCountry, Some("CN")), MISSING_CODE);
        assert_eq!(vocab.encode(Categorical::IpCountry, None), MISSING_CODE);
        assert_eq!(vocab.column(Categorical::IpCountry).unwrap().lookup("US"), Some(1));
        assert!(vocab.column(Categorical::Sensor).unwrap().is_empty());
    }
}
