//! Recurrence label: 1 when a source IP shows up in more than one session.

use super::session::SessionTable;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelSummary {
    pub unique_ips: usize,
    pub positives: usize,
    pub negatives: usize,
}

/// Label every session. Must run while session ids are still present.
/// Sessions without an IP are labeled 0.
pub fn label_sessions(table: &mut SessionTable, progress_every: usize) -> LabelSummary {
    let mut sessions_by_ip: HashMap<&str, HashSet<&str>> = HashMap::new();
    for r in table.iter() {
        if let Some(ip) = r.ip() {
            sessions_by_ip
                .entry(ip)
                .or_default()
                .insert(r.session_id.as_str());
        }
    }
    let unique_ips = sessions_by_ip.len();
    tracing::info!(unique_ips, "number of unique ips");

    let recurring: HashSet<String> = sessions_by_ip
        .into_iter()
        .filter(|(_, sessions)| sessions.len() > 1)
        .map(|(ip, _)| ip.to_string())
        .collect();

    let mut summary = LabelSummary {
        unique_ips,
        ..Default::default()
    };
    for (i, r) in table.records_mut().iter_mut().enumerate() {
        if progress_every > 0 && i % progress_every == 0 {
            tracing::debug!(labeled = i, "labeling");
        }
        let label = u8::from(r.ip().is_some_and(|ip| recurring.contains(ip)));
        r.label = Some(label);
        if label == 1 {
            summary.positives += 1;
        } else {
            summary.negatives += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::columns::Categorical;
    use crate::features::session::SessionRecord;

    fn session(id: &str, ip: &str) -> SessionRecord {
        let mut r = SessionRecord {
            session_id: id.into(),
            ..Default::default()
        };
        r.constants.insert(Categorical::Ip, ip.into());
        r
    }

    #[test]
    fn recurring_ip_labels_all_its_sessions() {
        let mut t = SessionTable::new(vec![
            session("s1", "1.2.3.4"),
            session("s2", "5.6.7.8"),
            session("s3", "1.2.3.4"),
        ]);
        let summary = label_sessions(&mut t, 100);
        let labels: Vec<Option<u8>> = t.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![Some(1), Some(0), Some(1)]);
        assert_eq!(
            summary,
            LabelSummary {
                unique_ips: 2,
                positives: 2,
                negatives: 1
            }
        );
    }

    #[test]
    fn duplicate_session_id_is_not_recurrence() {
        let mut t = SessionTable::new(vec![session("s1", "1.2.3.4"), session("s1", "1.2.3.4")]);
        label_sessions(&mut t, 0);
        assert!(t.iter().all(|r| r.label == Some(0)));
    }
}
