//! Train/test split over unique source IPs, so one IP never lands on both sides.

use crate::config::SplitConfig;
use crate::error::{PipelineError, Result};
use crate::features::SessionTable;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;

/// Session row indices per side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
    pub train_ips: usize,
    pub test_ips: usize,
}

/// Shuffle unique IPs with `config.seed` and hold out `ceil(test_fraction * n)` of them
/// (at least one on each side). Sessions without an IP are left out of both sides.
pub fn split_by_ip(sessions: &SessionTable, config: &SplitConfig) -> Result<IpSplit> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ips: Vec<&str> = sessions
        .iter()
        .filter_map(|r| r.ip())
        .filter(|ip| seen.insert(ip))
        .collect();
    if ips.len() < 2 {
        return Err(PipelineError::Model(format!(
            "need at least 2 distinct source IPs to split, got {}",
            ips.len()
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    ips.shuffle(&mut rng);
    let n_test = ((ips.len() as f64) * config.test_fraction).ceil() as usize;
    let n_test = n_test.clamp(1, ips.len() - 1);
    let test_ips: HashSet<&str> = ips[..n_test].iter().copied().collect();

    let mut split = IpSplit {
        train_ips: ips.len() - n_test,
        test_ips: n_test,
        ..Default::default()
    };
    for (i, r) in sessions.iter().enumerate() {
        match r.ip() {
            Some(ip) if test_ips.contains(ip) => split.test.push(i),
            Some(_) => split.train.push(i),
            None => {}
        }
    }
    Ok(split)
}
