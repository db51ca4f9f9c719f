//! Training path: IP-grouped split, forest fitting and held-out evaluation.

mod metrics;
mod split;
mod trainer;

pub use metrics::{evaluate, Metrics};
pub use split::{split_by_ip, IpSplit};
pub use trainer::{run_trainer, TrainOptions, TrainReport};
