//! Pipeline benchmark: flatten → prune → aggregate over a synthetic export.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use honeypot_recurrence::config::PipelineConfig;
use honeypot_recurrence::features::{binarize_uptime, prune, Preprocessor, SessionAggregator};
use honeypot_recurrence::ingest::Flattener;
use honeypot_recurrence::storage::ArtifactStore;
use serde_json::{json, Value};

fn make_dummy_events(sessions: usize, per_session: usize) -> Vec<Value> {
    let kinds = ["login.success", "command.input", "client.kex", "session.closed"];
    (0..sessions)
        .flat_map(|s| {
            (0..per_session).map(move |e| {
                json!({
                    "_id": {"$oid": format!("{}-{}", s, e)},
                    "ip": format!("10.{}.{}.{}", s % 7, s % 11, s % 13),
                    "data": {
                        "session": format!("bench-{}", s),
                        "eventid": kinds[e % kinds.len()],
                        "message": format!("CMD: echo {}", e),
                        "src_uptime_sec": if s % 2 == 0 { json!(120) } else { Value::Null },
                        "password": "root",
                    }
                })
            })
        })
        .collect()
}

fn bench_flatten(c: &mut Criterion) {
    let events = make_dummy_events(500, 10);
    let store = ArtifactStore::disabled();
    c.bench_function("flatten_5000_events", |b| {
        b.iter(|| black_box(Flattener::new(1000).flatten(black_box(&events), &store).unwrap()))
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let events = make_dummy_events(500, 10);
    let store = ArtifactStore::disabled();
    let mut flat = Flattener::new(10_000).flatten(&events, &store).unwrap();
    prune(&mut flat);
    binarize_uptime(&mut flat);
    let aggregator = SessionAggregator::new(PipelineConfig::default().aggregate);

    c.bench_function("aggregate_500_sessions", |b| {
        b.iter(|| black_box(aggregator.aggregate(black_box(&flat), &store).unwrap()))
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let events = make_dummy_events(500, 10);
    let config = PipelineConfig::default();
    let store = ArtifactStore::disabled();
    let preprocessor = Preprocessor::new(&config, &store, true);

    c.bench_function("full_pipeline_events_to_labeled_sessions", |b| {
        b.iter(|| black_box(preprocessor.process_records(black_box(&events)).unwrap()))
    });
}

criterion_group!(benches, bench_flatten, bench_aggregate, bench_full_pipeline);
criterion_main!(benches);
