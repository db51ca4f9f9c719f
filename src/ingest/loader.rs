//! Reads the honeypot export: one JSON array of event objects.

use crate::error::{PipelineError, Result};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load every event record from `path`. Fails fast when the path is missing.
pub fn load_events(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(PipelineError::InputMissing(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);
    let doc: Value = serde_json::from_reader(reader)?;
    let Value::Array(records) = doc else {
        return Err(PipelineError::MalformedInput(format!(
            "{} is not a JSON array",
            path.display()
        )));
    };
    tracing::info!(path = %path.display(), count = records.len(), "loaded event records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_input_missing() {
        let err = load_events(Path::new("definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, PipelineError::InputMissing(_)));
    }

    #[test]
    fn object_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.json");
        std::fs::write(&path, r#"{"data":{"session":"s1"}}"#).unwrap();
        assert!(matches!(
            load_events(&path).unwrap_err(),
            PipelineError::MalformedInput(_)
        ));
    }

    #[test]
    fn reads_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, r#"[{"a":1},{"a":2}]"#).unwrap();
        assert_eq!(load_events(&path).unwrap().len(), 2);
    }
}
