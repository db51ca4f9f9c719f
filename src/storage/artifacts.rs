//! Directory-backed artifact store. Every artifact is a bincode blob named
//! `<name>.bin` under the configured root; the directory is created on first write.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub struct ArtifactStore {
    root: PathBuf,
    enabled: bool,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            root: root.into(),
            enabled,
        }
    }

    /// Store that never writes (intermediate saving switched off).
    pub fn disabled() -> Self {
        Self::new(PathBuf::new(), false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.bin", name))
    }

    /// Write an artifact if saving is enabled. Returns the written path.
    pub fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }
        let path = self.path(name);
        write_bincode(&path, value)?;
        tracing::debug!(artifact = name, path = %path.display(), "artifact saved");
        Ok(Some(path))
    }

    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        read_bincode(&self.path(name))
    }
}

/// Serialize `value` to `path`, creating parent directories as needed.
pub fn write_bincode<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let out = BufWriter::new(File::create(path)?);
    bincode::serialize_into(out, value)?;
    Ok(())
}

pub fn read_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let input = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(input)?)
}
