//! Token store persisted as a JSON object on disk

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;

use super::TokenStore;
use crate::error::{Error, Result};

type Values = BTreeMap<String, String>;

/// Store that survives process restarts.
///
/// Every change rewrites a temporary file beside the target and renames it
/// into place. Writes from separate processes race with last-write-wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Values> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Values::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Values::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Contents to start a write from. An undecodable file is discarded so
    /// the store can recover from it.
    fn read_for_update(&self) -> Result<Values> {
        match self.read_all() {
            Err(Error::Json(e)) => {
                tracing::warn!(
                    "Discarding unreadable token store {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Values::new())
            }
            other => other,
        }
    }

    fn write_all(&self, values: &Values) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut file = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut file, values)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Wrote token store {}", self.path.display());
        Ok(())
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| Error::Storage("file store lock poisoned".to_string()))
    }
}

impl TokenStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut values = self.read_for_update()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut values = match self.read_all() {
            Ok(values) => values,
            // Unreadable contents are dropped along with the key
            Err(Error::Json(_)) => return self.write_all(&self.read_for_update()?),
            Err(e) => return Err(e),
        };
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}
