use super::StorageBackend;
use crate::error::{BarcodezError, Result};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Stores each key as `<root>/<key>.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| {
                BarcodezError::Store(format!("cannot create {}: {}", self.root.display(), e))
            })?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| BarcodezError::Store(format!("cannot read {}: {}", path.display(), e)))?;
        let value = serde_json::from_str(&content).map_err(BarcodezError::Serialization)?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.ensure_dir()?;

        let path = self.key_path(key);
        let content = serde_json::to_string_pretty(value).map_err(BarcodezError::Serialization)?;

        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_path, content)
            .and_then(|_| fs::rename(&tmp_path, &path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                BarcodezError::Store(format!("cannot write {}: {}", path.display(), e))
            })?;

        debug!("store: replaced {}", path.display());
        Ok(())
    }
}
