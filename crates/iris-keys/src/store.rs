use crate::error::{KeyError, Result};
use std::path::{Path, PathBuf};

/// Flat list of bearer tokens persisted as a JSON array.
///
/// The file format is a plain `["sk-...", ...]` array, nothing else, so an
/// operator can edit it by hand between restarts.
#[derive(Debug)]
pub struct KeyStore {
    path: PathBuf,
    keys: Vec<String>,
}

impl KeyStore {
    /// Load the store at `path`. A missing file is an empty pool, not an
    /// error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Ok(Self {
                path,
                keys: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            KeyError::Storage(format!("failed to read {}: {}", path.display(), e))
        })?;
        let keys: Vec<String> = serde_json::from_str(&content)?;

        Ok(Self { path, keys })
    }

    /// Write the pool back to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                KeyError::Storage(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.keys)?;
        std::fs::write(&self.path, content).map_err(|e| {
            KeyError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })?;

        // Bearer tokens: owner-only on platforms that can express it.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&self.path)
                .map_err(|e| KeyError::Storage(e.to_string()))?
                .permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| KeyError::Storage(e.to_string()))?;
        }

        Ok(())
    }

    /// Append `key` unless it is already present. Returns whether the pool
    /// changed.
    pub fn add(&mut self, key: String) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Remove every occurrence of `key`. Returns whether the pool changed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        self.keys.len() != before
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
