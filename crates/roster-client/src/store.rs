//! Token persistence.
//!
//! The store is a string key-value surface behind the [`TokenStore`] trait so
//! hosts can inject their own medium: the in-memory implementation for tests,
//! the file-backed one for desktop sessions, or something platform-specific.
//! The client reads the access token through this trait on every request, so
//! separate handles over the same backing file observe each other's writes.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

/// Storage key for the short-lived access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the dormant refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Injectable key-value storage for session tokens.
///
/// Writes are best-effort: implementations log and swallow storage failures
/// rather than widening the contract, since a lost write only means the user
/// signs in again.
pub trait TokenStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Removes `key`. A no-op when the key is absent.
    fn clear(&self, key: &str);
}

/// Volatile store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn clear(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

/// File-backed store: one JSON object per file, written with restricted
/// permissions (0600) on Unix. Survives restarts within one machine account.
///
/// Every `get` re-reads the file, so concurrent handles (or a second process
/// sharing the path) see the latest tokens without coordination.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the token map; a missing file is an empty map.
    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token store {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token store {}", self.path.display()))
    }

    /// Writes the token map with restricted permissions (0600).
    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(map).context("Failed to serialize tokens")?;

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_map() {
            Ok(map) => map.get(key).cloned(),
            Err(e) => {
                warn!("token store read failed: {e:#}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(e) => {
                warn!("token store read failed, starting empty: {e:#}");
                BTreeMap::new()
            }
        };
        map.insert(key.to_string(), value.to_string());
        if let Err(e) = self.write_map(&map) {
            warn!("token store write failed: {e:#}");
        }
    }

    fn clear(&self, key: &str) {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(_) => return,
        };
        if map.remove(key).is_none() {
            return;
        }
        if let Err(e) = self.write_map(&map) {
            warn!("token store write failed: {e:#}");
        }
    }
}
