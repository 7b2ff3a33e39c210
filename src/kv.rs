//! Durable key-value storage for submitted profile fields.
//!
//! A flat string map serialized to `profile.toml` under the platform data
//! directory. Every `set` rewrites the file, so each key is overwritten
//! independently; there is no atomicity across keys.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Key for the submitted full name
pub const KEY_FULL_NAME: &str = "submitted_full_name";
/// Key for the submitted profession
pub const KEY_PROFESSION: &str = "submitted_profession";

const KV_FILE: &str = "profile.toml";

/// String-keyed durable storage backed by one TOML file
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl KvStore {
    /// Default location under the platform data directory
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "visage", "Visage")
            .context("Could not determine data directory")?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        Ok(data_dir.join(KV_FILE))
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(
            "Opened key-value store at {} ({} entries)",
            path.display(),
            entries.len()
        );
        Ok(Self { path, entries })
    }

    /// Read a value. `None` means the key was never set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Write one value and persist immediately
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        let content = toml::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = KvStore::open(dir.path().join(KV_FILE)).unwrap();
        assert_eq!(store.get(KEY_FULL_NAME), None);
        assert_eq!(store.get(KEY_PROFESSION), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = KvStore::open(dir.path().join(KV_FILE)).unwrap();
        store.set(KEY_FULL_NAME, "Ada Lovelace").unwrap();
        assert_eq!(store.get(KEY_FULL_NAME), Some("Ada Lovelace"));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let dir = TempDir::new().unwrap();
        let mut store = KvStore::open(dir.path().join(KV_FILE)).unwrap();
        store.set(KEY_PROFESSION, "Engineer").unwrap();
        store.set(KEY_PROFESSION, "Mathematician").unwrap();
        assert_eq!(store.get(KEY_PROFESSION), Some("Mathematician"));
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(KV_FILE);
        {
            let mut store = KvStore::open(&path).unwrap();
            store.set(KEY_FULL_NAME, "Grace Hopper").unwrap();
            store.set(KEY_PROFESSION, "Rear Admiral").unwrap();
        }
        let store = KvStore::open(&path).unwrap();
        assert_eq!(store.get(KEY_FULL_NAME), Some("Grace Hopper"));
        assert_eq!(store.get(KEY_PROFESSION), Some("Rear Admiral"));
    }

    #[test]
    fn keys_are_independent() {
        let dir = TempDir::new().unwrap();
        let mut store = KvStore::open(dir.path().join(KV_FILE)).unwrap();
        store.set(KEY_FULL_NAME, "Solo Name").unwrap();
        assert_eq!(store.get(KEY_FULL_NAME), Some("Solo Name"));
        assert_eq!(store.get(KEY_PROFESSION), None);
    }
}
