//! Durable storage for the avatar record.
//!
//! One SQLite database holds an `avatars` table with a single row under the
//! key `"avatar"`. Writes overwrite that row in place. Reads return the
//! stored data URI, or `None` before the first write.
//!
//! The handle is a path, not an open connection: every operation opens a
//! short-lived connection, so the store can be cloned into the background
//! upload task (`rusqlite::Connection` is not `Sync`).

use std::path::PathBuf;

use rusqlite::{params, Connection};
use thiserror::Error;

const STORE_FILE: &str = "avatar-store.db";
const AVATAR_KEY: &str = "avatar";
/// Schema version recorded in `PRAGMA user_version`
const SCHEMA_VERSION: i32 = 1;

/// Errors from the avatar store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Avatar storage unavailable: {0}")]
    Unavailable(String),

    #[error("Avatar storage is out of space")]
    QuotaExceeded,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(err, _) = &e {
            if err.code == rusqlite::ErrorCode::DiskFull {
                return StoreError::QuotaExceeded;
            }
        }
        StoreError::Unavailable(e.to_string())
    }
}

/// Single-record store for the avatar data URI
#[derive(Debug, Clone)]
pub struct AvatarStore {
    path: PathBuf,
}

impl AvatarStore {
    /// Default store location under the platform data directory
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let dirs = directories::ProjectDirs::from("com", "visage", "Visage")
            .ok_or_else(|| StoreError::Unavailable("could not determine data directory".into()))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", data_dir.display(), e)))?;
        Ok(data_dir.join(STORE_FILE))
    }

    /// Open the store at `path`, creating the database on first use
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        // Connect once up front so availability and schema problems surface
        // at startup instead of on the first write.
        store.connect()?;
        tracing::info!("Opened avatar store at {}", store.path.display());
        Ok(store)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(StoreError::Unavailable(format!(
                "store schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }
        if version < SCHEMA_VERSION {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS avatars (
                    key  TEXT PRIMARY KEY,
                    data TEXT NOT NULL
                );",
            )?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(conn)
    }

    /// Read the stored avatar. `None` means nothing has been written yet;
    /// that is not an error.
    pub fn get(&self) -> Result<Option<String>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT data FROM avatars WHERE key = ?")?;
        match stmt.query_row(params![AVATAR_KEY], |row| row.get::<_, String>(0)) {
            Ok(data) => Ok(Some(data)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the avatar record. The write is a single statement, so a
    /// failed put leaves the previous record intact.
    pub fn put(&self, encoded: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO avatars (key, data) VALUES (?, ?)",
            params![AVATAR_KEY, encoded],
        )?;
        tracing::debug!("Stored avatar record ({} bytes)", encoded.len());
        Ok(())
    }
}
