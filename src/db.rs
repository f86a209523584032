use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Layout version written next to every slot value.
pub const SCHEMA_VERSION: u32 = 1;

const DB_FILE: &str = "quicklink.db";

/// One persisted slot value as it sits in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub value: String,
    pub schema_version: u32,
}

/// Durable per-profile key-value store backing every persisted slot.
pub trait DurableStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<StoredEntry>>;
    fn write(&self, key: &str, value: &str, schema_version: u32) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    /// Open `quicklink.db` inside `dir`, creating the directory first.
    pub fn in_app_dir(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Self::open(&dir.join(DB_FILE))
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            "
            -- One row per persisted slot
            CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                schema_version INTEGER NOT NULL DEFAULT 1,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            ",
        )?;

        // Pass the connection to avoid re-locking
        Self::migrate_conn(&conn)?;

        Ok(())
    }

    fn migrate_conn(conn: &Connection) -> Result<()> {
        let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if current < SCHEMA_VERSION {
            tracing::info!(
                current_version = current,
                target_version = SCHEMA_VERSION,
                "migrating kv store"
            );
            // Entries written before versioning existed carry the column default.
            conn.execute(
                "UPDATE kv_entries SET schema_version = 1 WHERE schema_version IS NULL",
                [],
            )?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::StorageUnavailable(format!("Lock poisoned: {e}")))
    }
}

impl DurableStore for Database {
    fn read(&self, key: &str) -> Result<Option<StoredEntry>> {
        let conn = self.lock()?;
        let entry = conn
            .query_row(
                "SELECT value, schema_version FROM kv_entries WHERE key = ?1",
                [key],
                |row| {
                    Ok(StoredEntry {
                        value: row.get(0)?,
                        schema_version: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    fn write(&self, key: &str, value: &str, schema_version: u32) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_entries (key, value, schema_version, updated_at)
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                schema_version = excluded.schema_version,
                updated_at = CURRENT_TIMESTAMP",
            rusqlite::params![key, value, schema_version],
        )
        .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_entries WHERE key = ?1", [key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_entries ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

/// Process-local store. Used in tests and as the fallback when no
/// database can be opened.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredEntry>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write, like a browser with storage disabled.
    pub fn unavailable() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            read_only: true,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredEntry>>> {
        self.entries
            .lock()
            .map_err(|e| Error::StorageUnavailable(format!("Lock poisoned: {e}")))
    }
}

impl DurableStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<StoredEntry>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str, schema_version: u32) -> Result<()> {
        if self.read_only {
            return Err(Error::StorageUnavailable("store is read-only".to_string()));
        }
        self.lock()?.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                schema_version,
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.read_only {
            return Err(Error::StorageUnavailable("store is read-only".to_string()));
        }
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(feature = "desktop")]
mod app {
    use super::Database;
    use crate::error::{Error, Result};
    use tauri::{AppHandle, Manager};

    impl Database {
        pub fn new(app_handle: &AppHandle) -> Result<Self> {
            let app_dir = app_handle
                .path()
                .app_data_dir()
                .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
            Self::in_app_dir(&app_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().expect("Failed to create in-memory database");
        db.initialize().expect("Failed to create schema");
        db
    }

    #[test]
    fn test_write_then_read() {
        let db = test_db();
        db.write("admin_settings", "{\"a\":1}", SCHEMA_VERSION).unwrap();

        let entry = db.read("admin_settings").unwrap().unwrap();
        assert_eq!(entry.value, "{\"a\":1}");
        assert_eq!(entry.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_write_overwrites_existing_key() {
        let db = test_db();
        db.write("k", "1", 1).unwrap();
        db.write("k", "2", 1).unwrap();

        assert_eq!(db.read("k").unwrap().unwrap().value, "2");
        assert_eq!(db.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_missing_key_reads_none() {
        let db = test_db();
        assert!(db.read("nothing").unwrap().is_none());
    }

    #[test]
    fn test_remove_key() {
        let db = test_db();
        db.write("k", "1", 1).unwrap();
        db.remove("k").unwrap();
        assert!(db.read("k").unwrap().is_none());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let db = test_db();
        db.write("k", "1", 1).unwrap();
        db.initialize().unwrap();
        assert_eq!(db.read("k").unwrap().unwrap().value, "1");

        let version: u32 = db
            .conn
            .lock()
            .unwrap()
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = Database::in_app_dir(dir.path()).unwrap();
            db.initialize().unwrap();
            db.write("quicklink_cart", "[]", 1).unwrap();
        }
        let db = Database::in_app_dir(dir.path()).unwrap();
        db.initialize().unwrap();
        assert_eq!(db.read("quicklink_cart").unwrap().unwrap().value, "[]");
    }

    #[test]
    fn test_unavailable_memory_store_rejects_writes() {
        let store = MemoryStore::unavailable();
        let err = store.write("k", "1", 1).unwrap_err();
        assert!(matches!(err, Error::StorageUnavailable(_)));
        assert!(store.read("k").unwrap().is_none());
    }
}
