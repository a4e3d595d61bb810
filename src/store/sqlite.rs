// Durable credential storage over SQLite
// Single auth_kv table; one row per credential key

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};

use super::CredentialStore;

/// File-backed credential store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open credential database: {}", path.display()))?;
        Self::with_connection(conn)
    }

    /// Open a store in the platform data directory
    /// (e.g. `~/.local/share/medibook/credentials.sqlite3` on Linux)
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_local_dir()
            .context("Could not determine platform data directory")?
            .join("medibook");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Self::open(&dir.join("credentials.sqlite3"))
    }

    /// Open an in-memory store, mainly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS auth_kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .context("Failed to create auth_kv table")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Credential database lock poisoned"))
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row("SELECT value FROM auth_kv WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .with_context(|| format!("Failed to read credential key: {}", key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO auth_kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )
        .with_context(|| format!("Failed to write credential key: {}", key))?;
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let conn = self.lock()?;
        for key in keys {
            conn.execute("DELETE FROM auth_kv WHERE key = ?1", [*key])
                .with_context(|| format!("Failed to remove credential key: {}", key))?;
        }
        Ok(())
    }
}
