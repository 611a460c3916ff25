use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::models::{Configuration, SaveCardRequest};

/// Async-safe handle to the card database.
///
/// Wraps `CardDb` behind `Arc<Mutex>` and runs all access on tokio's
/// blocking thread pool via `spawn_blocking`, preventing synchronous SQLite
/// I/O from tying up async worker threads.
#[derive(Clone)]
pub struct DbHandle {
    inner: Arc<std::sync::Mutex<CardDb>>,
}

impl DbHandle {
    pub fn new(db: CardDb) -> Self {
        Self {
            inner: Arc::new(std::sync::Mutex::new(db)),
        }
    }

    /// Run a closure with access to the database on a blocking thread.
    /// All data passed into `f` must be owned (`'static`).
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&CardDb) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
            f(&guard)
        })
        .await
        .context("DB task panicked")?
    }
}

pub struct CardDb {
    conn: Connection,
}

impl CardDb {
    /// Open (or create) a SQLite database at the given path and run migrations.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("Failed to open SQLite database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Create an in-memory SQLite database (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        self.run_migrations().context("Failed to run migrations")?;
        Ok(())
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS configurations (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    form_id TEXT NOT NULL UNIQUE,
                    form_data TEXT NOT NULL,
                    layout_selections TEXT NOT NULL,
                    created_at TEXT NOT NULL DEFAULT (datetime('now')),
                    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
                );

                CREATE INDEX IF NOT EXISTS idx_configurations_updated
                    ON configurations(updated_at);
                ",
            )
            .context("Failed to create tables")?;
        Ok(())
    }

    // ── Configuration CRUD ────────────────────────────────────────────

    /// Create or overwrite the configuration for a form id.
    ///
    /// Upsert keyed on `form_id`: last write wins, `created_at` is kept from
    /// the first save, `updated_at` moves on every save. Returns the row id
    /// and the stored document.
    pub fn upsert_configuration(&self, req: &SaveCardRequest) -> Result<(i64, Configuration)> {
        let form_data =
            serde_json::to_string(&req.form_data).context("Failed to serialize form data")?;
        let layout_selections = serde_json::to_string(&req.layout_selections)
            .context("Failed to serialize layout selections")?;

        self.conn
            .execute(
                "INSERT INTO configurations (form_id, form_data, layout_selections)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(form_id) DO UPDATE SET
                    form_data = excluded.form_data,
                    layout_selections = excluded.layout_selections,
                    updated_at = datetime('now')",
                params![req.form_id, form_data, layout_selections],
            )
            .context("Failed to upsert configuration")?;

        // last_insert_rowid is unreliable on the conflict path; look it up.
        let id: i64 = self
            .conn
            .query_row(
                "SELECT id FROM configurations WHERE form_id = ?1",
                params![req.form_id],
                |row| row.get(0),
            )
            .context("Configuration not found after upsert")?;

        let config = self
            .get_configuration(&req.form_id)?
            .context("Configuration not found after upsert")?;
        Ok((id, config))
    }

    pub fn get_configuration(&self, form_id: &str) -> Result<Option<Configuration>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT form_id, form_data, layout_selections, created_at, updated_at
                 FROM configurations WHERE form_id = ?1",
            )
            .context("Failed to prepare get_configuration")?;
        let mut rows = stmt
            .query_map(params![form_id], |row| {
                Ok(ConfigurationRow {
                    form_id: row.get(0)?,
                    form_data: row.get(1)?,
                    layout_selections: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })
            .context("Failed to query configuration")?;
        match rows.next() {
            Some(row) => {
                let r = row.context("Failed to read configuration row")?;
                Ok(Some(r.into_configuration()?))
            }
            None => Ok(None),
        }
    }

    /// All stored configurations, most recently updated first.
    pub fn list_configurations(&self) -> Result<Vec<Configuration>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT form_id, form_data, layout_selections, created_at, updated_at
                 FROM configurations ORDER BY updated_at DESC, id DESC",
            )
            .context("Failed to prepare list_configurations")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ConfigurationRow {
                    form_id: row.get(0)?,
                    form_data: row.get(1)?,
                    layout_selections: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })
            .context("Failed to query configurations")?;
        let mut configs = Vec::new();
        for row in rows {
            let r = row.context("Failed to read configuration row")?;
            configs.push(r.into_configuration()?);
        }
        Ok(configs)
    }

    pub fn delete_configuration(&self, form_id: &str) -> Result<bool> {
        let count = self
            .conn
            .execute(
                "DELETE FROM configurations WHERE form_id = ?1",
                params![form_id],
            )
            .context("Failed to delete configuration")?;
        Ok(count > 0)
    }

    /// Remove every stored configuration. Returns the number removed;
    /// succeeds whether or not data existed.
    pub fn clear_all(&self) -> Result<usize> {
        let count = self
            .conn
            .execute("DELETE FROM configurations", [])
            .context("Failed to clear configurations")?;
        Ok(count)
    }
}

// ── Internal row helpers ──────────────────────────────────────────────

/// Intermediate row struct for reading configurations from SQLite before
/// parsing the JSON text columns into typed values.
struct ConfigurationRow {
    form_id: String,
    form_data: String,
    layout_selections: String,
    created_at: String,
    updated_at: String,
}

impl ConfigurationRow {
    fn into_configuration(self) -> Result<Configuration> {
        let form_data = serde_json::from_str(&self.form_data)
            .context("Failed to parse form data JSON")?;
        let layout_selections = serde_json::from_str(&self.layout_selections)
            .context("Failed to parse layout selections JSON")?;
        Ok(Configuration {
            form_id: self.form_id,
            form_data,
            layout_selections,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
