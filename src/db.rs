//! SQLite connection handle shared by the cat and mission stores.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cats (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    years_of_experience INTEGER NOT NULL,
    breed TEXT NOT NULL,
    salary REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS missions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cat_id INTEGER,
    name TEXT NOT NULL,
    is_complete INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (cat_id) REFERENCES cats(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_missions_cat ON missions(cat_id);

CREATE TABLE IF NOT EXISTS targets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    mission_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    country TEXT NOT NULL,
    notes TEXT,
    is_complete INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (mission_id) REFERENCES missions(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_targets_mission ON targets(mission_id, id);
"#;

/// Path value that selects a transient in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Inconsistent(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A single SQLite connection; statements run on the blocking pool.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema.
    pub async fn open(path: PathBuf) -> StoreResult<Self> {
        if is_in_memory(&path) {
            return Self::open_in_memory();
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            conn.execute_batch(SCHEMA)?;
            tracing::info!("Opened SQLite database at {}", path.display());
            Ok::<_, StoreError>(conn)
        })
        .await??;

        Ok(Self::from_connection(conn))
    }

    /// Open a transient database that lives as long as this handle.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `op` against the connection on a blocking thread.
    pub async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            op(&mut conn)
        })
        .await?
    }
}

/// Whether `path` selects the in-memory database.
pub fn is_in_memory(path: &Path) -> bool {
    path.as_os_str() == IN_MEMORY
}
