//! SQLite connection pool and schema bootstrap.
//!
//! The schema is an explicit table definition applied once at startup by
//! [`Database::init_schema`]; table operations live in `db::tables` as
//! `impl Database` blocks.

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::{Config, IN_MEMORY_DATABASE};

pub type DbConn = PooledConnection<SqliteConnectionManager>;

pub type StoreResult<T> = Result<T, StoreError>;

const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Table definitions for every entity the service persists.
pub const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL
    );
";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open the store described by `config` and apply [`SCHEMA`].
    pub fn open(config: &Config) -> StoreResult<Self> {
        let db = if config.is_in_memory() {
            Self::in_memory()?
        } else {
            Self::file(&config.database_url, config.db_pool_size)?
        };
        db.init_schema(SCHEMA)?;
        Ok(db)
    }

    /// Open (creating if needed) a file-backed database.
    pub fn file(path: impl AsRef<Path>, pool_size: u32) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))
        });
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        log::info!("[DB] Opened {} (pool size {})", path.display(), pool_size);
        Ok(Self { pool })
    }

    /// A private in-memory database. Every pooled connection to `:memory:`
    /// would see its own empty database, so the pool is pinned to one connection.
    pub fn in_memory() -> StoreResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;

        log::info!("[DB] Opened {}", IN_MEMORY_DATABASE);
        Ok(Self { pool })
    }

    /// Apply a schema definition. Statements must be idempotent.
    pub fn init_schema(&self, schema: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(schema)?;
        log::info!("[DB] Schema applied");
        Ok(())
    }

    pub fn conn(&self) -> StoreResult<DbConn> {
        Ok(self.pool.get()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_database_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("notes.db");

        let db = Database::file(&db_path, 2).expect("Failed to open database");
        db.init_schema(SCHEMA).expect("Failed to apply schema");

        assert!(db_path.exists());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let db = Database::in_memory().unwrap();
        db.init_schema(SCHEMA).unwrap();
        db.init_schema(SCHEMA).unwrap();

        let conn = db.conn().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'notes'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_open_from_config() {
        let dir = tempdir().unwrap();
        let config = Config {
            database_url: dir.path().join("notes.db").to_string_lossy().to_string(),
            db_pool_size: 3,
            ..Config::default()
        };

        let db = Database::open(&config).expect("Failed to open database");
        assert!(db.conn().is_ok());
    }
}
