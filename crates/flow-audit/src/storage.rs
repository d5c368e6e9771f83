//! Audit storage backends.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

use crate::error::AuditError;
use crate::event::AuditRecord;

/// How long a writer waits on another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tool_audit_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        session_id TEXT,
        tool_name TEXT NOT NULL,
        tool_input TEXT,
        tool_output TEXT,
        duration_ms INTEGER,
        success INTEGER,
        error TEXT,
        user_id TEXT,
        project_id TEXT
    )
"#;

const CREATE_TIMESTAMP_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON tool_audit_log(timestamp)";

const CREATE_TOOL_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_audit_tool ON tool_audit_log(tool_name)";

/// Trait for audit storage backends.
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Create the audit table and its indexes if they do not exist.
    async fn ensure_schema(&self) -> Result<(), AuditError>;

    /// Append a record and return its storage-assigned id.
    async fn store(&self, record: &AuditRecord) -> Result<i64, AuditError>;

    /// Release the underlying connection.
    async fn close(&self);
}

/// SQLite file storage.
///
/// Holds a single connection; concurrent hook processes serialize on the
/// database file lock.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (or create) the database at `path`, creating missing parent
    /// directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        tracing::debug!(path = %path.display(), "Opened audit database");

        Ok(Self { pool })
    }
}

#[async_trait]
impl AuditStorage for SqliteStorage {
    async fn ensure_schema(&self) -> Result<(), AuditError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_TIMESTAMP_INDEX).execute(&mut *tx).await?;
        sqlx::query(CREATE_TOOL_INDEX).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn store(&self, record: &AuditRecord) -> Result<i64, AuditError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO tool_audit_log
                (timestamp, session_id, tool_name, tool_input, tool_output,
                 duration_ms, success, error, user_id, project_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.timestamp)
        .bind(record.session_id.as_deref())
        .bind(&record.tool_name)
        .bind(&record.tool_input)
        .bind(&record.tool_output)
        .bind(record.duration_ms)
        .bind(record.success)
        .bind(record.error.as_deref())
        .bind(record.user_id.as_deref())
        .bind(record.project_id.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.last_insert_rowid())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
