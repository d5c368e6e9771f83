//! Audit logger implementation.
//!
//! [`AuditLogger::handle`] runs the whole hook: parse the payload, ensure the
//! schema, append one record. Every failure comes back as an [`Outcome`]
//! rather than an error so the caller can report it and carry on.

use std::sync::Arc;

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::event::{AuditRecord, HookEvent};
use crate::storage::{AuditStorage, SqliteStorage};

/// Result of handling one hook payload.
#[derive(Debug)]
pub enum Outcome {
    /// Empty payload; nothing was written.
    Ignored,
    /// One record was appended.
    Logged { id: i64, tool_name: String },
    /// The payload was not a valid event; nothing was written.
    MalformedInput(AuditError),
    /// Opening the database, creating the schema, or inserting failed.
    StorageFailed(AuditError),
}

impl Outcome {
    /// The status line reported to the harness on stderr, if any.
    pub fn status_line(&self) -> Option<String> {
        match self {
            Self::Ignored => None,
            Self::Logged { tool_name, .. } => Some(format!("[AUDIT] {} logged", tool_name)),
            Self::MalformedInput(err) => Some(format!("[AUDIT] Invalid JSON input: {}", err)),
            Self::StorageFailed(err) => Some(format!("[AUDIT ERROR] Failed to log: {}", err)),
        }
    }
}

/// The main audit logger.
pub struct AuditLogger {
    config: AuditConfig,
    storage: Option<Arc<dyn AuditStorage>>,
}

impl AuditLogger {
    /// Create a logger writing to the SQLite file named by the configuration.
    ///
    /// The database is only opened once there is a valid event to record.
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            storage: None,
        }
    }

    /// Create a logger with a custom storage backend.
    ///
    /// The backend is left open after each record; closing it is up to the
    /// caller.
    pub fn with_storage(config: AuditConfig, storage: Arc<dyn AuditStorage>) -> Self {
        Self {
            config,
            storage: Some(storage),
        }
    }

    /// Configuration the logger was built with.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Handle a raw hook payload.
    pub async fn handle(&self, payload: &str) -> Outcome {
        let event = match HookEvent::parse(payload) {
            Ok(Some(event)) => event,
            Ok(None) => return Outcome::Ignored,
            Err(err) => {
                tracing::warn!(error = %err, "Rejected hook payload");
                return Outcome::MalformedInput(err);
            }
        };

        match self.log(&event).await {
            Ok(id) => Outcome::Logged {
                id,
                tool_name: event.tool_name().into_owned(),
            },
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    tool = %event.tool_name(),
                    db = %self.config.db_path.display(),
                    "Failed to record tool call"
                );
                Outcome::StorageFailed(err)
            }
        }
    }

    /// Record one event and return the id of the new row.
    pub async fn log(&self, event: &HookEvent) -> Result<i64, AuditError> {
        let record = AuditRecord::from_event(event, &self.config)?;

        if let Some(storage) = &self.storage {
            return write(storage.as_ref(), &record).await;
        }

        let storage = SqliteStorage::open(&self.config.db_path).await?;
        let result = write(&storage, &record).await;
        storage.close().await;
        result
    }
}

async fn write(storage: &dyn AuditStorage, record: &AuditRecord) -> Result<i64, AuditError> {
    storage.ensure_schema().await?;
    let id = storage.store(record).await?;

    tracing::debug!(
        id,
        tool = %record.tool_name,
        success = record.success,
        "Audit record stored"
    );

    Ok(id)
}
