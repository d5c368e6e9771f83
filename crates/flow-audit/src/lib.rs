//! # flow-audit
//!
//! Audit logging for tool executions.
//!
//! This crate provides functionality for:
//! - Parsing the post-execution event a harness hands to a hook
//! - Mapping it to one append-only row of `tool_audit_log`
//! - Storing rows in an embedded SQLite file, creating the schema on demand
//!
//! ## Stored Columns
//!
//! | Column | Source |
//! |--------|--------|
//! | `timestamp` | Insert time (UTC), never taken from the event |
//! | `session_id` | Event `session_id` |
//! | `tool_name` | Event `tool_name`, `"unknown"` if absent |
//! | `tool_input` | Event `tool_input` re-serialized, `{}` if absent |
//! | `tool_output` | Event `tool_output`, cut to 10,000 characters |
//! | `success` | `0` iff event `error` is truthy |
//! | `user_id`, `project_id` | [`AuditConfig`] |
//! | `duration_ms`, `error` | Always NULL |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use flow_audit::{AuditConfig, AuditLogger};
//!
//! # async fn example() {
//! let logger = AuditLogger::new(AuditConfig::from_env());
//!
//! let outcome = logger.handle(r#"{"tool_name": "Read"}"#).await;
//! if let Some(line) = outcome.status_line() {
//!     eprintln!("{}", line);
//! }
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod logger;
pub mod storage;

pub use config::AuditConfig;
pub use error::AuditError;
pub use event::{AuditRecord, HookEvent, is_truthy, truncate_output};
pub use logger::{AuditLogger, Outcome};
pub use storage::{AuditStorage, SqliteStorage};
