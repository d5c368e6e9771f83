//! Audit logging configuration.
//!
//! Built once at process start and handed to [`crate::AuditLogger`]; nothing in
//! this crate reads the environment after that.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "CLAUDE_FLOW_DB";

/// Environment variable attached to every record as `user_id`.
pub const USER_ID_ENV: &str = "CLAUDE_FLOW_USER_ID";

/// Environment variable attached to every record as `project_id`.
pub const PROJECT_ID_ENV: &str = "CLAUDE_FLOW_PROJECT_ID";

/// Project root the harness exports to hooks.
pub const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// Database location used when [`DB_PATH_ENV`] is unset.
///
/// Resolved against [`PROJECT_DIR_ENV`] when that is set, otherwise against
/// the working directory, so a hook started from a subdirectory without the
/// project root exported opens a different file.
pub const DEFAULT_DB_PATH: &str = "data/claude-flow.db";

/// Configuration for audit logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Path of the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User identifier stamped on every record.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Project identifier stamped on every record.
    #[serde(default)]
    pub project_id: Option<String>,
}

impl AuditConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as set, matching how the variables are attached
    /// verbatim to records.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            db_path: lookup(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| match lookup(PROJECT_DIR_ENV) {
                    Some(root) if !root.is_empty() => PathBuf::from(root).join(DEFAULT_DB_PATH),
                    _ => default_db_path(),
                }),
            user_id: lookup(USER_ID_ENV),
            project_id: lookup(PROJECT_ID_ENV),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_id: None,
            project_id: None,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AuditConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AuditConfig::default());
        assert_eq!(config.db_path, PathBuf::from("data/claude-flow.db"));
        assert!(config.user_id.is_none());
        assert!(config.project_id.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = AuditConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, "/var/lib/flow/audit.db"),
            (USER_ID_ENV, "alice"),
            (PROJECT_ID_ENV, "proj-7"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/var/lib/flow/audit.db"));
        assert_eq!(config.user_id.as_deref(), Some("alice"));
        assert_eq!(config.project_id.as_deref(), Some("proj-7"));
    }

    #[test]
    fn default_path_is_anchored_to_project_dir() {
        let config = AuditConfig::from_lookup(lookup_from(&[(PROJECT_DIR_ENV, "/work/repo")]));
        assert_eq!(config.db_path, PathBuf::from("/work/repo/data/claude-flow.db"));

        let config = AuditConfig::from_lookup(lookup_from(&[(PROJECT_DIR_ENV, "")]));
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn explicit_path_wins_over_project_dir() {
        let config = AuditConfig::from_lookup(lookup_from(&[
            (PROJECT_DIR_ENV, "/work/repo"),
            (DB_PATH_ENV, "audit.db"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("audit.db"));
    }

    #[test]
    fn empty_identifier_is_kept_verbatim() {
        let config = AuditConfig::from_lookup(lookup_from(&[(USER_ID_ENV, "")]));
        assert_eq!(config.user_id.as_deref(), Some(""));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: AuditConfig = serde_json::from_str(r#"{"user_id": "bob"}"#).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.user_id.as_deref(), Some("bob"));
    }
}
