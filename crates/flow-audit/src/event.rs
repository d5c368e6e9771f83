//! Hook event and audit record types.
//!
//! A [`HookEvent`] is what the harness writes to the hook's stdin after a tool
//! runs. An [`AuditRecord`] is the row persisted for it.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;

use crate::config::AuditConfig;
use crate::error::AuditError;

/// Longest `tool_output` stored verbatim, in characters.
pub const MAX_OUTPUT_CHARS: usize = 10_000;

/// Appended to `tool_output` when it is cut at [`MAX_OUTPUT_CHARS`].
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Tool name recorded when the event does not carry one.
pub const UNKNOWN_TOOL: &str = "unknown";

/// A post-execution event as delivered by the harness.
///
/// Every field is optional and may hold any JSON value; unknown fields are
/// ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HookEvent {
    /// Session the tool ran in, normally a string.
    #[serde(default)]
    pub session_id: Value,

    /// Name of the tool that ran (e.g., "Read", "Bash").
    #[serde(default)]
    pub tool_name: Value,

    /// Structured tool arguments.
    #[serde(default = "empty_object")]
    pub tool_input: Value,

    /// Tool output, normally a string.
    #[serde(default)]
    pub tool_output: Value,

    /// Error reported by the tool; any truthy value marks the call as failed.
    #[serde(default)]
    pub error: Value,
}

impl HookEvent {
    /// Parse a raw stdin payload.
    ///
    /// Returns `Ok(None)` for an empty payload, which callers treat as
    /// "nothing to log".
    pub fn parse(payload: &str) -> Result<Option<Self>, AuditError> {
        if payload.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(payload).map_err(AuditError::MalformedInput)?;
        if !value.is_object() {
            return Err(AuditError::MalformedInput(serde_json::Error::custom(
                "expected a JSON object",
            )));
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(AuditError::MalformedInput)
    }

    /// Tool name, or `"unknown"` when absent or null.
    ///
    /// A non-string name is rendered as JSON text.
    pub fn tool_name(&self) -> Cow<'_, str> {
        text_of(&self.tool_name).unwrap_or(Cow::Borrowed(UNKNOWN_TOOL))
    }

    /// Session id, or `None` when absent or null.
    pub fn session_id(&self) -> Option<Cow<'_, str>> {
        text_of(&self.session_id)
    }

    /// Whether the tool call succeeded.
    pub fn succeeded(&self) -> bool {
        !is_truthy(&self.error)
    }
}

/// One persisted row of `tool_audit_log`.
///
/// `id` is assigned by the storage engine and returned from
/// [`crate::AuditStorage::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// Insert time, naive UTC ISO-8601; microseconds are omitted when zero.
    pub timestamp: String,

    pub session_id: Option<String>,

    pub tool_name: String,

    /// `tool_input` re-serialized as JSON text.
    pub tool_input: String,

    /// `tool_output`, truncated to [`MAX_OUTPUT_CHARS`].
    pub tool_output: String,

    /// Never populated by the hook.
    pub duration_ms: Option<i64>,

    pub success: bool,

    /// Never populated by the hook.
    pub error: Option<String>,

    pub user_id: Option<String>,

    pub project_id: Option<String>,
}

impl AuditRecord {
    /// Build the record for an event, stamped with the current time.
    pub fn from_event(event: &HookEvent, config: &AuditConfig) -> Result<Self, AuditError> {
        Self::from_event_at(event, config, Utc::now())
    }

    /// Build the record for an event with an explicit timestamp.
    pub fn from_event_at(
        event: &HookEvent,
        config: &AuditConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, AuditError> {
        let tool_input =
            serde_json::to_string(&event.tool_input).map_err(AuditError::Serialization)?;

        let tool_output = match &event.tool_output {
            Value::Null => String::new(),
            Value::String(s) => truncate_output(s).into_owned(),
            other => {
                let text = serde_json::to_string(other).map_err(AuditError::Serialization)?;
                truncate_output(&text).into_owned()
            }
        };

        Ok(Self {
            timestamp: format_timestamp(now),
            session_id: event.session_id().map(Cow::into_owned),
            tool_name: event.tool_name().into_owned(),
            tool_input,
            tool_output,
            duration_ms: None,
            success: event.succeeded(),
            error: None,
            user_id: config.user_id.clone(),
            project_id: config.project_id.clone(),
        })
    }
}

/// Cut `output` to [`MAX_OUTPUT_CHARS`] characters and mark it, if longer.
pub fn truncate_output(output: &str) -> Cow<'_, str> {
    match output.char_indices().nth(MAX_OUTPUT_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &output[..cut], TRUNCATION_MARKER)),
        None => Cow::Borrowed(output),
    }
}

/// JSON truthiness: null, false, zero, and empty strings/arrays/objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn format_timestamp(now: DateTime<Utc>) -> String {
    let format = if now.timestamp_subsec_micros() == 0 {
        "%Y-%m-%dT%H:%M:%S"
    } else {
        "%Y-%m-%dT%H:%M:%S%.6f"
    };
    now.naive_utc().format(format).to_string()
}

/// String values as-is, null as `None`, anything else as JSON text.
fn text_of(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
