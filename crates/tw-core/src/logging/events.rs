//! Structured event definitions.
//!
//! An [`Event`] is one log record: a timestamp, a severity, an event name and
//! an ordered map of fields. Events are created fresh per log call, rewritten
//! by the pipeline stages and dropped after rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Severity of an event.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// The lowest tier, the only one subject to sampling.
    pub fn is_debug_tier(self) -> bool {
        self <= Level::Debug
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard event names emitted by the wrapper.
pub mod event_names {
    /// No command was supplied.
    pub const WRAPPER_ERROR: &str = "wrapper.error";

    // Task lifecycle
    pub const TASK_STARTED: &str = "task.started";
    pub const TASK_SUCCEEDED: &str = "task.succeeded";
    pub const TASK_FAILED: &str = "task.failed";

    /// One non-blank line of child output.
    pub const TOOL_OUTPUT: &str = "tool.output";
}

/// Field names rendered ahead of the event's own fields.
pub mod reserved {
    pub const TIMESTAMP: &str = "timestamp";
    pub const LEVEL: &str = "level";
    pub const EVENT: &str = "event";

    pub const ALL: [&str; 3] = [TIMESTAMP, LEVEL, EVENT];
}

/// A structured log event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// When the event was created.
    pub timestamp: DateTime<Utc>,

    /// Severity.
    pub level: Level,

    /// Event name (e.g., "task.started", "tool.output").
    pub name: String,

    /// Event fields in insertion order.
    pub fields: Map<String, Value>,
}

impl Event {
    /// Create an event with no fields, stamped now.
    pub fn new(level: Level, name: impl Into<String>) -> Self {
        Event {
            timestamp: Utc::now(),
            level,
            name: name.into(),
            fields: Map::new(),
        }
    }

    pub fn trace(name: impl Into<String>) -> Self {
        Self::new(Level::Trace, name)
    }

    pub fn debug(name: impl Into<String>) -> Self {
        Self::new(Level::Debug, name)
    }

    pub fn info(name: impl Into<String>) -> Self {
        Self::new(Level::Info, name)
    }

    pub fn warn(name: impl Into<String>) -> Self {
        Self::new(Level::Warn, name)
    }

    pub fn error(name: impl Into<String>) -> Self {
        Self::new(Level::Error, name)
    }

    /// Add a field to the event. Values that fail to serialize are skipped.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
        self
    }

    /// Look up a field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a string field.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}
