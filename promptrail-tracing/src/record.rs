//! Observation records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One finished observation.
///
/// Records of the same top-level call share `trace_id`. A record without
/// `parent_id` is the root of its trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Observation id.
    pub id: String,
    /// Trace this observation belongs to.
    pub trace_id: String,
    /// Enclosing observation, if any.
    pub parent_id: Option<String>,
    /// Operation name.
    pub name: String,
    /// Input of the operation.
    pub input: JsonValue,
    /// Output on success.
    pub output: Option<JsonValue>,
    /// Error message on failure.
    pub error: Option<String>,
    /// When the operation started.
    pub start_time: DateTime<Utc>,
    /// When the operation finished.
    pub end_time: DateTime<Utc>,
}

impl TraceRecord {
    /// Check whether this is the root of its trace.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check whether the operation failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Elapsed time in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }
}
