//! ID generation utilities.
//!
//! This module provides functions for generating unique identifiers
//! for tool calls, runs, traces and observations.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a unique tool call ID.
///
/// ```rust
/// use promptrail_core::identifier::generate_tool_call_id;
///
/// let id = generate_tool_call_id();
/// assert!(id.starts_with("call_"));
/// assert_eq!(id.len(), 37);
/// ```
#[must_use]
pub fn generate_tool_call_id() -> String {
    format!("call_{}", Uuid::new_v4().simple())
}

/// Generate a unique run ID.
///
/// ```rust
/// use promptrail_core::identifier::generate_run_id;
///
/// assert!(generate_run_id().starts_with("run_"));
/// ```
#[must_use]
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Generate a trace or observation ID.
///
/// Trace collectors expect bare hyphenated UUIDs, so no prefix is added.
#[must_use]
pub fn generate_observation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Get the current UTC timestamp.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(generate_run_id(), generate_run_id());
        assert_ne!(generate_observation_id(), generate_observation_id());
    }

    #[test]
    fn test_observation_id_is_uuid() {
        let id = generate_observation_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
