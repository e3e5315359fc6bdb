//! Timestamped audit trail of session actions.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::{Serialize, Serializer};
use tracing::info;

/// Timestamp layout used when rendering entries.
pub const AUDIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub action: String,
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format(AUDIT_TIMESTAMP_FORMAT))
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format(AUDIT_TIMESTAMP_FORMAT),
            self.action
        )
    }
}

/// Append-only list of actions, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action stamped with the local clock.
    pub fn record(&mut self, action: impl Into<String>) -> &AuditEntry {
        self.record_at(Local::now().naive_local(), action)
    }

    /// Record an action with an explicit timestamp.
    pub fn record_at(&mut self, timestamp: NaiveDateTime, action: impl Into<String>) -> &AuditEntry {
        let action = action.into();
        info!(%action, "session action");
        self.entries.push(AuditEntry { timestamp, action });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    /// Rendered entries, `[YYYY-MM-DD HH:MM:SS] action`.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a AuditLog {
    type Item = &'a AuditEntry;
    type IntoIter = std::slice::Iter<'a, AuditEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
