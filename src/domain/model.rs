use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::error::ModemError;

/// Opaque identifier of a modem instance, valid for one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModemHandle {
    id: String,
}

impl ModemHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for ModemHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// Point-in-time snapshot of a modem, re-queried on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModemState {
    pub telephone_number: Option<String>,
    pub enabled: bool,
    /// Raw state string as reported by the device (`enabled`, `registered`, ...).
    pub state: Option<String>,
}

/// SMS object created or listed by the device. Not `Clone`: the send step consumes it.
///
/// The id is kept as the decimal digit string from the path, so ids of any length are
/// accepted. Ordering is numeric: shorter (leading zeros ignored) sorts first.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SmsResource {
    id: String,
    path: String,
}

impl SmsResource {
    pub(crate) fn new(path: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decimal id exactly as it appears in the path.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Numeric id when it fits in a `u64`.
    pub fn index(&self) -> Option<u64> {
        self.id.parse().ok()
    }

    pub fn into_path(self) -> String {
        self.path
    }

    fn numeric_key(&self) -> (usize, &str) {
        let significant = self.id.trim_start_matches('0');
        (significant.len(), significant)
    }
}

impl Ord for SmsResource {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric_key()
            .cmp(&other.numeric_key())
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for SmsResource {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Canonical received message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub resource_path: String,
    pub sender: Option<String>,
    pub text: Option<String>,
    pub timestamp: Option<String>,
    pub state: Option<String>,
    pub raw_fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub telephone_number: String,
    pub last_message_time: DateTime<Utc>,
}

/// Result of the two-phase send protocol.
#[derive(Debug)]
pub enum SendOutcome {
    Sent {
        resource: String,
        history_recorded: bool,
    },
    /// Nothing was created on the device.
    CreateFailed { error: ModemError },
    /// The resource exists on the device but was not transmitted. It is left as is.
    SendFailed { resource: String, error: ModemError },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }
}

#[derive(Debug, Default)]
pub struct InboxReport {
    pub messages: Vec<SmsMessage>,
    /// `PartialRead` errors for messages that could not be read.
    pub skipped: Vec<ModemError>,
}
