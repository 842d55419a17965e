use crate::domain::model::HistoryEntry;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Device-management operations consumed by the core. Implementations return raw
/// process output; parsing is left to the core components.
pub trait DeviceInterface {
    fn list_modems(&self) -> Result<String>;
    fn modem_detail(&self, modem_id: &str) -> Result<String>;
    fn set_enabled(&self, modem_id: &str, enable: bool) -> Result<()>;
    /// Returns the textual output of the create step (not necessarily structured).
    fn create_message(&self, modem_id: &str, payload: &str) -> Result<String>;
    fn send_message(&self, resource_path: &str) -> Result<()>;
    fn list_messages(&self, modem_id: &str) -> Result<String>;
    fn message_detail(&self, resource_path: &str) -> Result<String>;
}

/// Append-only log of sent messages.
pub trait HistoryLog {
    fn append(&self, telephone_number: &str, timestamp: DateTime<Utc>) -> Result<()>;
    /// All entries, most recent first.
    fn query_all(&self) -> Result<Vec<HistoryEntry>>;
}

pub trait ConfigProvider {
    fn mmcli_binary(&self) -> &str;
    fn sms_path_prefix(&self) -> &str;
    fn database_path(&self) -> &str;
}
