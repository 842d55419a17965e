use serde_json::Value;

use crate::core::parser::{last_path_segment, ResponseParser};
use crate::domain::model::ModemHandle;
use crate::domain::ports::DeviceInterface;
use crate::utils::error::{ModemError, Result};

pub struct ModemLocator<'a, D: DeviceInterface> {
    device: &'a D,
    parser: &'a ResponseParser,
}

impl<'a, D: DeviceInterface> ModemLocator<'a, D> {
    pub fn new(device: &'a D, parser: &'a ResponseParser) -> Self {
        Self { device, parser }
    }

    /// First available modem, or `None` when the list is empty or unreadable.
    pub fn discover_modem(&self) -> Option<ModemHandle> {
        match self.list_modems() {
            Ok(handles) => match handles.into_iter().next() {
                Some(handle) => {
                    tracing::info!("📡 Using modem {}", handle);
                    Some(handle)
                }
                None => {
                    tracing::warn!("{}", ModemError::NoModem);
                    None
                }
            },
            Err(e) => {
                tracing::error!("❌ Modem discovery failed: {}", e);
                None
            }
        }
    }

    /// Every usable handle in `modem-list`, in reported order. Malformed entries are skipped.
    pub fn list_modems(&self) -> Result<Vec<ModemHandle>> {
        let output = self.device.list_modems()?;
        let data = self.parser.parse(&output)?;

        let entries = match data.get("modem-list") {
            Some(Value::Array(entries)) => entries,
            Some(Value::Null) | None => return Ok(Vec::new()),
            Some(other) => {
                return Err(ModemError::ResponseParse {
                    message: format!("'modem-list' is not a list: {}", other),
                })
            }
        };

        let mut handles = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.as_str().and_then(last_path_segment) {
                Some(id) => handles.push(ModemHandle::new(id)),
                None => tracing::warn!("⚠️ Ignoring unexpected modem-list entry: {}", entry),
            }
        }

        tracing::debug!("Found {} modem(s)", handles.len());
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::FakeDevice;

    fn discover(list_output: &str) -> Option<ModemHandle> {
        let device = FakeDevice::new().with_modem_list(list_output);
        let parser = ResponseParser::default();
        ModemLocator::new(&device, &parser).discover_modem()
    }

    #[test]
    fn test_discover_first_modem_id() {
        let handle = discover(r#"{"modem-list": ["/org/freedesktop/ModemManager1/Modem/3"]}"#);
        assert_eq!(handle, Some(ModemHandle::new("3")));
    }

    #[test]
    fn test_discover_takes_first_entry() {
        let handle = discover(
            r#"{"modem-list": ["/org/freedesktop/ModemManager1/Modem/5/", "/org/freedesktop/ModemManager1/Modem/1"]}"#,
        );
        assert_eq!(handle.unwrap().id(), "5");
    }

    #[test]
    fn test_malformed_entries_do_not_hide_valid_modems() {
        let handle = discover(r#"{"modem-list": ["/org/freedesktop/ModemManager1/Modem/3", 5]}"#);
        assert_eq!(handle, Some(ModemHandle::new("3")));

        let handle = discover(r#"{"modem-list": ["/org/freedesktop/ModemManager1/Modem/3", ""]}"#);
        assert_eq!(handle, Some(ModemHandle::new("3")));

        let device = FakeDevice::new()
            .with_modem_list(r#"{"modem-list": [null, "/org/freedesktop/ModemManager1/Modem/1", "/"]}"#);
        let parser = ResponseParser::default();
        let handles = ModemLocator::new(&device, &parser).list_modems().unwrap();
        assert_eq!(handles, vec![ModemHandle::new("1")]);
    }

    #[test]
    fn test_discover_empty_or_missing_list() {
        assert_eq!(discover(r#"{"modem-list": []}"#), None);
        assert_eq!(discover(r#"{}"#), None);
        assert_eq!(discover(r#"{"modem-list": "oops"}"#), None);
        assert_eq!(discover("mmcli: error"), None);
    }

    #[test]
    fn test_discover_command_failure() {
        let device = FakeDevice::new();
        let parser = ResponseParser::default();
        assert_eq!(ModemLocator::new(&device, &parser).discover_modem(), None);
    }
}
