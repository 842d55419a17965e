use std::collections::HashSet;

use crate::core::inbox::SmsInbox;
use crate::core::locator::ModemLocator;
use crate::core::parser::ResponseParser;
use crate::core::sender::SmsSender;
use crate::core::state::ModemStateController;
use crate::domain::model::{HistoryEntry, InboxReport, ModemHandle, ModemState, SendOutcome, SmsMessage};
use crate::domain::ports::{DeviceInterface, HistoryLog};
use crate::utils::error::Result;

/// Entry point for the modem workflow: owns the device interface, the history log and the parser.
pub struct SmsClient<D: DeviceInterface, H: HistoryLog> {
    device: D,
    history: H,
    parser: ResponseParser,
}

impl<D: DeviceInterface, H: HistoryLog> SmsClient<D, H> {
    pub fn new(device: D, history: H, parser: ResponseParser) -> Self {
        Self {
            device,
            history,
            parser,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn history_log(&self) -> &H {
        &self.history
    }

    pub fn discover_modem(&self) -> Option<ModemHandle> {
        ModemLocator::new(&self.device, &self.parser).discover_modem()
    }

    pub fn list_modems(&self) -> Result<Vec<ModemHandle>> {
        ModemLocator::new(&self.device, &self.parser).list_modems()
    }

    pub fn query_state(&self, handle: &ModemHandle) -> Option<ModemState> {
        ModemStateController::new(&self.device, &self.parser).query_state(handle)
    }

    pub fn set_enabled(&self, handle: &ModemHandle, enable: bool) -> bool {
        ModemStateController::new(&self.device, &self.parser).set_enabled(handle, enable)
    }

    pub fn send_sms(&self, handle: &ModemHandle, telephone_number: &str, text: &str) -> SendOutcome {
        SmsSender::new(&self.device, &self.history, &self.parser).send(handle, telephone_number, text)
    }

    pub fn list_messages(&self, handle: &ModemHandle) -> Vec<SmsMessage> {
        SmsInbox::new(&self.device, &self.parser).list_messages(handle)
    }

    pub fn read_inbox(&self, handle: &ModemHandle) -> InboxReport {
        SmsInbox::new(&self.device, &self.parser).read_inbox(handle)
    }

    /// All history entries, most recent first.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.history.query_all()
    }

    /// Latest entry per number, most recent first.
    pub fn recent_numbers(&self) -> Result<Vec<HistoryEntry>> {
        let mut seen = HashSet::new();
        let mut entries = self.history.query_all()?;
        entries.retain(|entry| seen.insert(entry.telephone_number.clone()));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::history::MemoryHistory;
    use crate::core::testing::FakeDevice;
    use chrono::{Duration, Utc};

    #[test]
    fn test_recent_numbers_deduplicates() {
        let history = MemoryHistory::new();
        let now = Utc::now();
        history.append("+1", now - Duration::minutes(10)).unwrap();
        history.append("+2", now - Duration::minutes(5)).unwrap();
        history.append("+1", now).unwrap();

        let client = SmsClient::new(FakeDevice::new(), history, ResponseParser::default());
        let recent = client.recent_numbers().unwrap();

        let numbers: Vec<&str> = recent.iter().map(|e| e.telephone_number.as_str()).collect();
        assert_eq!(numbers, vec!["+1", "+2"]);
        assert_eq!(recent[0].last_message_time, now);
        assert_eq!(client.history().unwrap().len(), 3);
    }
}
