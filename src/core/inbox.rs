use serde_json::{Map, Value};

use crate::core::parser::{
    normalize_field, scalar_to_string, ResponseParser, SENDER_KEYS, STATE_KEYS, TEXT_KEYS,
    TIMESTAMP_KEYS,
};
use crate::domain::model::{InboxReport, ModemHandle, SmsMessage, SmsResource};
use crate::domain::ports::DeviceInterface;
use crate::utils::error::{ModemError, Result};

pub struct SmsInbox<'a, D: DeviceInterface> {
    device: &'a D,
    parser: &'a ResponseParser,
}

impl<'a, D: DeviceInterface> SmsInbox<'a, D> {
    pub fn new(device: &'a D, parser: &'a ResponseParser) -> Self {
        Self { device, parser }
    }

    pub fn list_messages(&self, handle: &ModemHandle) -> Vec<SmsMessage> {
        self.read_inbox(handle).messages
    }

    /// 列出所有訊息；單一訊息讀取失敗只會被略過並記錄在 `skipped`
    pub fn read_inbox(&self, handle: &ModemHandle) -> InboxReport {
        let resources = match self.list_resources(handle) {
            Ok(resources) => resources,
            Err(e) => {
                tracing::error!("❌ Error listing SMS: {}", e);
                return InboxReport::default();
            }
        };

        if resources.is_empty() {
            tracing::info!("📭 No SMS messages found");
            return InboxReport::default();
        }

        let mut report = InboxReport::default();
        for resource in resources {
            match self.read_message(&resource) {
                Ok(message) => report.messages.push(message),
                Err(e) => {
                    let error = ModemError::PartialRead {
                        path: resource.path().to_string(),
                        source: Box::new(e),
                    };
                    tracing::warn!("⚠️ {}", error);
                    report.skipped.push(error);
                }
            }
        }

        tracing::info!(
            "📥 Read {} message(s), skipped {}",
            report.messages.len(),
            report.skipped.len()
        );
        report
    }

    /// Distinct message resources ordered by id.
    fn list_resources(&self, handle: &ModemHandle) -> Result<Vec<SmsResource>> {
        let output = self.device.list_messages(handle.id())?;
        let data = self.parser.parse(&output)?;
        let pattern = self.parser.sms_pattern();

        let mut resources: Vec<SmsResource> = self
            .parser
            .sms_paths(&data)
            .iter()
            .filter_map(|path| pattern.parse(path))
            .collect();
        resources.sort();

        tracing::debug!("Found {} SMS path(s)", resources.len());
        Ok(resources)
    }

    fn read_message(&self, resource: &SmsResource) -> Result<SmsMessage> {
        let output = self.device.message_detail(resource.path())?;
        let data = self.parser.parse(&output)?;
        message_from_detail(resource.path(), data)
    }
}

/// Builds the canonical record from a message detail response.
///
/// The record is the object under `sms`, else under `message`, else the root. Fields are
/// looked up on it first, then on its nested objects one level down (`content`,
/// `properties`, ...).
pub fn message_from_detail(resource_path: &str, data: Value) -> Result<SmsMessage> {
    let raw_fields = unwrap_record(data)?;
    let lookup = flatten_one_level(&raw_fields);

    let field = |keys: &[&str]| normalize_field(&lookup, keys).and_then(scalar_to_string);

    Ok(SmsMessage {
        resource_path: resource_path.to_string(),
        sender: field(SENDER_KEYS),
        text: field(TEXT_KEYS),
        timestamp: field(TIMESTAMP_KEYS),
        state: field(STATE_KEYS),
        raw_fields,
    })
}

fn unwrap_record(data: Value) -> Result<Map<String, Value>> {
    let Value::Object(mut root) = data else {
        return Err(ModemError::ResponseParse {
            message: "message detail is not an object".to_string(),
        });
    };

    for key in ["sms", "message"] {
        let usable = matches!(root.get(key), Some(Value::Object(inner)) if !inner.is_empty());
        if usable {
            if let Some(Value::Object(inner)) = root.remove(key) {
                return Ok(inner);
            }
        }
    }

    Ok(root)
}

fn flatten_one_level(record: &Map<String, Value>) -> Map<String, Value> {
    let mut lookup = record.clone();
    for value in record.values() {
        if let Value::Object(nested) = value {
            for (key, nested_value) in nested {
                let occupied = lookup
                    .get(key)
                    .is_some_and(|existing| scalar_to_string(existing).is_some_and(|s| !s.is_empty()));
                if !occupied {
                    lookup.insert(key.clone(), nested_value.clone());
                }
            }
        }
    }
    lookup
}
