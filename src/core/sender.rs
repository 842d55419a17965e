use chrono::Utc;

use crate::core::parser::ResponseParser;
use crate::domain::model::{ModemHandle, SendOutcome, SmsResource};
use crate::domain::ports::{DeviceInterface, HistoryLog};
use crate::utils::error::{ModemError, Result};
use crate::utils::validation::{validate_message_text, validate_phone_number};

/// `text='...',number='...'` argument for the create step.
///
/// Values are quoted with `'`, or with `"` when the text itself contains `'`.
pub fn encode_create_payload(text: &str, number: &str) -> Result<String> {
    let quote = match (text.contains('\''), text.contains('"')) {
        (false, _) => '\'',
        (true, false) => '"',
        (true, true) => {
            return Err(ModemError::ValidationError {
                message: "Message text cannot contain both single and double quotes".to_string(),
            })
        }
    };

    Ok(format!(
        "text={q}{text}{q},number={q}{number}{q}",
        q = quote,
        text = text,
        number = number
    ))
}

/// Two-phase send: create the SMS object, then transmit it.
pub struct SmsSender<'a, D: DeviceInterface, H: HistoryLog> {
    device: &'a D,
    history: &'a H,
    parser: &'a ResponseParser,
}

impl<'a, D: DeviceInterface, H: HistoryLog> SmsSender<'a, D, H> {
    pub fn new(device: &'a D, history: &'a H, parser: &'a ResponseParser) -> Self {
        Self {
            device,
            history,
            parser,
        }
    }

    pub fn send(&self, handle: &ModemHandle, telephone_number: &str, text: &str) -> SendOutcome {
        let resource = match self.create(handle, telephone_number, text) {
            Ok(resource) => resource,
            Err(error) => {
                tracing::error!("❌ Failed to create SMS: {}", error);
                return SendOutcome::CreateFailed { error };
            }
        };

        let path = resource.path().to_string();
        if let Err(error) = self.transmit(resource) {
            tracing::error!(
                "❌ SMS {} was created but not sent, leaving it on the modem: {}",
                path,
                error
            );
            return SendOutcome::SendFailed {
                resource: path,
                error,
            };
        }

        tracing::info!("✅ SMS sent successfully to {}", telephone_number);

        let history_recorded = match self.history.append(telephone_number, Utc::now()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("⚠️ SMS sent but history entry was not written: {}", e);
                false
            }
        };

        SendOutcome::Sent {
            resource: path,
            history_recorded,
        }
    }

    /// Phase one. Nothing is created on the device if validation fails.
    pub fn create(&self, handle: &ModemHandle, telephone_number: &str, text: &str) -> Result<SmsResource> {
        validate_phone_number(telephone_number)?;
        validate_message_text(text)?;
        let payload = encode_create_payload(text, telephone_number)?;

        let output = self.device.create_message(handle.id(), &payload)?;
        let resource = self
            .parser
            .first_sms_path(&output)
            .ok_or_else(|| ModemError::PathNotFound {
                output: output.trim().to_string(),
            })?;

        tracing::debug!("Created SMS {}", resource.path());
        Ok(resource)
    }

    /// Phase two. Consumes the resource.
    pub fn transmit(&self, resource: SmsResource) -> Result<String> {
        self.device.send_message(resource.path())?;
        Ok(resource.into_path())
    }
}
