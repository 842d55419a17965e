use std::cell::RefCell;
use std::collections::HashMap;

use crate::domain::ports::DeviceInterface;
use crate::utils::error::{ModemError, Result};

/// Scripted device that records every invocation.
#[derive(Default)]
pub struct FakeDevice {
    modem_list: Option<String>,
    modem_details: HashMap<String, String>,
    enable_ok: bool,
    create_output: Option<String>,
    send_ok: bool,
    message_list: Option<String>,
    message_details: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

fn failure(command: &str) -> ModemError {
    ModemError::CommandExecution {
        command: command.to_string(),
        code: Some(1),
        stderr: "scripted failure".to_string(),
    }
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modem_list(mut self, output: &str) -> Self {
        self.modem_list = Some(output.to_string());
        self
    }

    pub fn with_modem_detail(mut self, id: &str, output: &str) -> Self {
        self.modem_details.insert(id.to_string(), output.to_string());
        self
    }

    pub fn with_enable_ok(mut self) -> Self {
        self.enable_ok = true;
        self
    }

    pub fn with_create_output(mut self, output: &str) -> Self {
        self.create_output = Some(output.to_string());
        self
    }

    pub fn with_send_ok(mut self) -> Self {
        self.send_ok = true;
        self
    }

    pub fn with_message_list(mut self, output: &str) -> Self {
        self.message_list = Some(output.to_string());
        self
    }

    pub fn with_message_detail(mut self, path: &str, output: &str) -> Self {
        self.message_details.insert(path.to_string(), output.to_string());
        self
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl DeviceInterface for FakeDevice {
    fn list_modems(&self) -> Result<String> {
        self.record("list_modems".to_string());
        self.modem_list.clone().ok_or_else(|| failure("list_modems"))
    }

    fn modem_detail(&self, modem_id: &str) -> Result<String> {
        self.record(format!("modem_detail {}", modem_id));
        self.modem_details
            .get(modem_id)
            .cloned()
            .ok_or_else(|| failure("modem_detail"))
    }

    fn set_enabled(&self, modem_id: &str, enable: bool) -> Result<()> {
        self.record(format!("set_enabled {} {}", modem_id, enable));
        if self.enable_ok {
            Ok(())
        } else {
            Err(failure("set_enabled"))
        }
    }

    fn create_message(&self, modem_id: &str, payload: &str) -> Result<String> {
        self.record(format!("create_message {} {}", modem_id, payload));
        self.create_output.clone().ok_or_else(|| failure("create_message"))
    }

    fn send_message(&self, resource_path: &str) -> Result<()> {
        self.record(format!("send_message {}", resource_path));
        if self.send_ok {
            Ok(())
        } else {
            Err(failure("send_message"))
        }
    }

    fn list_messages(&self, modem_id: &str) -> Result<String> {
        self.record(format!("list_messages {}", modem_id));
        self.message_list.clone().ok_or_else(|| failure("list_messages"))
    }

    fn message_detail(&self, resource_path: &str) -> Result<String> {
        self.record(format!("message_detail {}", resource_path));
        self.message_details
            .get(resource_path)
            .cloned()
            .ok_or_else(|| failure("message_detail"))
    }
}
