use serde_json::Value;

use crate::core::parser::ResponseParser;
use crate::domain::model::{ModemHandle, ModemState};
use crate::domain::ports::DeviceInterface;
use crate::utils::error::{ModemError, Result};

const ENABLED_STATE: &str = "enabled";

pub struct ModemStateController<'a, D: DeviceInterface> {
    device: &'a D,
    parser: &'a ResponseParser,
}

impl<'a, D: DeviceInterface> ModemStateController<'a, D> {
    pub fn new(device: &'a D, parser: &'a ResponseParser) -> Self {
        Self { device, parser }
    }

    /// 讀取目前狀態；`None` 代表狀態未知，不是「已停用」
    pub fn query_state(&self, handle: &ModemHandle) -> Option<ModemState> {
        match self.try_query_state(handle) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::error!("❌ Error reading modem {}: {}", handle, e);
                None
            }
        }
    }

    fn try_query_state(&self, handle: &ModemHandle) -> Result<ModemState> {
        let output = self.device.modem_detail(handle.id())?;
        let data = self.parser.parse(&output)?;
        modem_state_from_detail(&data)
    }

    /// 啟用或停用數據機；不快取結果，要確認請再呼叫 `query_state`
    pub fn set_enabled(&self, handle: &ModemHandle, enable: bool) -> bool {
        match self.device.set_enabled(handle.id(), enable) {
            Ok(()) => {
                tracing::info!("✅ Modem {} {}", handle, if enable { "enabled" } else { "disabled" });
                true
            }
            Err(e) => {
                tracing::error!("❌ Error changing modem state: {}", e);
                false
            }
        }
    }
}

/// `generic` lives under `modem` in mmcli output; a bare `generic` at the root is accepted too.
///
/// A response without a string `generic.state` is malformed: the state is unknown, not disabled.
pub fn modem_state_from_detail(data: &Value) -> Result<ModemState> {
    let malformed = |message: &str| ModemError::ResponseParse {
        message: message.to_string(),
    };

    let root = data
        .as_object()
        .ok_or_else(|| malformed("modem detail is not an object"))?;

    let generic = match root.get("modem") {
        Some(Value::Object(modem)) => modem.get("generic"),
        Some(_) => return Err(malformed("'modem' is not an object")),
        None => root.get("generic"),
    }
    .and_then(Value::as_object)
    .ok_or_else(|| malformed("modem detail has no 'generic' object"))?;

    let state = generic
        .get("state")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("'generic.state' is missing or not a string"))?;

    let telephone_number = generic
        .get("own-numbers")
        .and_then(Value::as_array)
        .and_then(|numbers| numbers.first())
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ModemState {
        telephone_number,
        enabled: state == ENABLED_STATE,
        state: Some(state.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::FakeDevice;

    fn query(detail: &str) -> Option<ModemState> {
        let device = FakeDevice::new().with_modem_detail("0", detail);
        let parser = ResponseParser::default();
        ModemStateController::new(&device, &parser).query_state(&ModemHandle::new("0"))
    }

    #[test]
    fn test_query_state_flat_generic() {
        let state = query(r#"{"generic": {"own-numbers": ["+48123456789"], "state": "enabled"}}"#).unwrap();
        assert_eq!(state.telephone_number.as_deref(), Some("+48123456789"));
        assert!(state.enabled);
    }

    #[test]
    fn test_query_state_under_modem_key() {
        let state = query(r#"{"modem": {"generic": {"own-numbers": [], "state": "registered"}}}"#).unwrap();
        assert_eq!(state.telephone_number, None);
        assert!(!state.enabled);
        assert_eq!(state.state.as_deref(), Some("registered"));
    }

    #[test]
    fn test_query_state_unknown_on_failure() {
        assert_eq!(query("not json"), None);
        assert_eq!(query("[1, 2]"), None);
    }

    #[test]
    fn test_query_state_unknown_on_malformed_detail() {
        assert_eq!(query("{}"), None);
        assert_eq!(query(r#"{"modem": {}}"#), None);
        assert_eq!(query(r#"{"modem": "x"}"#), None);
        assert_eq!(query(r#"{"modem": {"generic": {"own-numbers": ["+1"]}}}"#), None);
        assert_eq!(query(r#"{"generic": {"state": 8}}"#), None);
        assert!(modem_state_from_detail(&serde_json::json!({"modem": {"generic": "enabled"}})).is_err());
    }

    #[test]
    fn test_query_state_command_failure_is_unknown() {
        let device = FakeDevice::new();
        let parser = ResponseParser::default();
        let controller = ModemStateController::new(&device, &parser);
        assert_eq!(controller.query_state(&ModemHandle::new("0")), None);
    }

    #[test]
    fn test_set_enabled_reports_failure() {
        let parser = ResponseParser::default();
        let handle = ModemHandle::new("2");

        let device = FakeDevice::new().with_enable_ok();
        assert!(ModemStateController::new(&device, &parser).set_enabled(&handle, false));
        assert_eq!(device.calls.borrow().as_slice(), ["set_enabled 2 false"]);

        let failing = FakeDevice::new();
        assert!(!ModemStateController::new(&failing, &parser).set_enabled(&handle, true));
    }
}
