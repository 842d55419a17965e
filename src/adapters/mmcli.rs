use std::process::{Command, Output};

use crate::domain::ports::DeviceInterface;
use crate::utils::error::{ModemError, Result};

/// `DeviceInterface` backed by the ModemManager command line client.
///
/// Every call blocks until the `mmcli` process exits.
#[derive(Debug, Clone)]
pub struct MmcliDevice {
    binary: String,
}

impl MmcliDevice {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.binary.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        let command_line = self.command_line(args);
        tracing::debug!("Running: {}", command_line);

        let output = Command::new(&self.binary).args(args).output()?;

        if !output.status.success() {
            return Err(ModemError::CommandExecution {
                command: command_line,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!("{} returned {} bytes", command_line, output.stdout.len());
        Ok(output)
    }

    fn run_stdout(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for MmcliDevice {
    fn default() -> Self {
        Self::new("mmcli")
    }
}

impl DeviceInterface for MmcliDevice {
    fn list_modems(&self) -> Result<String> {
        self.run_stdout(&["-L", "--output-json"])
    }

    fn modem_detail(&self, modem_id: &str) -> Result<String> {
        self.run_stdout(&["-m", modem_id, "--output-json"])
    }

    fn set_enabled(&self, modem_id: &str, enable: bool) -> Result<()> {
        let flag = if enable { "--enable" } else { "--disable" };
        self.run(&["-m", modem_id, flag]).map(|_| ())
    }

    fn create_message(&self, modem_id: &str, payload: &str) -> Result<String> {
        let arg = format!("--messaging-create-sms={}", payload);
        let output = self.run(&["-m", modem_id, &arg])?;

        // The created path is printed on stdout; some versions only write to stderr.
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            Ok(String::from_utf8_lossy(&output.stderr).into_owned())
        } else {
            Ok(stdout.into_owned())
        }
    }

    fn send_message(&self, resource_path: &str) -> Result<()> {
        self.run(&["-s", resource_path, "--send"]).map(|_| ())
    }

    fn list_messages(&self, modem_id: &str) -> Result<String> {
        self.run_stdout(&["-m", modem_id, "--messaging-list-sms", "--output-json"])
    }

    fn message_detail(&self, resource_path: &str) -> Result<String> {
        self.run_stdout(&["-s", resource_path, "--output-json"])
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_io_error() {
        let device = MmcliDevice::new("/nonexistent/mmcli-binary");
        assert!(matches!(device.list_modems(), Err(ModemError::Io(_))));
    }

    #[test]
    fn test_nonzero_exit_is_command_error() {
        let device = MmcliDevice::new("false");
        match device.set_enabled("0", true) {
            Err(ModemError::CommandExecution { command, code, .. }) => {
                assert_eq!(command, "false -m 0 --enable");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_stdout_is_returned() {
        // `echo` ignores the mmcli flags and prints them back
        let device = MmcliDevice::new("echo");
        let output = device.list_modems().unwrap();
        assert_eq!(output.trim(), "-L --output-json");
    }
}
