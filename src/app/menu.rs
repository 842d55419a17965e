//! Interactive text menu around `SmsClient`.

use std::io::{self, BufRead, Write};

use crate::app::output::{write_history, write_messages, write_number, write_send_outcome};
use crate::core::client::SmsClient;
use crate::domain::model::ModemHandle;
use crate::domain::ports::{DeviceInterface, HistoryLog};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

pub struct Menu<'a, D: DeviceInterface, H: HistoryLog, R: BufRead, W: Write> {
    client: &'a SmsClient<D, H>,
    input: R,
    output: W,
    clear_screen: bool,
}

impl<'a, D: DeviceInterface, H: HistoryLog, R: BufRead, W: Write> Menu<'a, D, H, R, W> {
    pub fn new(client: &'a SmsClient<D, H>, input: R, output: W) -> Self {
        Self {
            client,
            input,
            output,
            clear_screen: true,
        }
    }

    pub fn without_clear_screen(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user picks "Exit" or input ends.
    pub fn run(&mut self, handle: &ModemHandle) -> io::Result<()> {
        loop {
            if self.clear_screen {
                write!(self.output, "{}", CLEAR_SCREEN)?;
            }

            let state = self.client.query_state(handle);

            writeln!(self.output, "\n--- MMCli SMS CLIENT ---")?;
            writeln!(self.output, "Modem ID: {}", handle)?;
            writeln!(self.output, "1) Enable modem")?;
            writeln!(self.output, "2) Disable modem")?;
            writeln!(self.output, "3) Display telephone number")?;
            writeln!(self.output, "4) Send SMS")?;
            writeln!(self.output, "5) Check received SMS")?;
            writeln!(self.output, "6) Exit")?;

            let Some(choice) = self.prompt("Select action (1-6): ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.toggle(handle, true)?,
                "2" => self.toggle(handle, false)?,
                "3" => write_number(&mut self.output, state.as_ref())?,
                "4" => self.send(handle)?,
                "5" => {
                    let messages = self.client.list_messages(handle);
                    write_messages(&mut self.output, &messages)?;
                }
                "6" => return Ok(()),
                _ => writeln!(self.output, "Invalid choice, try again.")?,
            }

            if self.prompt("\nPress Enter to continue...")?.is_none() {
                return Ok(());
            }
        }
    }

    /// Prints `message` and reads one trimmed line; `None` at end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn toggle(&mut self, handle: &ModemHandle, enable: bool) -> io::Result<()> {
        if self.client.set_enabled(handle, enable) {
            writeln!(self.output, "{}", if enable { "Modem enabled." } else { "Modem disabled." })
        } else {
            writeln!(self.output, "Error changing modem state.")
        }
    }

    fn send(&mut self, handle: &ModemHandle) -> io::Result<()> {
        let Some(choice) = self.prompt("Send SMS - choose: [h]istory / [t]ype: ")? else {
            return Ok(());
        };

        let number = if choice.eq_ignore_ascii_case("h") {
            match self.choose_from_history()? {
                Some(number) => number,
                None => return Ok(()),
            }
        } else {
            match self.prompt("Enter telephone number (with country code, e.g. +48123456789): ")? {
                Some(number) if !number.is_empty() => number,
                _ => return writeln!(self.output, "No number provided."),
            }
        };

        let text = match self.prompt("Enter message text: ")? {
            Some(text) if !text.is_empty() => text,
            _ => return writeln!(self.output, "No message provided."),
        };

        let outcome = self.client.send_sms(handle, &number, &text);
        write_send_outcome(&mut self.output, &outcome)
    }

    fn choose_from_history(&mut self) -> io::Result<Option<String>> {
        let entries = match self.client.recent_numbers() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("❌ Failed to read history: {}", e);
                writeln!(self.output, "{}", e.user_friendly_message())?;
                return Ok(None);
            }
        };

        write_history(&mut self.output, &entries)?;
        if entries.is_empty() {
            return Ok(None);
        }

        let selected = self
            .prompt("Select number index: ")?
            .and_then(|answer| answer.parse::<usize>().ok())
            .filter(|idx| (1..=entries.len()).contains(idx))
            .map(|idx| entries[idx - 1].telephone_number.clone());

        if selected.is_none() {
            writeln!(self.output, "Invalid selection.")?;
        }
        Ok(selected)
    }
}
