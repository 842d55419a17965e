use std::io::{self, Write};

use chrono::Local;

use crate::domain::model::{HistoryEntry, ModemHandle, ModemState, SendOutcome, SmsMessage};

pub fn write_state<W: Write>(out: &mut W, handle: &ModemHandle, state: Option<&ModemState>) -> io::Result<()> {
    writeln!(out, "Modem ID: {}", handle)?;
    match state {
        Some(state) => {
            writeln!(out, "State: {}", state.state.as_deref().unwrap_or("unknown"))?;
            writeln!(out, "Enabled: {}", if state.enabled { "yes" } else { "no" })?;
            writeln!(
                out,
                "Telephone number: {}",
                state.telephone_number.as_deref().unwrap_or("not available")
            )
        }
        None => writeln!(out, "State: unknown"),
    }
}

pub fn write_number<W: Write>(out: &mut W, state: Option<&ModemState>) -> io::Result<()> {
    match state.and_then(|s| s.telephone_number.as_deref()) {
        Some(number) => writeln!(out, "Telephone number: {}", number),
        None => writeln!(out, "Telephone number not available."),
    }
}

pub fn write_messages<W: Write>(out: &mut W, messages: &[SmsMessage]) -> io::Result<()> {
    if messages.is_empty() {
        return writeln!(out, "No SMS messages found.");
    }

    for (i, message) in messages.iter().enumerate() {
        writeln!(
            out,
            "{}) From: {}  Time: {}  State: {}",
            i + 1,
            message.sender.as_deref().unwrap_or("unknown"),
            message.timestamp.as_deref().unwrap_or("unknown"),
            message.state.as_deref().unwrap_or("unknown")
        )?;
        writeln!(out, "   Text: {}", message.text.as_deref().unwrap_or("[no text parsed]"))?;
    }
    Ok(())
}

pub fn write_history<W: Write>(out: &mut W, entries: &[HistoryEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No history entries.");
    }

    for (i, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "{}) {}  last: {}",
            i + 1,
            entry.telephone_number,
            entry
                .last_message_time
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
        )?;
    }
    Ok(())
}

pub fn write_send_outcome<W: Write>(out: &mut W, outcome: &SendOutcome) -> io::Result<()> {
    match outcome {
        SendOutcome::Sent { history_recorded, .. } => {
            writeln!(out, "SMS sent successfully.")?;
            if !history_recorded {
                writeln!(out, "Warning: the number was not saved to history.")?;
            }
            Ok(())
        }
        SendOutcome::CreateFailed { error } => writeln!(out, "{}", error.user_friendly_message()),
        SendOutcome::SendFailed { resource, error } => {
            writeln!(out, "SMS {} was created but sending failed: {}", resource, error)?;
            writeln!(out, "The message is left unsent on the modem.")
        }
    }
}
