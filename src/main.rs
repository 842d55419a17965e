use clap::Parser;
use mmcli_sms::app::menu::Menu;
use mmcli_sms::app::output::{write_history, write_messages, write_number, write_send_outcome, write_state};
use mmcli_sms::core::ConfigProvider;
use mmcli_sms::utils::error::ErrorSeverity;
use mmcli_sms::utils::logger;
use mmcli_sms::{CliCommand, CliConfig, MmcliDevice, ModemError, ResponseParser, SmsClient, SqliteHistory};
use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先讀設定，才知道日誌格式
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose, None);
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let level = config.logging.level.as_deref();
    if config.json_logging() {
        logger::init_json_logger(cli.verbose, level);
    } else {
        logger::init_cli_logger(cli.verbose, level);
    }

    tracing::info!("Starting mmcli-sms");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = run(&cli, &config) {
        tracing::error!(
            "❌ mmcli-sms failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run(cli: &CliConfig, config: &mmcli_sms::TomlConfig) -> Result<(), ModemError> {
    let device = MmcliDevice::new(config.mmcli_binary());
    let history = SqliteHistory::open(config.database_path())?;
    let parser = ResponseParser::new(config.sms_path_prefix())?;
    let client = SmsClient::new(device, history, parser);

    let discover = || client.discover_modem().ok_or(ModemError::NoModem);
    let mut out = io::stdout().lock();

    match cli.command() {
        CliCommand::History => {
            let entries = client.history()?;
            write_history(&mut out, &entries)?;
        }
        CliCommand::Status => {
            let handle = discover()?;
            let state = client.query_state(&handle);
            write_state(&mut out, &handle, state.as_ref())?;
        }
        command @ (CliCommand::Enable | CliCommand::Disable) => {
            let handle = discover()?;
            let enable = matches!(command, CliCommand::Enable);
            if client.set_enabled(&handle, enable) {
                writeln!(out, "{}", if enable { "Modem enabled." } else { "Modem disabled." })?;
            } else {
                writeln!(out, "Error changing modem state.")?;
                std::process::exit(2);
            }
        }
        CliCommand::Number => {
            let handle = discover()?;
            let state = client.query_state(&handle);
            write_number(&mut out, state.as_ref())?;
        }
        CliCommand::Send { to, history, text } => {
            let number = match (to, history) {
                (Some(number), _) => number,
                (None, Some(index)) => {
                    let entries = client.recent_numbers()?;
                    index
                        .checked_sub(1)
                        .and_then(|i| entries.into_iter().nth(i))
                        .map(|entry| entry.telephone_number)
                        .ok_or_else(|| ModemError::ValidationError {
                            message: format!("no history entry #{}", index),
                        })?
                }
                (None, None) => {
                    return Err(ModemError::MissingConfigError {
                        field: "--to".to_string(),
                    })
                }
            };

            let handle = discover()?;
            let outcome = client.send_sms(&handle, &number, &text);
            write_send_outcome(&mut out, &outcome)?;
            if !outcome.is_sent() {
                std::process::exit(2);
            }
        }
        CliCommand::Inbox { json } => {
            let handle = discover()?;
            let report = client.read_inbox(&handle);
            if json {
                serde_json::to_writer_pretty(&mut out, &report.messages)?;
                writeln!(out)?;
            } else {
                write_messages(&mut out, &report.messages)?;
            }
            if !report.skipped.is_empty() {
                eprintln!("⚠️ {} message(s) could not be read", report.skipped.len());
            }
        }
        CliCommand::Menu => {
            let handle = discover()?;
            drop(out);
            let mut menu = Menu::new(&client, io::stdin().lock(), io::stdout());
            menu.run(&handle)?;
        }
    }

    Ok(())
}
