pub mod toml_config;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::TomlConfig;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "mmcli-sms")]
    #[command(about = "Send and read SMS through ModemManager (mmcli)")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// mmcli binary to run (overrides the config file)
        #[arg(long, env = "MMCLI_BIN")]
        pub mmcli: Option<String>,

        /// History database path (overrides the config file)
        #[arg(long, env = "MMCLI_SMS_DB")]
        pub database: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Option<CliCommand>,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum CliCommand {
        /// Show modem id, state and telephone number
        Status,
        /// Enable the modem
        Enable,
        /// Disable the modem
        Disable,
        /// Display the modem's own telephone number
        Number,
        /// Send an SMS
        Send {
            /// Recipient number with country code, e.g. +48123456789
            #[arg(long, conflicts_with = "history", required_unless_present = "history")]
            to: Option<String>,

            /// Reuse the n-th number from `history` (1-based)
            #[arg(long)]
            history: Option<usize>,

            /// Message text
            #[arg(long)]
            text: String,
        },
        /// List received SMS
        Inbox {
            /// Print messages as JSON
            #[arg(long)]
            json: bool,
        },
        /// Show numbers previously messaged
        History,
        /// Interactive menu (default)
        Menu,
    }

    impl CliConfig {
        /// 載入設定檔並套用命令列覆蓋
        pub fn resolve(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };

            if let Some(binary) = &self.mmcli {
                config.device.binary = binary.clone();
            }
            if let Some(database) = &self.database {
                config.history.database_path = database.clone();
            }

            config.validate()?;
            Ok(config)
        }

        pub fn command(&self) -> CliCommand {
            self.command.clone().unwrap_or(CliCommand::Menu)
        }
    }

}

#[cfg(feature = "cli")]
pub use cli::{CliCommand, CliConfig};
