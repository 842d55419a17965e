pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliCommand, CliConfig};

pub use crate::adapters::{MemoryHistory, MmcliDevice, SqliteHistory};
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{client::SmsClient, parser::ResponseParser};
pub use crate::utils::error::{ModemError, Result};
