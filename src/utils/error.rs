use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModemError {
    #[error("No modem found")]
    NoModem,

    #[error("Command `{command}` failed with exit code {code:?}: {stderr}")]
    CommandExecution {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to parse response: {message}")]
    ResponseParse { message: String },

    #[error("No SMS path found in output: {output}")]
    PathNotFound { output: String },

    #[error("Failed to read SMS {path}: {source}")]
    PartialRead {
        path: String,
        #[source]
        source: Box<ModemError>,
    },

    #[error("History storage error: {0}")]
    History(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl From<serde_json::Error> for ModemError {
    fn from(err: serde_json::Error) -> Self {
        ModemError::ResponseParse {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Device,
    Protocol,
    Storage,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ModemError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ModemError::NoModem | ModemError::CommandExecution { .. } | ModemError::Io(_) => {
                ErrorCategory::Device
            }
            ModemError::ResponseParse { .. }
            | ModemError::PathNotFound { .. }
            | ModemError::PartialRead { .. } => ErrorCategory::Protocol,
            ModemError::History(_) => ErrorCategory::Storage,
            ModemError::ConfigError { .. }
            | ModemError::ConfigValidationError { .. }
            | ModemError::InvalidConfigValueError { .. }
            | ModemError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ModemError::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ModemError::PartialRead { .. } => ErrorSeverity::Low,
            ModemError::CommandExecution { .. }
            | ModemError::ResponseParse { .. }
            | ModemError::PathNotFound { .. } => ErrorSeverity::Medium,
            ModemError::NoModem
            | ModemError::ValidationError { .. }
            | ModemError::ConfigError { .. }
            | ModemError::ConfigValidationError { .. }
            | ModemError::InvalidConfigValueError { .. }
            | ModemError::MissingConfigError { .. } => ErrorSeverity::High,
            ModemError::History(_) | ModemError::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ModemError::NoModem => "Check that the modem is plugged in and ModemManager is running (mmcli -L)",
            ModemError::CommandExecution { .. } => "Run the same mmcli command manually to inspect the failure",
            ModemError::ResponseParse { .. } => "Check that the installed mmcli supports --output-json",
            ModemError::PathNotFound { .. } => "Make sure the modem is enabled and registered before sending",
            ModemError::PartialRead { .. } => "The message may have been deleted meanwhile; list the inbox again",
            ModemError::History(_) => "Check that the history database file is writable and not corrupted",
            ModemError::Io(_) => "Check that the mmcli binary exists and is executable",
            ModemError::ConfigError { .. }
            | ModemError::ConfigValidationError { .. }
            | ModemError::InvalidConfigValueError { .. }
            | ModemError::MissingConfigError { .. } => "Fix the configuration file or command line arguments",
            ModemError::ValidationError { .. } => "Check the telephone number and message text",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ModemError::NoModem => "No modem available.".to_string(),
            ModemError::CommandExecution { command, .. } => {
                format!("Modem command failed: {}", command)
            }
            ModemError::PathNotFound { .. } => {
                "Failed to create SMS (no SMS path found).".to_string()
            }
            ModemError::History(_) => "Could not access the message history.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModemError>;
