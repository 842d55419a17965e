use crate::core::parser::DEFAULT_SMS_PATH_PREFIX;
use crate::core::ConfigProvider;
use crate::utils::error::{ModemError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_path_prefix, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MMCLI_BINARY: &str = "mmcli";
pub const DEFAULT_DATABASE_PATH: &str = "mmclisms.db";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub device: DeviceConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub binary: String,
    pub sms_path_prefix: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_MMCLI_BINARY.to_string(),
            sms_path_prefix: DEFAULT_SMS_PATH_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub database_path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// "compact" (預設) 或 "json"
    pub format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ModemError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ModemError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MMCLI_BIN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ModemError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("device.binary", &self.device.binary)?;
        validate_path_prefix("device.sms_path_prefix", &self.device.sms_path_prefix)?;
        validate_path("history.database_path", &self.history.database_path)?;

        if let Some(format) = &self.logging.format {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format.as_str()) {
                return Err(ModemError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.clone(),
                    reason: format!("Unsupported format. Valid formats: {}", valid_formats.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn json_logging(&self) -> bool {
        self.logging.format.as_deref() == Some("json")
    }
}

impl ConfigProvider for TomlConfig {
    fn mmcli_binary(&self) -> &str {
        &self.device.binary
    }

    fn sms_path_prefix(&self) -> &str {
        &self.device.sms_path_prefix
    }

    fn database_path(&self) -> &str {
        &self.history.database_path
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.mmcli_binary(), "mmcli");
        assert_eq!(config.sms_path_prefix(), "/org/freedesktop/ModemManager1/SMS/");
        assert_eq!(config.database_path(), "mmclisms.db");
        assert!(!config.json_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[device]
binary = "/usr/bin/mmcli"

[history]
database_path = "/var/lib/mmcli-sms/history.db"

[logging]
level = "debug"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.mmcli_binary(), "/usr/bin/mmcli");
        assert_eq!(config.sms_path_prefix(), "/org/freedesktop/ModemManager1/SMS/");
        assert_eq!(config.database_path(), "/var/lib/mmcli-sms/history.db");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert!(config.json_logging());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MMCLI_SMS_TEST_DB", "/tmp/from-env.db");

        let toml_content = r#"
[history]
database_path = "${MMCLI_SMS_TEST_DB}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.database_path(), "/tmp/from-env.db");

        std::env::remove_var("MMCLI_SMS_TEST_DB");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[device]
sms_path_prefix = "/org/freedesktop/ModemManager1/SMS"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap();
        assert!(config.validate().is_err());

        assert!(TomlConfig::from_toml_str("[device]\nbinary = 3\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[device]\nbinary = \"my-mmcli\"\n").unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.mmcli_binary(), "my-mmcli");
    }
}
