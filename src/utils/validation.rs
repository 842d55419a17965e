use crate::utils::error::{ModemError, Result};

/// 儲存在 history 表中的號碼欄位長度上限 (VARCHAR(30))
pub const MAX_PHONE_NUMBER_LEN: usize = 30;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ModemError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ModemError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 資源路徑前綴必須是 `/.../` 形式，後面直接接數字 id
pub fn validate_path_prefix(field_name: &str, prefix: &str) -> Result<()> {
    validate_path(field_name, prefix)?;

    if !prefix.starts_with('/') || !prefix.ends_with('/') {
        return Err(ModemError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: prefix.to_string(),
            reason: "Prefix must start and end with '/'".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ModemError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 電話號碼：可選的 `+` 後接數字，數字間可用空白或 `-` 分隔
pub fn validate_phone_number(number: &str) -> Result<()> {
    let body = number.strip_prefix('+').unwrap_or(number);
    let digits: String = body.chars().filter(|c| !matches!(c, ' ' | '-')).collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModemError::ValidationError {
            message: format!(
                "Invalid telephone number '{}': expected digits with an optional leading '+'",
                number
            ),
        });
    }

    if number.len() > MAX_PHONE_NUMBER_LEN {
        return Err(ModemError::ValidationError {
            message: format!(
                "Telephone number '{}' is longer than {} characters",
                number, MAX_PHONE_NUMBER_LEN
            ),
        });
    }

    Ok(())
}

pub fn validate_message_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ModemError::ValidationError {
            message: "No message provided".to_string(),
        });
    }
    Ok(())
}
