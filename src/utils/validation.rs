use crate::utils::error::{HospitalError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Rejects absent or whitespace-only values and values longer than `max_chars`.
pub fn validate_required_text(field_name: &str, value: &str, max_chars: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HospitalError::validation(
            field_name,
            "Value is required and cannot be empty",
        ));
    }
    validate_max_length(field_name, value, max_chars)
}

pub fn validate_optional_text(field_name: &str, value: Option<&str>, max_chars: usize) -> Result<()> {
    match value {
        Some(value) => validate_max_length(field_name, value, max_chars),
        None => Ok(()),
    }
}

pub fn validate_max_length(field_name: &str, value: &str, max_chars: usize) -> Result<()> {
    let length = value.chars().count();
    if length > max_chars {
        return Err(HospitalError::validation(
            field_name,
            format!("Length {} exceeds maximum of {} characters", length, max_chars),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HospitalError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(HospitalError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    if path.contains('\0') {
        return Err(HospitalError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}
