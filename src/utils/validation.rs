use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "filename not provided".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EtlError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// Treats blank values and unresolved `${VAR}` placeholders as absent.
pub fn validate_resolved_value(field_name: &str, value: &Option<String>) -> Result<()> {
    let value = validate_required_field(field_name, value)?;
    if value.trim().is_empty() || (value.contains("${") && value.contains('}')) {
        return Err(EtlError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input", "report.csv").is_ok());
        assert!(validate_path("input", "").is_err());
        assert!(validate_path("input", "bad\0name").is_err());
    }

    #[test]
    fn test_validate_resolved_value() {
        assert!(validate_resolved_value("transfer.password", &Some("s3cret".to_string())).is_ok());
        assert!(validate_resolved_value("transfer.password", &None).is_err());
        assert!(validate_resolved_value("transfer.password", &Some("  ".to_string())).is_err());

        let unresolved = Some("${INVENTORY_FTP_PASSWORD}".to_string());
        assert!(matches!(
            validate_resolved_value("transfer.password", &unresolved),
            Err(EtlError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("transfer.port", 21u16, 1, u16::MAX).is_ok());
        assert!(validate_range("transfer.port", 0u16, 1, u16::MAX).is_err());
    }
}
