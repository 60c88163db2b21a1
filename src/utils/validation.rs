use crate::utils::error::{AuditError, Result};
use regex::Regex;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AuditError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Rejects empty values and `${VAR}` placeholders left behind by env substitution.
pub fn validate_required_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuditError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    if let Some(name) = unresolved_placeholder(value) {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Environment variable {} is not set", name),
        });
    }

    Ok(())
}

fn unresolved_placeholder(value: &str) -> Option<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").ok()?;
    re.captures(value).map(|caps| caps[1].to_string())
}

/// Table and column names are interpolated into SQL, so only plain identifiers pass.
pub fn validate_sql_identifier(field_name: &str, value: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").map_err(|e| {
        AuditError::ConfigValidationError {
            field: field_name.to_string(),
            message: e.to_string(),
        }
    })?;

    if !re.is_match(value) {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Not a valid SQL identifier".to_string(),
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
        return Err(AuditError::InvalidConfigValueError {
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
    fn test_validate_url() {
        assert!(validate_url("links.base_url", "https://example.com").is_ok());
        assert!(validate_url("links.base_url", "http://example.com").is_ok());
        assert!(validate_url("links.base_url", "").is_err());
        assert!(validate_url("links.base_url", "invalid-url").is_err());
        assert!(validate_url("links.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_required_string() {
        assert!(validate_required_string("inventory.access_code", "abc123").is_ok());
        assert!(matches!(
            validate_required_string("inventory.access_code", "  "),
            Err(AuditError::MissingConfigError { .. })
        ));

        let err = validate_required_string("inventory.access_code", "${ESIM_ACCESS_CODE}")
            .unwrap_err();
        assert!(err.to_string().contains("ESIM_ACCESS_CODE"));
    }

    #[test]
    fn test_validate_sql_identifier() {
        assert!(validate_sql_identifier("database.table", "products").is_ok());
        assert!(validate_sql_identifier("database.table", "_is_unlimited2").is_ok());
        assert!(validate_sql_identifier("database.table", "products; DROP TABLE x").is_err());
        assert!(validate_sql_identifier("database.table", "1products").is_err());
        assert!(validate_sql_identifier("database.table", "").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("links.page_size", 1u32, 1, 100).is_ok());
        assert!(validate_range("links.page_size", 0u32, 1, 100).is_err());
        assert!(validate_range("links.page_size", 101u32, 1, 100).is_err());
    }
}
