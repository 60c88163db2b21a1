#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "audit.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub inventory: InventoryConfig,
    pub database: DatabaseConfig,
    pub links: LinksConfig,
}

/// Remote inventory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub endpoint: String,
    pub access_code: String,
    pub secret_key: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.esimaccess.com/api/v1/open/package/list".to_string(),
            access_code: String::new(),
            secret_key: String::new(),
        }
    }
}

/// Internal catalog database, reached over ssh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub ssh_host: String,
    pub ssh_user: String,
    pub identity_file: String,
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub table: String,
    pub unlimited_column: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            ssh_host: String::new(),
            ssh_user: "root".to_string(),
            identity_file: "~/.ssh/id_ed25519".to_string(),
            db_host: "localhost".to_string(),
            db_user: "strapi".to_string(),
            db_password: String::new(),
            db_name: "esim0_strapi".to_string(),
            table: "products".to_string(),
            unlimited_column: "is_unlimited".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn total_query(&self) -> String {
        format!("SELECT COUNT(*) FROM {};", self.table)
    }

    pub fn unlimited_query(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {} = true;",
            self.table, self.unlimited_column
        )
    }
}

/// Public filtering API and the filter links to check against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub base_url: String,
    pub page_size: u32,
    pub checks: Vec<LinkCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCheck {
    pub label: String,
    pub filter: String,
}

impl LinkCheck {
    pub fn new(label: &str, filter: &str) -> Self {
        Self {
            label: label.to_string(),
            filter: filter.to_string(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.esimfree.store/api/products".to_string(),
            page_size: 1,
            checks: vec![
                LinkCheck::new("Unlimited", "filters[isUnlimited][]=true"),
                LinkCheck::new("Global", "filters[type][]=global"),
                LinkCheck::new("Local", "filters[type][]=local"),
                LinkCheck::new("Region (EU)", "filters[region][]=EU"),
                LinkCheck::new("Country (ES)", "filters[country][]=ES"),
                LinkCheck::new("Name (Morocco)", "filters[name][]=Morocco"),
            ],
        }
    }
}

impl AuditConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            AuditError::ConfigValidationError {
                field: path.as_ref().display().to_string(),
                message: format!("Cannot read config file: {}", e),
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, built-in defaults otherwise.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "{} not found, using built-in defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// Parses the document first, then fills `${VAR}` placeholders inside string values, so
    /// substituted values are never reinterpreted as TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| AuditError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AuditError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let mut value = toml::Value::Table(table);
        Self::substitute_env_vars(&re, &mut value);

        value.try_into().map_err(|e| AuditError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as `${VAR}` for validation to report.
    fn substitute_env_vars(re: &Regex, value: &mut toml::Value) {
        match value {
            toml::Value::String(s) => {
                let replaced = re.replace_all(s, |caps: &regex::Captures| {
                    let var_name = &caps[1];
                    std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
                });
                *s = replaced.into_owned();
            }
            toml::Value::Array(items) => {
                for item in items {
                    Self::substitute_env_vars(re, item);
                }
            }
            toml::Value::Table(table) => {
                for (_, item) in table.iter_mut() {
                    Self::substitute_env_vars(re, item);
                }
            }
            _ => {}
        }
    }
}

impl Validate for InventoryConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("inventory.endpoint", &self.endpoint)?;
        validation::validate_required_string("inventory.access_code", &self.access_code)?;
        validation::validate_required_string("inventory.secret_key", &self.secret_key)?;
        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_required_string("database.ssh_host", &self.ssh_host)?;
        validation::validate_required_string("database.ssh_user", &self.ssh_user)?;
        validation::validate_path("database.identity_file", &self.identity_file)?;
        validation::validate_required_string("database.db_host", &self.db_host)?;
        validation::validate_required_string("database.db_user", &self.db_user)?;
        validation::validate_required_string("database.db_password", &self.db_password)?;
        validation::validate_sql_identifier("database.db_name", &self.db_name)?;
        validation::validate_sql_identifier("database.table", &self.table)?;
        validation::validate_sql_identifier("database.unlimited_column", &self.unlimited_column)?;
        Ok(())
    }
}

impl Validate for LinksConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("links.base_url", &self.base_url)?;
        validation::validate_range("links.page_size", self.page_size, 1, 100)?;

        if self.checks.is_empty() {
            return Err(AuditError::ConfigValidationError {
                field: "links.checks".to_string(),
                message: "At least one link check is required".to_string(),
            });
        }

        for (i, check) in self.checks.iter().enumerate() {
            validation::validate_required_string(&format!("links.checks[{}].label", i), &check.label)?;
            validation::validate_required_string(
                &format!("links.checks[{}].filter", i),
                &check.filter,
            )?;
            if check.filter.starts_with('?') || check.filter.contains("pagination[") {
                return Err(AuditError::InvalidConfigValueError {
                    field: format!("links.checks[{}].filter", i),
                    value: check.filter.clone(),
                    reason: "Filter must be a bare query string without '?' or pagination".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Validate for AuditConfig {
    fn validate(&self) -> Result<()> {
        self.inventory.validate()?;
        self.database.validate()?;
        self.links.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn complete_toml() -> &'static str {
        r#"
[inventory]
access_code = "code"
secret_key = "secret"

[database]
ssh_host = "10.0.0.5"
db_password = "pw"
"#
    }

    #[test]
    fn test_defaults_reproduce_fixed_links() {
        let config = AuditConfig::default();
        assert_eq!(config.links.page_size, 1);
        assert_eq!(config.links.checks.len(), 6);
        assert_eq!(config.links.checks[3], LinkCheck::new("Region (EU)", "filters[region][]=EU"));
        assert_eq!(config.database.total_query(), "SELECT COUNT(*) FROM products;");
        assert_eq!(
            config.database.unlimited_query(),
            "SELECT COUNT(*) FROM products WHERE is_unlimited = true;"
        );
    }

    #[test]
    fn test_partial_toml_keeps_section_defaults() {
        let config = AuditConfig::from_toml_str(complete_toml()).unwrap();

        assert_eq!(config.inventory.access_code, "code");
        assert_eq!(
            config.inventory.endpoint,
            "https://api.esimaccess.com/api/v1/open/package/list"
        );
        assert_eq!(config.database.ssh_host, "10.0.0.5");
        assert_eq!(config.database.db_name, "esim0_strapi");
        assert_eq!(config.links.checks.len(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CATALOG_AUDIT_TEST_SECRET", "s3cr3t");

        let config = AuditConfig::from_toml_str(
            r#"
[inventory]
access_code = "code"
secret_key = "${CATALOG_AUDIT_TEST_SECRET}"
"#,
        )
        .unwrap();
        assert_eq!(config.inventory.secret_key, "s3cr3t");
        assert!(config.inventory.validate().is_ok());

        std::env::remove_var("CATALOG_AUDIT_TEST_SECRET");
    }

    #[test]
    fn test_env_values_are_taken_verbatim() {
        std::env::set_var("CATALOG_AUDIT_TEST_DB_PASSWORD", "pa\"ss\\w\tend");

        let config = AuditConfig::from_toml_str(
            r#"
[database]
ssh_host = "10.0.0.5"
db_password = "${CATALOG_AUDIT_TEST_DB_PASSWORD}"
"#,
        )
        .unwrap();
        assert_eq!(config.database.db_password, "pa\"ss\\w\tend");
        assert!(config.database.validate().is_ok());

        std::env::remove_var("CATALOG_AUDIT_TEST_DB_PASSWORD");
    }

    #[test]
    fn test_placeholders_in_link_tables_are_substituted() {
        std::env::set_var("CATALOG_AUDIT_TEST_COUNTRY", "PT");

        let config = AuditConfig::from_toml_str(
            r#"
[[links.checks]]
label = "Country (${CATALOG_AUDIT_TEST_COUNTRY})"
filter = "filters[country][]=${CATALOG_AUDIT_TEST_COUNTRY}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.links.checks,
            vec![LinkCheck::new("Country (PT)", "filters[country][]=PT")]
        );

        std::env::remove_var("CATALOG_AUDIT_TEST_COUNTRY");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = AuditConfig::from_toml_str(
            r#"
[inventory]
access_code = "${CATALOG_AUDIT_TEST_NEVER_SET}"
secret_key = "secret"
"#,
        )
        .unwrap();
        let err = config.inventory.validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("CATALOG_AUDIT_TEST_NEVER_SET"));
    }

    #[test]
    fn test_custom_links_replace_defaults() {
        let config = AuditConfig::from_toml_str(
            r#"
[links]
base_url = "http://localhost:1337/api/products"

[[links.checks]]
label = "Country (FR)"
filter = "filters[country][]=FR"
"#,
        )
        .unwrap();

        assert_eq!(config.links.page_size, 1);
        assert_eq!(config.links.checks, vec![LinkCheck::new("Country (FR)", "filters[country][]=FR")]);
        assert!(config.links.validate().is_ok());
    }

    #[test]
    fn test_links_validation() {
        let mut links = LinksConfig::default();
        links.page_size = 0;
        assert!(links.validate().is_err());

        let mut links = LinksConfig::default();
        links.checks.push(LinkCheck::new("Paged", "filters[type][]=local&pagination[limit]=5"));
        assert!(links.validate().is_err());

        let mut links = LinksConfig::default();
        links.checks.clear();
        assert!(links.validate().is_err());
    }

    #[test]
    fn test_database_identifiers_are_checked() {
        let mut config = AuditConfig::from_toml_str(complete_toml()).unwrap();
        config.database.table = "products; DELETE FROM products".to_string();
        assert!(config.database.validate().is_err());
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let config = AuditConfig::default();
        assert!(matches!(
            config.inventory.validate(),
            Err(AuditError::MissingConfigError { .. })
        ));
        assert!(config.database.validate().is_err());
        assert!(config.links.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        let err = AuditConfig::from_toml_str("[inventory\nendpoint = 1").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(complete_toml().as_bytes()).unwrap();

        let config = AuditConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.inventory.secret_key, "secret");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig::from_file_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.links.checks.len(), 6);

        assert!(AuditConfig::from_file(dir.path().join("absent.toml")).is_err());
    }
}
