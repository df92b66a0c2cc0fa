use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "inventory-publish.toml";
pub const DEFAULT_STRUCTURED_FILE: &str = "inventory.json";
/// Control port for both plain FTP and explicit `AUTH TLS` sessions.
pub const DEFAULT_FTP_PORT: u16 = 21;
/// Upper bound on `retention.max_age_days` (about a century).
pub const MAX_AGE_DAYS: i64 = 36_500;

pub const ENV_SERVER: &str = "INVENTORY_FTP_SERVER";
pub const ENV_USERNAME: &str = "INVENTORY_FTP_USER";
pub const ENV_PASSWORD: &str = "INVENTORY_FTP_PASSWORD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub transfer: TransferConfig,
    pub retention: RetentionConfig,
    pub listing: ListingConfig,
    pub output: OutputConfig,
}

/// How the control connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpSecurity {
    Plain,
    /// Connects in the clear, then upgrades with `AUTH TLS` before login.
    ExplicitTls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
    pub port: Option<u16>,
    pub remote_dir: Option<String>,
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub max_age_days: i64,
    pub excluded_sizes: Vec<String>,
    pub excluded_categories: Vec<String>,
    pub min_quantity_exclusive: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub title: String,
    pub stylesheets: Vec<String>,
    pub featured_prefixes: Vec<String>,
    pub hidden_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub structured_file: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            server: None,
            username: None,
            password: None,
            use_tls: true,
            port: None,
            remote_dir: None,
            accept_invalid_certs: false,
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age_days: 180,
            excluded_sizes: [".355L", ".473L", "32OZ", "64OZ", "64 OZ"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_categories: vec!["ACCESS".to_string()],
            min_quantity_exclusive: 1,
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            title: "Inventory".to_string(),
            stylesheets: vec![
                "css/styles.css".to_string(),
                "css/inventory_style.css".to_string(),
            ],
            featured_prefixes: ["BEER", "WINE", "CIDER"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hidden_prefixes: vec!["ACCESS".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            structured_file: DEFAULT_STRUCTURED_FILE.to_string(),
        }
    }
}

impl TransferConfig {
    pub fn security(&self) -> FtpSecurity {
        if self.use_tls {
            FtpSecurity::ExplicitTls
        } else {
            FtpSecurity::Plain
        }
    }

    /// Port to dial. Explicit TLS upgrades a plain control connection, so both
    /// modes default to the standard FTP port.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_FTP_PORT)
    }

    /// Overlays `INVENTORY_FTP_*` environment variables onto the file values.
    pub fn apply_env(&mut self) {
        self.apply_lookup(|key| std::env::var(key).ok());
    }

    fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server) = lookup(ENV_SERVER) {
            self.server = Some(server);
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.username = Some(username);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = Some(password);
        }
    }

    /// Credentials must all be present before a session is opened.
    pub fn validate_credentials(&self) -> Result<()> {
        validation::validate_resolved_value("transfer.server", &self.server)?;
        validation::validate_resolved_value("transfer.username", &self.username)?;
        validation::validate_resolved_value("transfer.password", &self.password)?;
        validation::validate_range("transfer.port", self.effective_port(), 1, u16::MAX)?;
        Ok(())
    }
}

impl PublishConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given; otherwise the default file if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INVENTORY_FTP_PASSWORD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("output.structured_file", &self.output.structured_file)?;
        validation::validate_non_empty_string("listing.title", &self.listing.title)?;

        validation::validate_range(
            "retention.max_age_days",
            self.retention.max_age_days,
            0,
            MAX_AGE_DAYS,
        )?;

        // An empty pattern is contained in every value and would drop every row.
        let patterns = [
            ("retention.excluded_sizes", &self.retention.excluded_sizes),
            ("retention.excluded_categories", &self.retention.excluded_categories),
            ("listing.featured_prefixes", &self.listing.featured_prefixes),
            ("listing.hidden_prefixes", &self.listing.hidden_prefixes),
        ];
        for (field, values) in patterns {
            for value in values {
                validation::validate_non_empty_string(field, value)?;
            }
        }

        if let Some(port) = self.transfer.port {
            validation::validate_range("transfer.port", port, 1, u16::MAX)?;
        }

        Ok(())
    }
}

impl Validate for PublishConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
