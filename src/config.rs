//! Configuration Management
//!
//! Known accounts, their credentials and the backend endpoint, read from a
//! YAML file.
//!
//! ```yaml
//! endpoint: https://inventory.example.com
//! accounts:
//!   "123456789012":
//!     name: production
//!     profile: prod
//!     token: ...
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "ARNSCAN_CONFIG";

/// Source of the accounts an ARN may enumerate
pub trait ConfigStore {
    fn accounts(&self) -> BTreeMap<String, AccountConfig>;
}

/// Credentials handed to backend enumerators
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token presented to the backend
    pub token: String,
    #[serde(default)]
    pub profile: Option<String>,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            profile: None,
        }
    }
}

// Keep tokens out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"***")
            .field("profile", &self.profile)
            .finish()
    }
}

/// Per-account settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AccountConfig {
    /// Human readable account name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl AccountConfig {
    /// Credentials for this account, when a token is configured
    pub fn credentials(&self) -> Option<Credentials> {
        self.token.as_ref().map(|token| Credentials {
            token: token.clone(),
            profile: self.profile.clone(),
        })
    }
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the inventory backend
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub accounts: BTreeMap<String, AccountConfig>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|p| p.join("arnscan").join("config.yaml"))
    }

    /// Load configuration from the default location
    ///
    /// Falls back to an empty configuration if the file cannot be used.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file {:?}: {:#}", path, e);
                Self::default()
            }
        }
    }

    /// Load configuration from `path`; a missing file is an empty config
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse config YAML")
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }
}

impl ConfigStore for Config {
    fn accounts(&self) -> BTreeMap<String, AccountConfig> {
        self.accounts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
endpoint: http://localhost:9000
accounts:
  "123456789012":
    name: production
    profile: prod
    token: secret-token
  "210987654321": {}
"#;

    #[test]
    fn test_parse_accounts() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));

        let accounts = config.accounts();
        let ids: Vec<&str> = accounts.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["123456789012", "210987654321"]);

        let creds = accounts["123456789012"].credentials().unwrap();
        assert_eq!(creds.token, "secret-token");
        assert_eq!(creds.profile.as_deref(), Some("prod"));
        assert!(accounts["210987654321"].credentials().is_none());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("  \n").unwrap();
        assert!(config.accounts.is_empty());
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        assert!(Config::from_yaml("accounts: [1, 2").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config::from_yaml(SAMPLE).unwrap();

        config.save(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.accounts, config.accounts);
    }

    #[test]
    fn test_credentials_debug_hides_token() {
        let creds = Credentials::new("very-secret");
        assert!(!format!("{:?}", creds).contains("very-secret"));
    }
}
