//! Configuration management for DriveMeter.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. The resulting [`LookupConfig`] is read
//! once at startup and handed to the lookup crate by value; nothing below
//! the binary reads the environment.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Main lookup configuration.
///
/// This is loaded from `~/.config/drivemeter/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used: both live tiers off,
/// so every lookup is answered by the synthesizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Which live tiers participate
    pub tiers: TierToggles,
    /// Free tier endpoint settings
    pub free_tier: FreeTierConfig,
    /// Paid tier endpoint and credential settings
    pub paid_tier: PaidTierConfig,
    /// Orchestrator settings
    pub lookup: LookupSettings,
}

impl LookupConfig {
    /// Load configuration from the default path, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides, then validate.
    ///
    /// Supports the following environment variables:
    /// - `DRIVEMETER_USE_FREE_API`: Enable the free tier (true/false)
    /// - `DRIVEMETER_USE_PAID_API`: Enable the paid tier (true/false)
    /// - `DRIVEMETER_FREE_API_KEY`: Free tier API key
    /// - `DRIVEMETER_FREE_BASE_URL`: Free tier base URL
    /// - `DRIVEMETER_PAID_API_KEY`: Paid tier API key
    /// - `DRIVEMETER_PAID_ACCOUNT_ID`: Paid tier account id
    /// - `DRIVEMETER_PAID_BASE_URL`: Paid tier base URL
    /// - `DRIVEMETER_LOOKUP_DEADLINE_SECS`: Overall deadline for the live tiers
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup function.
    ///
    /// Unparseable boolean and numeric values are ignored.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(enabled) = var("DRIVEMETER_USE_FREE_API").and_then(|v| v.parse().ok()) {
            self.tiers.use_free_tier = enabled;
            tracing::debug!("Override tiers.use_free_tier from env: {}", enabled);
        }

        if let Some(enabled) = var("DRIVEMETER_USE_PAID_API").and_then(|v| v.parse().ok()) {
            self.tiers.use_paid_tier = enabled;
            tracing::debug!("Override tiers.use_paid_tier from env: {}", enabled);
        }

        if let Some(key) = var("DRIVEMETER_FREE_API_KEY") {
            self.free_tier.api_key = key;
            tracing::debug!("Override free_tier.api_key from env");
        }

        if let Some(url) = var("DRIVEMETER_FREE_BASE_URL") {
            tracing::debug!("Override free_tier.base_url from env: {}", url);
            self.free_tier.base_url = url;
        }

        if let Some(key) = var("DRIVEMETER_PAID_API_KEY") {
            self.paid_tier.api_key = key;
            tracing::debug!("Override paid_tier.api_key from env");
        }

        if let Some(account_id) = var("DRIVEMETER_PAID_ACCOUNT_ID") {
            self.paid_tier.account_id = account_id;
            tracing::debug!("Override paid_tier.account_id from env");
        }

        if let Some(url) = var("DRIVEMETER_PAID_BASE_URL") {
            tracing::debug!("Override paid_tier.base_url from env: {}", url);
            self.paid_tier.base_url = url;
        }

        if let Some(secs) = var("DRIVEMETER_LOOKUP_DEADLINE_SECS").and_then(|v| v.parse().ok()) {
            self.lookup.deadline_secs = Some(secs);
            tracing::debug!("Override lookup.deadline_secs from env: {}", secs);
        }
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns error if the paid tier is enabled without credentials, a
    /// timeout is zero, or a base URL is not http(s).
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tiers.use_paid_tier {
            if self.paid_tier.api_key.trim().is_empty() {
                return Err(ConfigError::MissingCredential {
                    field: "paid_tier.api_key".to_string(),
                });
            }
            if self.paid_tier.account_id.trim().is_empty() {
                return Err(ConfigError::MissingCredential {
                    field: "paid_tier.account_id".to_string(),
                });
            }
        }

        for (field, secs) in [
            ("free_tier.timeout_secs", self.free_tier.timeout_secs),
            ("paid_tier.timeout_secs", self.paid_tier.timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        if self.lookup.deadline_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "lookup.deadline_secs".to_string(),
                reason: "must be greater than zero when set".to_string(),
            });
        }

        for (field, url) in [
            ("free_tier.base_url", &self.free_tier.base_url),
            ("paid_tier.base_url", &self.paid_tier.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("expected an http(s) URL, got '{url}'"),
                });
            }
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/drivemeter/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "drivemeter", "drivemeter").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Live tier participation flags. Both default off.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TierToggles {
    /// Try the free tier first for vehicle lookups
    pub use_free_tier: bool,
    /// Try the paid tier after the free tier
    pub use_paid_tier: bool,
}

/// Free tier endpoint settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeTierConfig {
    /// Service base URL
    pub base_url: String,
    /// Value of the `X-RapidAPI-Host` header
    pub api_host: String,
    /// Value of the `X-RapidAPI-Key` header (may be empty on the free plan)
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FreeTierConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rto-vehicle-information-verification-india.p.rapidapi.com"
                .to_string(),
            api_host: "rto-vehicle-information-verification-india.p.rapidapi.com".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for FreeTierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeTierConfig")
            .field("base_url", &self.base_url)
            .field("api_host", &self.api_host)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Paid tier endpoint and credential settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaidTierConfig {
    /// Service base URL
    pub base_url: String,
    /// Value of the `X-API-KEY` header
    pub api_key: String,
    /// Value of the `X-ACCOUNT-ID` header
    pub account_id: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PaidTierConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.instantpay.in".to_string(),
            api_key: String::new(),
            account_id: String::new(),
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for PaidTierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaidTierConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("account_id", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    /// Overall budget in seconds for all live tier attempts of one lookup.
    /// `None` bounds each tier only by its own timeout.
    pub deadline_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LookupConfig::default();
        assert!(!config.tiers.use_free_tier);
        assert!(!config.tiers.use_paid_tier);
        assert_eq!(config.paid_tier.base_url, "https://api.instantpay.in");
        assert_eq!(config.paid_tier.timeout_secs, 30);
        assert!(config.lookup.deadline_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = LookupConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[tiers]"));
        assert!(toml_str.contains("[paid_tier]"));

        let parsed: LookupConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.free_tier.base_url, config.free_tier.base_url);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = LookupConfig::default();
        config.tiers.use_paid_tier = true;
        config.paid_tier.api_key = "key".to_string();
        config.paid_tier.account_id = "acct".to_string();

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded = LookupConfig::load_from(&config_path).expect("load config");
        assert!(loaded.tiers.use_paid_tier);
        assert_eq!(loaded.paid_tier.account_id, "acct");
    }

    #[test]
    fn test_load_from_missing_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let result = LookupConfig::load_from(&tmp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[tiers]
use_free_tier = true

[lookup]
deadline_secs = 45
"#;

        let config: LookupConfig = toml::from_str(toml_str).expect("parse partial config");
        assert!(config.tiers.use_free_tier);
        assert!(!config.tiers.use_paid_tier);
        assert_eq!(config.lookup.deadline_secs, Some(45));
        assert_eq!(config.free_tier.timeout_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DRIVEMETER_USE_FREE_API", "true"),
            ("DRIVEMETER_USE_PAID_API", "yes"),
            ("DRIVEMETER_PAID_API_KEY", "secret"),
            ("DRIVEMETER_PAID_BASE_URL", "http://localhost:9000"),
            ("DRIVEMETER_LOOKUP_DEADLINE_SECS", "20"),
        ]
        .into_iter()
        .collect();

        let mut config = LookupConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| (*v).to_string()));

        assert!(config.tiers.use_free_tier);
        // "yes" is not a bool, so the flag keeps its default
        assert!(!config.tiers.use_paid_tier);
        assert_eq!(config.paid_tier.api_key, "secret");
        assert_eq!(config.paid_tier.base_url, "http://localhost:9000");
        assert_eq!(config.lookup.deadline_secs, Some(20));
    }

    #[test]
    fn test_paid_tier_requires_credentials() {
        let mut config = LookupConfig::default();
        config.tiers.use_paid_tier = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential { ref field }) if field == "paid_tier.api_key"
        ));

        config.paid_tier.api_key = "key".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential { ref field }) if field == "paid_tier.account_id"
        ));

        config.paid_tier.account_id = "acct".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = LookupConfig::default();
        config.free_tier.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut config = LookupConfig::default();
        config.paid_tier.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = LookupConfig::default();
        config.lookup.deadline_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let mut config = LookupConfig::default();
        config.paid_tier.api_key = "super-secret".to_string();
        config.free_tier.api_key = "rapid-secret".to_string();

        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("rapid-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
