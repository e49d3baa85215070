//! Configuration management for the `WeatherWise` engine
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherWiseError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherWiseConfig {
    /// External data source settings
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Estimation engine tuning
    #[serde(default)]
    pub estimation: EstimationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// External data source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Base URL of the daily archive API
    #[serde(default = "default_historical_base_url")]
    pub historical_base_url: String,
    /// Base URL of the current weather API
    #[serde(default = "default_current_base_url")]
    pub current_base_url: String,
    /// Base URL of the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Current weather API key; without it current conditions are synthesized
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of current-conditions entries in minutes
    #[serde(default = "default_current_ttl")]
    pub current_ttl_minutes: u32,
}

/// Estimation engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationConfig {
    /// Number of complete years of archive data requested, ending last year
    #[serde(default = "default_history_years")]
    pub history_years: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_historical_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_current_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_current_ttl() -> u32 {
    30
}

fn default_history_years() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            historical_base_url: default_historical_base_url(),
            current_base_url: default_current_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            current_ttl_minutes: default_current_ttl(),
        }
    }
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            history_years: default_history_years(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl SourcesConfig {
    /// The current-weather key, if it looks usable. Blank, too short or too
    /// long keys are reported and ignored.
    #[must_use]
    pub fn usable_api_key(&self) -> Option<String> {
        let key = self.api_key.as_deref()?.trim();
        if key.is_empty() {
            return None;
        }
        if !(8..=100).contains(&key.len()) {
            warn!(
                "Weather API key appears to be invalid ({} characters); current conditions will be synthesized",
                key.len()
            );
            return None;
        }
        Some(key.to_string())
    }
}

impl CacheConfig {
    #[must_use]
    pub fn current_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.current_ttl_minutes) * 60)
    }
}

impl WeatherWiseConfig {
    /// Load configuration from `config_path`, or the default location, then
    /// the environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERWISE_SOURCES__API_KEY=... overrides sources.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERWISE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherWiseConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherwise").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.sources.historical_base_url.is_empty() {
            self.sources.historical_base_url = default_historical_base_url();
        }
        if self.sources.current_base_url.is_empty() {
            self.sources.current_base_url = default_current_base_url();
        }
        if self.sources.geocoding_base_url.is_empty() {
            self.sources.geocoding_base_url = default_geocoding_base_url();
        }
        if self.sources.timeout_seconds == 0 {
            self.sources.timeout_seconds = default_timeout();
        }
        if self.cache.current_ttl_minutes == 0 {
            self.cache.current_ttl_minutes = default_current_ttl();
        }
        if self.estimation.history_years == 0 {
            self.estimation.history_years = default_history_years();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
    }

    /// Validate all configuration settings.
    ///
    /// The API key is not checked here: an unusable key only disables live
    /// current conditions (see [`SourcesConfig::usable_api_key`]).
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.sources.timeout_seconds > 300 {
            return Err(WeatherWiseError::config("Source timeout cannot exceed 300 seconds").into());
        }

        if self.cache.current_ttl_minutes > 24 * 60 {
            return Err(WeatherWiseError::config(
                "Current-conditions cache TTL cannot exceed 1440 minutes (1 day)",
            )
            .into());
        }

        if !(1..=80).contains(&self.estimation.history_years) {
            return Err(WeatherWiseError::config("History years must be between 1 and 80").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherWiseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherWiseError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("historical", &self.sources.historical_base_url),
            ("current", &self.sources.current_base_url),
            ("geocoding", &self.sources.geocoding_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherWiseError::config(format!(
                    "The {name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WeatherWiseConfig::default();
        assert_eq!(
            config.sources.historical_base_url,
            "https://archive-api.open-meteo.com/v1"
        );
        assert_eq!(config.sources.timeout_seconds, 30);
        assert_eq!(config.cache.current_ttl_minutes, 30);
        assert_eq!(config.cache.current_ttl().as_secs(), 1800);
        assert_eq!(config.estimation.history_years, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.sources.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unusable_api_key_is_ignored_not_fatal() {
        let mut config = WeatherWiseConfig::default();
        config.sources.api_key = Some(" valid_api_key_123 ".to_string());
        assert_eq!(
            config.sources.usable_api_key().as_deref(),
            Some("valid_api_key_123")
        );

        for key in ["", "   ", "abc", &"x".repeat(101)] {
            config.sources.api_key = Some(key.to_string());
            assert!(config.validate().is_ok());
            assert!(config.sources.usable_api_key().is_none());
        }
    }

    #[test]
    fn test_load_with_short_api_key() {
        let dir = std::env::temp_dir().join(format!("weatherwise-key-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[sources]\napi_key = \"abc\"\n").unwrap();

        let config = WeatherWiseConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.sources.api_key.as_deref(), Some("abc"));
        assert!(config.sources.usable_api_key().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeatherWiseConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WeatherWiseConfig::default();
        config.sources.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = WeatherWiseConfig::default();
        config.estimation.history_years = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = WeatherWiseConfig::default();
        config.sources.timeout_seconds = 0;
        config.logging.format = String::new();
        config.estimation.history_years = 0;
        config.apply_defaults();
        assert_eq!(config.sources.timeout_seconds, 30);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.estimation.history_years, 30);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("weatherwise-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[estimation]\nhistory_years = 20\n\n[logging]\nlevel = \"debug\"\n"
        )
        .unwrap();

        let config = WeatherWiseConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.estimation.history_years, 20);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.server.port, 3000);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WeatherWiseConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weatherwise"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
