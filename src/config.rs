use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{BmiError, Result};

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// CSV file holding every record
    pub data_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the rotated JSON log; console only when unset
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places used when reporting a BMI
    pub decimals: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_file: "bmi_data.csv".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            display: DisplayConfig { decimals: 2 },
        }
    }
}

const MAX_DECIMALS: usize = 6;

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then `config/default`, `config/local` and `config` files
    /// (optional), then `BMI_TRACKER__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&Self::default())?)
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("BMI_TRACKER").separator("__"))
            .build()?;

        Self::from_config(&config)
    }

    /// Deserialize and validate an already-built [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let app_config: Self = config.clone().try_deserialize()?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.data_file.trim().is_empty() {
            return Err(BmiError::InvalidConfig("storage.data_file cannot be empty".to_string()));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(BmiError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(BmiError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        if self.display.decimals > MAX_DECIMALS {
            return Err(BmiError::InvalidConfig(format!(
                "display.decimals must be at most {MAX_DECIMALS}"
            )));
        }

        Ok(())
    }

    /// Path of the record file
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.data_file, "bmi_data.csv");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.display.decimals, 2);
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.storage.data_file = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
