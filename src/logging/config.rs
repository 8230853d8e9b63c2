//! Logging configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    pub global_level: String,

    /// Enable console output
    pub console_output: bool,

    /// Directory for daily rolling JSON log files (None = no file logging)
    pub log_directory: Option<PathBuf>,

    /// File name prefix of the rolling log files
    pub file_prefix: String,

    /// Include file and line in console records
    pub include_file_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_level: "info".to_string(),
            console_output: true,
            log_directory: None,
            file_prefix: "moire.log".to_string(),
            include_file_location: false,
        }
    }
}

impl LoggingConfig {
    /// Verbose console plus file logging under `logs/`
    pub fn development() -> Self {
        Self {
            global_level: "debug".to_string(),
            console_output: true,
            log_directory: Some(PathBuf::from("logs")),
            include_file_location: true,
            ..Self::default()
        }
    }

    /// Warnings only, file output
    pub fn production() -> Self {
        Self {
            global_level: "warn".to_string(),
            console_output: false,
            log_directory: Some(PathBuf::from("/var/log/moire-inspect")),
            ..Self::default()
        }
    }

    /// Map a `-v` count onto a level, starting from the configured one
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.global_level = match verbose {
            0 => return self,
            1 => "debug",
            _ => "trace",
        }
        .to_string();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !VALID_LEVELS.contains(&self.global_level.as_str()) {
            return Err(format!(
                "Invalid global_level: {}. Must be one of: {:?}",
                self.global_level, VALID_LEVELS
            ));
        }

        if self.file_prefix.trim().is_empty() {
            return Err("file_prefix must not be empty".to_string());
        }

        if let Some(ref log_dir) = self.log_directory {
            if let Some(parent) = log_dir.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(format!("Log directory parent does not exist: {:?}", parent));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.global_level, "info");
        assert!(config.console_output);
        assert!(config.log_directory.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = LoggingConfig::development();
        assert_eq!(dev.global_level, "debug");
        assert!(dev.include_file_location);
        assert!(dev.validate().is_ok());

        let prod = LoggingConfig::production();
        assert_eq!(prod.global_level, "warn");
        assert!(!prod.console_output);
    }

    #[test]
    fn test_config_validation() {
        let mut config = LoggingConfig::default();
        config.global_level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.global_level = "debug".to_string();
        config.file_prefix = " ".to_string();
        assert!(config.validate().is_err());

        config.file_prefix = "x.log".to_string();
        config.log_directory = Some(PathBuf::from("/definitely/not/here/logs"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(LoggingConfig::default().with_verbosity(0).global_level, "info");
        assert_eq!(LoggingConfig::default().with_verbosity(1).global_level, "debug");
        assert_eq!(LoggingConfig::default().with_verbosity(3).global_level, "trace");
    }
}
