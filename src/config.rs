//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub serial: SerialConfig,
    pub logging: LoggingConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// CSV logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_field_count")]
    pub field_count: usize,

    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    #[serde(default = "default_log_root")]
    pub log_root: String,

    #[serde(default)]
    pub tag: String,

    #[serde(default = "default_sync_every")]
    pub sync_every: u64,

    #[serde(default = "default_write_raw")]
    pub write_raw: bool,

    #[serde(default = "default_write_header")]
    pub write_header: bool,

    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyACM0".to_string() }
fn default_baud_rate() -> u32 { 115200 }

fn default_field_count() -> usize { 24 }
fn default_delimiter() -> String { ",".to_string() }
fn default_log_root() -> String { "./logs/rotorrig".to_string() }
fn default_sync_every() -> u64 { 1 }
fn default_write_raw() -> bool { true }
fn default_write_header() -> bool { true }
fn default_max_line_bytes() -> usize { 65536 }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            field_count: default_field_count(),
            delimiter: default_delimiter(),
            log_root: default_log_root(),
            tag: String::new(),
            sync_every: default_sync_every(),
            write_raw: default_write_raw(),
            write_header: default_write_header(),
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// The operator tag is trimmed of surrounding whitespace before
    /// validation so a padded value cannot leak spaces into file names.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rotorrig_logger::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.logging.tag = config.logging.tag.trim().to_string();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Ok if valid, Err if invalid
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        // Validate serial port configuration
        if self.serial.port.is_empty() {
            return Err(crate::error::RigLoggerError::Config(
                toml::de::Error::custom("serial port cannot be empty")
            ));
        }

        // Validate baud rate
        if ![9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600]
            .contains(&self.serial.baud_rate)
        {
            return Err(crate::error::RigLoggerError::Config(
                toml::de::Error::custom(
                    "baud_rate must be one of: 9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600"
                )
            ));
        }

        // Validate record layout
        if self.logging.field_count == 0 {
            return Err(crate::error::RigLoggerError::Config(
                toml::de::Error::custom("field_count must be greater than 0")
            ));
        }

        if self.logging.delimiter.is_empty() {
            return Err(crate::error::RigLoggerError::Config(
                toml::de::Error::custom("delimiter cannot be empty")
            ));
        }

        // Validate output layout
        if self.logging.log_root.is_empty() {
            return Err(crate::error::RigLoggerError::Config(
                toml::de::Error::custom("log_root cannot be empty")
            ));
        }

        // The tag lands inside file names
        if self.logging.tag.contains('/') || self.logging.tag.contains('\\') {
            return Err(crate::error::RigLoggerError::Config(
                toml::de::Error::custom("tag must not contain path separators")
            ));
        }

        // Validate durability cadence
        if self.logging.sync_every == 0 {
            return Err(crate::error::RigLoggerError::Config(
                toml::de::Error::custom("sync_every must be greater than 0")
            ));
        }

        // Validate reassembly guard
        if self.logging.max_line_bytes < 1024 || self.logging.max_line_bytes > 16 * 1024 * 1024 {
            return Err(crate::error::RigLoggerError::Config(
                toml::de::Error::custom("max_line_bytes must be between 1024 and 16777216")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[serial]
port = "/dev/ttyUSB0"

[logging]
tag = "kv2300"
sync_every = 5
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 115200);
        assert_eq!(config.logging.tag, "kv2300");
        assert_eq!(config.logging.sync_every, 5);
        assert_eq!(config.logging.field_count, 24);
    }

    #[test]
    fn test_load_trims_tag() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[serial]

[logging]
tag = "  motorA "
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.logging.tag, "motorA");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load("/nonexistent/rotorrig.toml").is_err());
    }

    #[test]
    fn test_empty_serial_port() {
        let mut config = create_valid_config();
        config.serial.port = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = create_valid_config();
        config.serial.baud_rate = 420000; // Not a rig rate
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_baud_rates() {
        for &baud in &[9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600] {
            let mut config = create_valid_config();
            config.serial.baud_rate = baud;
            assert!(config.validate().is_ok(), "Baud rate {} should be valid", baud);
        }
    }

    #[test]
    fn test_field_count_zero() {
        let mut config = create_valid_config();
        config.logging.field_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_delimiter() {
        let mut config = create_valid_config();
        config.logging.delimiter = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_root() {
        let mut config = create_valid_config();
        config.logging.log_root = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tag_with_path_separator() {
        let mut config = create_valid_config();
        config.logging.tag = "a/b".to_string();
        assert!(config.validate().is_err());

        config.logging.tag = "a\\b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_tag_is_valid() {
        let mut config = create_valid_config();
        config.logging.tag = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sync_every_zero() {
        let mut config = create_valid_config();
        config.logging.sync_every = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_line_bytes_too_small() {
        let mut config = create_valid_config();
        config.logging.max_line_bytes = 512;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_line_bytes_too_large() {
        let mut config = create_valid_config();
        config.logging.max_line_bytes = 32 * 1024 * 1024;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_serial_port(), "/dev/ttyACM0");
        assert_eq!(default_baud_rate(), 115200);
        assert_eq!(default_field_count(), 24);
        assert_eq!(default_delimiter(), ",");
        assert_eq!(default_log_root(), "./logs/rotorrig");
        assert_eq!(default_sync_every(), 1);
        assert_eq!(default_write_raw(), true);
        assert_eq!(default_write_header(), true);
        assert_eq!(default_max_line_bytes(), 65536);
    }
}
