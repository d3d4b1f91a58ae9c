//! TOML configuration for the `dnsdig` binary.
//!
//! ```toml
//! [resolver]
//! server = "9.9.9.9:53"
//! timeout_ms = 1500
//!
//! [logging]
//! level = "debug"
//!
//! [output]
//! color = false
//! diagram = true
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "dnsdig.toml";

const DNS_PORT: u16 = 53;

/// Errors raised while loading, validating or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    /// The config file could not be written.
    #[error("Failed to write config file {0}: {1}")]
    FileWrite(String, String),

    /// The file is not valid TOML for [`Config`].
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value is out of range or unparsable.
    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Main configuration structure for dnsdig
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Upstream server and timeout
    pub resolver: ResolverConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Output formatting
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResolverConfig {
    /// `ip:port`, or a bare IP address for port 53.
    #[serde(default = "default_server")]
    pub server: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ResolverConfig {
    /// Parses [`ResolverConfig::server`], defaulting the port to 53.
    pub fn server_addr(&self) -> Result<SocketAddr, ConfigError> {
        let server = self.server.trim();
        if let Ok(addr) = server.parse::<SocketAddr>() {
            return Ok(addr);
        }
        server
            .parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, DNS_PORT))
            .map_err(|_| {
                ConfigError::Validation(format!("Invalid server address '{}'", self.server))
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_server() -> String {
    "1.1.1.1:53".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// ANSI colors in rendered messages
    #[serde(default = "default_true")]
    pub color: bool,

    /// Print the RFC 1035 box diagram instead of the summary
    #[serde(default)]
    pub diagram: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            diagram: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnsdig.toml in current directory
    /// 3. Default configuration
    ///
    /// Command-line overrides are applied last.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(server) = overrides.server {
            self.resolver.server = server;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.resolver.timeout_ms = timeout_ms;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.no_color {
            self.output.color = false;
        }
        if overrides.diagram {
            self.output.diagram = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.timeout_ms == 0 {
            return Err(ConfigError::Validation("Timeout cannot be 0".to_string()));
        }

        self.resolver.server_addr()?;

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation("Log level cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub server: Option<String>,
    pub timeout_ms: Option<u64>,
    pub log_level: Option<String>,
    pub no_color: bool,
    pub diagram: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.resolver.server, "1.1.1.1:53");
        assert_eq!(config.resolver.timeout(), Duration::from_secs(2));
        assert_eq!(config.logging.level, "warn");
        assert!(config.output.color);
        assert!(!config.output.diagram);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[resolver]\nserver = \"9.9.9.9\"\n");
        let path = file.path().to_str().unwrap();
        let config = Config::load(Some(path), CliOverrides::default()).unwrap();

        assert_eq!(config.resolver.server, "9.9.9.9");
        assert_eq!(config.resolver.timeout_ms, 2000);
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(
            config.resolver.server_addr().unwrap(),
            "9.9.9.9:53".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_full_file() {
        let file = write_config(
            r#"
            [resolver]
            server = "[2606:4700:4700::1111]:5353"
            timeout_ms = 750

            [logging]
            level = "debug"

            [output]
            color = false
            diagram = true
            "#,
        );
        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.resolver.server_addr().unwrap().port(), 5353);
        assert!(config.resolver.server_addr().unwrap().is_ipv6());
        assert_eq!(config.resolver.timeout(), Duration::from_millis(750));
        assert_eq!(config.logging.level, "debug");
        assert!(!config.output.color);
        assert!(config.output.diagram);
    }

    #[test]
    fn test_cli_overrides_win() {
        let file = write_config("[resolver]\nserver = \"9.9.9.9:53\"\ntimeout_ms = 900\n");
        let overrides = CliOverrides {
            server: Some("8.8.8.8".to_string()),
            timeout_ms: Some(100),
            log_level: Some("trace".to_string()),
            no_color: true,
            diagram: true,
        };
        let config = Config::load(file.path().to_str(), overrides).unwrap();

        assert_eq!(config.resolver.server, "8.8.8.8");
        assert_eq!(config.resolver.timeout_ms, 100);
        assert_eq!(config.logging.level, "trace");
        assert!(!config.output.color);
        assert!(config.output.diagram);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = Config::load(missing.to_str(), CliOverrides::default());
        assert!(matches!(result, Err(ConfigError::FileRead(..))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let file = write_config("[resolver\nserver = ");
        let result = Config::from_file(file.path().to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.resolver.timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.resolver.server = "dns.google".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dns.google"));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dnsdig.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.resolver.timeout_ms = 1234;
        config.output.diagram = true;
        config.save(path).unwrap();

        assert_eq!(Config::from_file(path).unwrap(), config);
    }
}
