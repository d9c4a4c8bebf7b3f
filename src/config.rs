//! Runtime configuration, read from a TOML file and then overridden by environment variables.
//!
//! The file path comes from `CFC_CONFIG` and defaults to `cfc.toml`. A missing file is not an
//! error: every key has a default, and with no `[[functions]]` table the builtin handlers are
//! served under short names.

use std::collections::HashSet;
use std::env::var;
use std::fs::read_to_string;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{Level, info, warn};

use crate::error::ConfigError;
use crate::functions;
use crate::registry::Registry;

pub const SUPPORTED_REGIONS: [&str; 3] = ["bj", "su", "gz"];

/// Upper bound on a function's timeout, in seconds.
pub const MAX_TIMEOUT: u64 = 300;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub address: String,
    pub region: String,
    pub account_id: String,
    pub log_level: String,
    pub max_payload_bytes: usize,
    pub tls: Option<TlsConfig>,
    pub functions: Vec<FunctionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8001".into(),
            region: "bj".into(),
            account_id: "000000000000".into(),
            log_level: "info".into(),
            max_payload_bytes: 6 * 1024 * 1024,
            tls: None,
            functions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// One deployable function: a public name bound to a registered handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfig {
    pub name: String,
    pub handler: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_memory_size")]
    pub memory_size: u32,
    /// Seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_version() -> String {
    "$LATEST".into()
}

fn default_memory_size() -> u32 {
    128
}

fn default_timeout() -> u64 {
    3
}

impl FunctionConfig {
    pub fn new(name: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: handler.into(),
            version: default_version(),
            memory_size: default_memory_size(),
            timeout: default_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Config {
    /// Loads the file named by `CFC_CONFIG` and applies the environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = var("CFC_CONFIG").unwrap_or_else(|_| "cfc.toml".into());
        let config = Self::from_path(path)?;
        Ok(config.apply_overrides(|key| var(key).ok()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match read_to_string(path.as_ref()) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<Config>(contents)?)
    }

    /// `lookup` resolves an environment variable name, so tests can supply their own environment.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(address) = lookup("CFC_ADDRESS") {
            self.address = address;
        }
        if let Some(region) = lookup("CFC_REGION") {
            self.region = region;
        }
        if let Some(log_level) = lookup("CFC_LOG_LEVEL") {
            self.log_level = log_level;
        }
        self
    }

    /// Exposes the builtin handlers when the file declares no functions.
    pub fn with_default_functions(mut self) -> Self {
        if self.functions.is_empty() {
            self.functions = vec![
                FunctionConfig::new("event_handler", functions::EVENT_HANDLER),
                FunctionConfig::new("index", functions::INDEX),
                FunctionConfig::new("hello_handler", functions::HELLO_HANDLER),
            ];
            info!("No functions configured, serving the builtin handlers");
        }
        self
    }

    pub fn validate(&self, registry: &Registry) -> Result<(), ConfigError> {
        if !SUPPORTED_REGIONS.contains(&self.region.as_str()) {
            warn!("Unsupported region: {}", self.region);
        }

        let mut seen = HashSet::new();
        for function in &self.functions {
            if !seen.insert(function.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "function '{}' is declared more than once",
                    function.name
                )));
            }

            if !registry.contains(&function.handler) {
                return Err(ConfigError::Invalid(format!(
                    "function '{}' refers to unknown handler '{}'",
                    function.name, function.handler
                )));
            }

            if function.timeout == 0 || function.timeout > MAX_TIMEOUT {
                return Err(ConfigError::Invalid(format!(
                    "function '{}' has timeout {}, expected 1 to {MAX_TIMEOUT} seconds",
                    function.name, function.timeout
                )));
            }
        }

        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&FunctionConfig> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.log_level)))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.address
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid(format!("address '{}': {e}", self.address)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.address, "127.0.0.1:8001");
        assert_eq!(config.region, "bj");
        assert_eq!(config.max_payload_bytes, 6 * 1024 * 1024);
        assert!(config.tls.is_none());
        assert!(config.functions.is_empty());
    }

    #[test]
    fn parses_functions_with_defaults() {
        let config = Config::parse(
            r#"
            region = "gz"

            [[functions]]
            name = "greet"
            handler = "com.baidu.demo.EventHandler"
            timeout = 10

            [[functions]]
            name = "echo"
            handler = "hello_handler"
            memory_size = 256
            "#,
        )
        .unwrap();

        assert_eq!(config.region, "gz");
        let greet = config.function("greet").unwrap();
        assert_eq!(greet.timeout, 10);
        assert_eq!(greet.version, "$LATEST");
        assert_eq!(greet.memory_size, 128);
        assert_eq!(config.function("echo").unwrap().memory_size, 256);
        assert!(config.function("missing").is_none());
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = Config::parse(r#"address = "0.0.0.0:9000""#)
            .unwrap()
            .apply_overrides(|key| match key {
                "CFC_ADDRESS" => Some("0.0.0.0:9100".into()),
                "CFC_LOG_LEVEL" => Some("debug".into()),
                _ => None,
            });

        assert_eq!(config.address, "0.0.0.0:9100");
        assert_eq!(config.level().unwrap(), Level::DEBUG);
        assert_eq!(config.region, "bj");
    }

    #[test]
    fn missing_file_is_default() {
        let config = Config::from_path("/nonexistent/cfc.toml").unwrap();

        assert_eq!(config.address, Config::default().address);
    }

    #[test]
    fn default_functions_pass_validation() {
        let config = Config::default().with_default_functions();

        assert_eq!(config.functions.len(), 3);
        config.validate(&Registry::builtin()).unwrap();
    }

    #[test]
    fn rejects_unknown_handler() {
        let mut config = Config::default();
        config.functions.push(FunctionConfig::new("greet", "no.such.Handler"));

        let err = config.validate(&Registry::builtin()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_names_and_bad_timeouts() {
        let mut config = Config::default();
        config.functions.push(FunctionConfig::new("a", functions::INDEX));
        config.functions.push(FunctionConfig::new("a", functions::INDEX));
        assert!(config.validate(&Registry::builtin()).is_err());

        let mut config = Config::default();
        config
            .functions
            .push(FunctionConfig::new("a", functions::INDEX).with_timeout(0));
        assert!(config.validate(&Registry::builtin()).is_err());
    }

    #[test]
    fn rejects_bad_level_and_address() {
        let config = Config {
            log_level: "loud".into(),
            address: "not an address".into(),
            ..Config::default()
        };

        assert!(config.level().is_err());
        assert!(config.socket_addr().is_err());
    }
}
