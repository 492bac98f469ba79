//! # Runtime Configuration Module
//!
//! Host-level settings: logging and which stock middleware to install.
//! Nothing here affects routing or dispatch semantics.
//!
//! Settings come from an optional TOML file, then environment variables
//! override individual fields:
//!
//! ```toml
//! [log]
//! level = "debug"
//! format = "json"
//!
//! [middleware]
//! tracing = true
//! metrics = true
//! request_id = true
//! request_id_header = "x-request-id"
//! catch_panics = true
//! ```
//!
//! | Variable | Field |
//! |----------|-------|
//! | `WAYPOST_LOG_*` | see [`crate::logging`] |
//! | `WAYPOST_ENABLE_TRACING` | `middleware.tracing` |
//! | `WAYPOST_ENABLE_METRICS` | `middleware.metrics` |
//! | `WAYPOST_ENABLE_REQUEST_ID` | `middleware.request_id` |
//! | `WAYPOST_REQUEST_ID_HEADER` | `middleware.request_id_header` |
//! | `WAYPOST_CATCH_PANICS` | `middleware.catch_panics` |

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::logging::LogConfig;

/// Which stock middleware `AppBuilder::add_standard_middleware` installs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MiddlewareSettings {
    pub tracing: bool,
    pub metrics: bool,
    pub request_id: bool,
    pub request_id_header: String,
    pub catch_panics: bool,
}

impl Default for MiddlewareSettings {
    fn default() -> Self {
        Self {
            tracing: true,
            metrics: false,
            request_id: true,
            request_id_header: "x-request-id".to_string(),
            catch_panics: true,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub log: LogConfig,
    pub middleware: MiddlewareSettings,
}

/// Failure loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io(std::io::Error),
    /// The file is not valid TOML for this schema
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl RuntimeConfig {
    /// Parse TOML text. Missing tables and fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&text)
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from a variable lookup. Unparseable flags are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.log.apply_env(&lookup);

        let flag = |key: &str| lookup(key).as_deref().and_then(parse_flag);
        let mw = &mut self.middleware;
        if let Some(v) = flag("WAYPOST_ENABLE_TRACING") {
            mw.tracing = v;
        }
        if let Some(v) = flag("WAYPOST_ENABLE_METRICS") {
            mw.metrics = v;
        }
        if let Some(v) = flag("WAYPOST_ENABLE_REQUEST_ID") {
            mw.request_id = v;
        }
        if let Some(v) = flag("WAYPOST_CATCH_PANICS") {
            mw.catch_panics = v;
        }
        if let Some(header) = lookup("WAYPOST_REQUEST_ID_HEADER") {
            mw.request_id_header = header;
        }
    }
}
