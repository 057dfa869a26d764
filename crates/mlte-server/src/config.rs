//! Server settings read from `MLTE_*` environment variables.

use std::fmt;
use std::str::FromStr;

use mlte_store::{StoreType, StoreUri};
use thiserror::Error;

pub const DEFAULT_BACKEND_URI: &str = "memory://";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_PREFIX: &str = "/api";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MLTE_APP_PORT must be a port number, got '{0}'")]
    InvalidPort(String),

    #[error("MLTE_LOG_LEVEL must be one of DEBUG, INFO, WARNING, ERROR, CRITICAL, got '{0}'")]
    InvalidLogLevel(String),

    #[error("MLTE_API_PREFIX must start with '/', got '{0}'")]
    InvalidPrefix(String),

    #[error("MLTE_BACKEND_URI '{uri}' cannot back the server: {reason}")]
    InvalidBackend { uri: String, reason: String },
}

/// Accepted `MLTE_LOG_LEVEL` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// The equivalent `tracing` filter directive.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_uri: String,
    pub host: String,
    pub port: u16,
    pub log_level: LogLevel,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
    pub api_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            backend_uri: DEFAULT_BACKEND_URI.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: LogLevel::Error,
            allowed_origins: Vec::new(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        if let Some(uri) = lookup("MLTE_BACKEND_URI") {
            settings.backend_uri = uri;
        }
        if let Some(host) = lookup("MLTE_APP_HOST") {
            settings.host = host;
        }
        if let Some(port) = lookup("MLTE_APP_PORT") {
            settings.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(level) = lookup("MLTE_LOG_LEVEL") {
            settings.log_level = level.trim().parse()?;
        }
        if let Some(origins) = lookup("MLTE_ALLOWED_ORIGINS") {
            settings.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(prefix) = lookup("MLTE_API_PREFIX") {
            if !prefix.starts_with('/') {
                return Err(ConfigError::InvalidPrefix(prefix));
            }
            settings.api_prefix = prefix.trim_end_matches('/').to_string();
        }

        settings.check_backend()?;
        Ok(settings)
    }

    /// The server cannot proxy to another server, and the URI must select a
    /// backend at all.
    fn check_backend(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBackend {
            uri: self.backend_uri.clone(),
            reason,
        };
        let uri = StoreUri::parse(&self.backend_uri).map_err(|e| invalid(e.to_string()))?;
        if uri.store_type() == StoreType::RemoteHttp {
            return Err(invalid("remote HTTP stores cannot be served".to_string()));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.bind_address(), "localhost:8080");
        assert_eq!(s.api_prefix, "/api");
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("MLTE_BACKEND_URI", "sqlite:///tmp/mlte.db"),
            ("MLTE_APP_HOST", "0.0.0.0"),
            ("MLTE_APP_PORT", "9000"),
            ("MLTE_LOG_LEVEL", "warning"),
            ("MLTE_ALLOWED_ORIGINS", "http://a.example, http://b.example,"),
            ("MLTE_API_PREFIX", "/store/api/"),
        ])
        .unwrap();
        assert_eq!(s.backend_uri, "sqlite:///tmp/mlte.db");
        assert_eq!(s.bind_address(), "0.0.0.0:9000");
        assert_eq!(s.log_level, LogLevel::Warning);
        assert_eq!(s.log_level.as_filter(), "warn");
        assert_eq!(s.allowed_origins, vec!["http://a.example", "http://b.example"]);
        assert_eq!(s.api_prefix, "/store/api");
    }

    #[test]
    fn invalid_values_fail() {
        assert_eq!(
            settings(&[("MLTE_APP_PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidPort("eighty".into())
        );
        assert_eq!(
            settings(&[("MLTE_LOG_LEVEL", "TRACE")]).unwrap_err(),
            ConfigError::InvalidLogLevel("TRACE".into())
        );
        assert_eq!(
            settings(&[("MLTE_API_PREFIX", "api")]).unwrap_err(),
            ConfigError::InvalidPrefix("api".into())
        );
        assert!(matches!(
            settings(&[("MLTE_BACKEND_URI", "http://elsewhere:8080")]).unwrap_err(),
            ConfigError::InvalidBackend { .. }
        ));
        assert!(matches!(
            settings(&[("MLTE_BACKEND_URI", "ftp://nope")]).unwrap_err(),
            ConfigError::InvalidBackend { .. }
        ));
    }
}
