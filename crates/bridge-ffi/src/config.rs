//! Configuration loading and validation for the embedded bridge.
//!
//! Values are read from `CRYPTO_BRIDGE_*` environment variables when the host
//! calls `crypto_bridge_init`. Every field has a default, so an empty
//! environment is valid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable prefix (`CRYPTO_BRIDGE_LOG_LEVEL`, ...).
pub const ENV_PREFIX: &str = "CRYPTO_BRIDGE";

/// Validated bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log line format: `"json"` or `"text"`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON lines.
    Json,
    /// Compact human-readable lines.
    Text,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "json".into()
}

impl BridgeConfig {
    /// Load and validate configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build crypto bridge configuration")?;

        let c: BridgeConfig = cfg
            .try_deserialize()
            .context("failed to deserialise crypto bridge configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Parsed [`LogFormat`].
    ///
    /// # Errors
    ///
    /// Returns an error for anything other than `json` or `text`.
    pub fn format(&self) -> Result<LogFormat> {
        match self.log_format.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            other => anyhow::bail!("CRYPTO_BRIDGE_LOG_FORMAT must be json or text, got {other:?}"),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("CRYPTO_BRIDGE_LOG_LEVEL must not be empty");
        }
        self.format()?;
        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> config::Environment {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
        let cfg = BridgeConfig::from_source(env(&[])).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.format().unwrap(), LogFormat::Json);
    }

    #[test]
    fn reads_prefixed_variables() {
        let cfg = BridgeConfig::from_source(env(&[
            ("CRYPTO_BRIDGE_LOG_LEVEL", "debug"),
            ("CRYPTO_BRIDGE_LOG_FORMAT", "TEXT"),
        ]))
        .unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.format().unwrap(), LogFormat::Text);
    }

    #[test]
    fn validate_rejects_unknown_format() {
        let cfg = BridgeConfig {
            log_format: "xml".into(),
            ..BridgeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_level() {
        let cfg = BridgeConfig {
            log_level: "  ".into(),
            ..BridgeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_default() {
        assert!(BridgeConfig::default().validate().is_ok());
    }
}
