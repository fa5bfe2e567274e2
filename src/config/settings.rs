//! Configuration settings for the embed signer.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::SignerError;

use super::Secret;

/// Main configuration structure for the signer.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub embed: EmbedConfig,
    pub user: UserConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Signing protocol selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// HMAC-signed query string appended to the embed path.
    Query,
    /// HS256 JWT embedded in the base URL.
    Jwt,
}

/// Embed target configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedConfig {
    /// Base URL of the embed target to authorize.
    pub embed_path: String,
    /// Embed client ID issued by the analytics service.
    pub client_id: String,
    /// Which signing protocol to use.
    #[serde(default = "default_protocol")]
    pub protocol: Protocol,
    /// Inline embed secret. Prefer `secret_path` outside of development.
    #[serde(default)]
    pub secret: Option<Secret>,
    /// Path to a file holding the embed secret (0600 or 0400).
    #[serde(default)]
    pub secret_path: Option<PathBuf>,
}

/// Identity of the external user the credential authorizes.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    /// User's email address.
    pub email: String,
    /// User's external ID.
    #[serde(default = "default_external_user_id")]
    pub external_user_id: String,
    /// Comma-separated team names.
    #[serde(default)]
    pub teams: String,
    /// Account type claim, passed through uninterpreted by the JWT protocol.
    #[serde(default = "default_account_type")]
    pub account_type: String,
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Requested credential lifetime in seconds.
    #[serde(default = "default_session_length")]
    pub session_length: i64,
    /// Embedding mode.
    #[serde(default = "default_mode")]
    pub mode: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_protocol() -> Protocol {
    Protocol::Query
}

fn default_external_user_id() -> String {
    "1".to_string()
}

fn default_account_type() -> String {
    "embedUser".to_string()
}

fn default_session_length() -> i64 {
    3600
}

fn default_mode() -> String {
    "userbacked".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_length: default_session_length(),
            mode: default_mode(),
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

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SignerError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SignerError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| SignerError::Config {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), SignerError> {
        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SignerError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        // Validate log format
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(SignerError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        // Exactly one source for the embed secret
        match (&self.embed.secret, &self.embed.secret_path) {
            (None, None) => {
                return Err(SignerError::Config {
                    message: "Either 'embed.secret' or 'embed.secret_path' must be set"
                        .to_string(),
                });
            }
            (Some(_), Some(_)) => {
                return Err(SignerError::Config {
                    message: "'embed.secret' and 'embed.secret_path' are mutually exclusive"
                        .to_string(),
                });
            }
            _ => {}
        }

        Ok(())
    }

    /// Resolve the embed secret, reading the secret file if configured.
    pub fn resolve_secret(&self) -> Result<Secret, SignerError> {
        if let Some(secret) = &self.embed.secret {
            return Ok(secret.clone());
        }
        if let Some(path) = &self.embed.secret_path {
            return Secret::load(path);
        }
        Err(SignerError::Config {
            message: "No embed secret configured".to_string(),
        })
    }
}
