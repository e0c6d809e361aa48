//! Client configuration parsed from environment variables.

use std::path::{Path, PathBuf};

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_SESSION_DIR: &str = ".taskboard";
pub const DEFAULT_SESSION_FILE: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("cannot locate session file; set TASKBOARD_SESSION_FILE or HOME")]
    NoSessionPath,
}

/// Optional HTTP timeouts. `None` leaves the HTTP stack's defaults in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin without a trailing slash.
    pub base_url: String,
    /// Path prefix every endpoint lives under.
    pub api_prefix: String,
    /// Where the persisted session (`token`, `user`) is kept, if known.
    pub session_file: Option<PathBuf>,
    pub timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `TASKBOARD_BASE_URL`: default `http://127.0.0.1:5000`
    /// - `TASKBOARD_API_PREFIX`: default `/api`
    /// - `TASKBOARD_SESSION_FILE`: default `$HOME/.taskboard/session.json`
    /// - `TASKBOARD_REQUEST_TIMEOUT_SECS`: unset by default
    /// - `TASKBOARD_CONNECT_TIMEOUT_SECS`: unset by default
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("TASKBOARD_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let api_prefix = std::env::var("TASKBOARD_API_PREFIX").unwrap_or_else(|_| DEFAULT_API_PREFIX.to_owned());
        let session_file = match std::env::var("TASKBOARD_SESSION_FILE") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => default_session_file(std::env::var("HOME").ok().as_deref()).ok(),
        };
        let timeouts = HttpTimeouts {
            request_secs: env_parse_secs("TASKBOARD_REQUEST_TIMEOUT_SECS")?,
            connect_secs: env_parse_secs("TASKBOARD_CONNECT_TIMEOUT_SECS")?,
        };

        Ok(Self::new(base_url, api_prefix, session_file, timeouts))
    }

    /// Build a config from explicit values, normalizing slashes.
    #[must_use]
    pub fn new(base_url: String, api_prefix: String, session_file: Option<PathBuf>, timeouts: HttpTimeouts) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_prefix: normalize_prefix(&api_prefix),
            session_file,
            timeouts,
        }
    }

    /// Resolved session file path.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `TASKBOARD_SESSION_FILE` nor `HOME` was set.
    pub fn session_path(&self) -> Result<&Path, ConfigError> {
        self.session_file.as_deref().ok_or(ConfigError::NoSessionPath)
    }
}

fn env_parse_secs(key: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var: key, value: raw }),
        Err(_) => Ok(None),
    }
}

fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}

fn default_session_file(home: Option<&str>) -> Result<PathBuf, ConfigError> {
    let home = home.filter(|h| !h.trim().is_empty()).ok_or(ConfigError::NoSessionPath)?;
    Ok(PathBuf::from(home).join(DEFAULT_SESSION_DIR).join(DEFAULT_SESSION_FILE))
}
