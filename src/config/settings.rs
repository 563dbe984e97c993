//! Console settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DEFAULT_COMMAND_PREFIX;

/// Settings for the command console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Command prefix character.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: char,

    /// Log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_command_prefix() -> char {
    DEFAULT_COMMAND_PREFIX
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
            log_level: default_log_level(),
        }
    }
}

impl ConsoleSettings {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        let settings = serde_json::from_str(&raw)?;
        Ok(settings)
    }

    /// Saves settings to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))
    }

    /// Creates settings from environment variables with defaults.
    ///
    /// `COMMAND_PREFIX` must be a single character; anything else falls
    /// back to the default. The log level comes from `RUST_LOG`.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self {
            command_prefix: std::env::var("COMMAND_PREFIX")
                .ok()
                .and_then(|s| parse_prefix(&s))
                .unwrap_or_else(default_command_prefix),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| default_log_level()),
        }
    }
}

/// Parses a prefix setting; only a single character is accepted.
fn parse_prefix(raw: &str) -> Option<char> {
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ConsoleSettings::default();
        assert_eq!(settings.command_prefix, '/');
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(parse_prefix("/"), Some('/'));
        assert_eq!(parse_prefix("!"), Some('!'));
        assert_eq!(parse_prefix(" ! "), Some('!'));
        assert_eq!(parse_prefix(""), None);
        assert_eq!(parse_prefix("!!"), None);
    }

    #[test]
    fn test_settings_json_defaults() {
        let settings: ConsoleSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.command_prefix, '/');
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_settings_json_overrides() {
        let settings: ConsoleSettings =
            serde_json::from_str(r#"{"command_prefix": "!", "log_level": "debug"}"#).unwrap();
        assert_eq!(settings.command_prefix, '!');
        assert_eq!(settings.log_level, "debug");
    }
}
