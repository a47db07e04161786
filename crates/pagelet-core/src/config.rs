//! Plugin configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::wire::PLAIN_HEADER;

/// Host event emitted after a fragment class is transformed.
pub const TRANSFORM_EVENT: &str = "transform:fragment-class:after";

/// Host event emitted when a fragment instance is created.
pub const CREATE_EVENT: &str = "create";

/// Protocol and hook configuration for the xhr plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XhrConfig {
    /// Response header that marks a response as plain.
    #[serde(default = "default_plain_header")]
    pub plain_header: String,

    /// Host event on which the response shaper installs `plain`.
    #[serde(default = "default_transform_event")]
    pub transform_event: String,

    /// Host event on which the `xhr` namespace is attached.
    #[serde(default = "default_create_event")]
    pub create_event: String,
}

fn default_plain_header() -> String {
    PLAIN_HEADER.to_string()
}

fn default_transform_event() -> String {
    TRANSFORM_EVENT.to_string()
}

fn default_create_event() -> String {
    CREATE_EVENT.to_string()
}

impl Default for XhrConfig {
    fn default() -> Self {
        Self {
            plain_header: default_plain_header(),
            transform_event: default_transform_event(),
            create_event: default_create_event(),
        }
    }
}

impl XhrConfig {
    /// Load config from a TOML file, or JSON if the path ends in `.json`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Set the plain header name.
    pub fn with_plain_header(mut self, header: impl Into<String>) -> Self {
        self.plain_header = header.into();
        self
    }

    /// Set the transform event name.
    pub fn with_transform_event(mut self, event: impl Into<String>) -> Self {
        self.transform_event = event.into();
        self
    }

    /// Set the create event name.
    pub fn with_create_event(mut self, event: impl Into<String>) -> Self {
        self.create_event = event.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = XhrConfig::default();

        assert_eq!(config.plain_header, "plain");
        assert_eq!(config.transform_event, "transform:fragment-class:after");
        assert_eq!(config.create_event, "create");
    }

    #[test]
    fn test_config_builders() {
        let config = XhrConfig::default()
            .with_plain_header("x-plain")
            .with_create_event("pagelet:create");

        assert_eq!(config.plain_header, "x-plain");
        assert_eq!(config.create_event, "pagelet:create");
        assert_eq!(config.transform_event, TRANSFORM_EVENT);
    }

    #[test]
    fn test_config_load_toml_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xhr.toml");
        std::fs::write(&path, "plain_header = \"x-plain\"\n").unwrap();

        let config = XhrConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.plain_header, "x-plain");
        assert_eq!(config.create_event, "create");
    }

    #[test]
    fn test_config_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xhr.json");
        std::fs::write(&path, r#"{"create_event": "spawn"}"#).unwrap();

        let config = XhrConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.create_event, "spawn");
        assert_eq!(config.plain_header, "plain");
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = XhrConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
