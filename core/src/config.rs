//! Adapter configuration loaded from TOML.
//!
//! ```toml
//! fcs_base_url = "https://fcs.internal"
//! request_timeout_secs = 30
//!
//! [translator]
//! enabled = true
//! url = "http://translate.internal"
//! target_language = "de"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("missing required configuration field: {0}")]
    MissingField(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdapterConfig {
    /// Base URL of the FC middleware; request paths are appended to it.
    pub fcs_base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub translator: TranslatorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub url: String,

    #[serde(default = "default_target_language")]
    pub target_language: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            target_language: default_target_language(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_target_language() -> String {
    "de".to_string()
}

impl AdapterConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AdapterConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fcs_base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("fcs_base_url".to_string()));
        }
        if self.translator.enabled && self.translator.url.trim().is_empty() {
            return Err(ConfigError::MissingField("translator.url".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configuration pointing at local mock services.
    pub fn default_test_config() -> Self {
        Self {
            fcs_base_url: "http://127.0.0.1:3000".to_string(),
            request_timeout_secs: 5,
            translator: TranslatorConfig {
                enabled: false,
                url: "http://127.0.0.1:3000".to_string(),
                target_language: default_target_language(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = AdapterConfig::from_toml_str(r#"fcs_base_url = "https://fcs.internal""#).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.translator.enabled);
        assert_eq!(config.translator.target_language, "de");
    }

    #[test]
    fn full_config_parses() {
        let config = AdapterConfig::from_toml_str(
            r#"
            fcs_base_url = "https://fcs.internal"
            request_timeout_secs = 10

            [translator]
            enabled = true
            url = "http://translate.internal"
            target_language = "it"
            "#,
        )
        .unwrap();
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.translator.enabled);
        assert_eq!(config.translator.target_language, "it");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = AdapterConfig::from_toml_str(r#"fcs_base_url = """#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "fcs_base_url"));
    }

    #[test]
    fn enabled_translator_needs_url() {
        let err = AdapterConfig::from_toml_str(
            r#"
            fcs_base_url = "https://fcs.internal"
            [translator]
            enabled = true
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "translator.url"));
    }

    #[test]
    fn missing_base_url_is_a_parse_error() {
        let err = AdapterConfig::from_toml_str("request_timeout_secs = 3").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = AdapterConfig::from_file("/nonexistent/fc-adapter.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }
}
