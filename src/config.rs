//! Configuration system for the name-steal skill
//!
//! Every section is optional; an empty file yields a server on 0.0.0.0:8080
//! serving `/alexa` with the plain (non-phonetic) name handler.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Main skill configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SkillConfig {
    #[serde(default)]
    pub skill: SkillSection,
    #[serde(default)]
    pub server: ServerSection,
    /// Phonetic conversion; when absent the new name is spoken as the bare character
    pub phonetic: Option<PhoneticSection>,
}

/// Skill identity section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SkillSection {
    /// Expected application id; requests carrying another id are refused
    pub application_id: Option<String>,
}

/// HTTP endpoint section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path segment the platform posts request envelopes to
    #[serde(default = "default_path")]
    pub path: String,
    /// Reject envelopes whose timestamp is too far from the local clock
    #[serde(default = "default_verify_timestamp")]
    pub verify_timestamp: bool,
    #[serde(default = "default_timestamp_tolerance")]
    pub timestamp_tolerance_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            verify_timestamp: default_verify_timestamp(),
            timestamp_tolerance_secs: default_timestamp_tolerance(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_path() -> String {
    "alexa".to_string()
}

fn default_verify_timestamp() -> bool {
    true
}

fn default_timestamp_tolerance() -> u64 {
    150
}

/// Phonetic conversion API section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoneticSection {
    #[serde(default = "default_phonetic_endpoint")]
    pub endpoint: String,
    /// Environment variable containing the API application id
    #[serde(default = "default_app_id_env")]
    pub app_id_env: String,
    /// "hiragana" or "katakana"
    #[serde(default = "default_output_type")]
    pub output_type: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PhoneticSection {
    fn default() -> Self {
        Self {
            endpoint: default_phonetic_endpoint(),
            app_id_env: default_app_id_env(),
            output_type: default_output_type(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_phonetic_endpoint() -> String {
    "https://labs.goo.ne.jp/api/hiragana".to_string()
}

fn default_app_id_env() -> String {
    "GOO_APP_ID".to_string()
}

fn default_output_type() -> String {
    "hiragana".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid application id: {0}")]
    InvalidApplicationId(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SkillConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SkillConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref application_id) = self.skill.application_id {
            validate_application_id(application_id)?;
        }

        self.server.validate()?;

        if let Some(ref phonetic) = self.phonetic {
            phonetic.validate()?;
        }

        Ok(())
    }

    /// Get the phonetic API application id from its environment variable
    pub fn get_phonetic_app_id(&self) -> Result<Option<String>, ConfigError> {
        match &self.phonetic {
            Some(phonetic) => std::env::var(&phonetic.app_id_env)
                .map(Some)
                .map_err(|_| ConfigError::EnvVarNotFound(phonetic.app_id_env.clone())),
            None => Ok(None),
        }
    }
}

impl ServerSection {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() || self.path.contains('/') {
            return Err(ConfigError::InvalidConfig(format!(
                "server.path '{}' must be a single non-empty path segment",
                self.path
            )));
        }
        if self.host.parse::<std::net::IpAddr>().is_err() {
            return Err(ConfigError::InvalidConfig(format!(
                "server.host '{}' must be an IP address",
                self.host
            )));
        }
        Ok(())
    }
}

impl PhoneticSection {
    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::InvalidConfig(format!(
                "phonetic.endpoint '{}' is not a valid URL: {e}",
                self.endpoint
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidConfig(format!(
                "phonetic.endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if !matches!(self.output_type.as_str(), "hiragana" | "katakana") {
            return Err(ConfigError::InvalidConfig(format!(
                "phonetic.output_type must be 'hiragana' or 'katakana', got '{}'",
                self.output_type
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "phonetic.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Application ids look like `amzn1.ask.skill.<uuid>`
fn validate_application_id(application_id: &str) -> Result<(), ConfigError> {
    let valid_chars = application_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');

    if application_id.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidApplicationId(format!(
            "Application id '{application_id}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}
