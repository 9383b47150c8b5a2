//! Application configuration.
//!
//! Loaded from a TOML file. Every key is optional: a missing file or a
//! missing key disables the dependent feature instead of failing startup.

use std::path::Path;

use serde::Deserialize;

use crate::error::{LeitstandError, Result};

/// Placeholder value shipped in sample configs; treated as "not set".
const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Third-party API keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// OpenWeatherMap API key for the weather command.
    #[serde(default)]
    pub openweathermap_key: Option<String>,
}

/// Policy-gate collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// Full URL of the policy-check endpoint. Absent = gate skipped.
    #[serde(default)]
    pub url: Option<String>,
}

/// Flight-recorder collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightRecorderConfig {
    /// Full URL of the flight-record endpoint. Absent = no remote audit.
    #[serde(default)]
    pub url: Option<String>,
    /// Local append-only JSON-lines audit log. Absent = no local audit.
    #[serde(default)]
    pub log_file: Option<String>,
}

/// HTTP driver settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    /// Port for the HTTP driver. 0 or absent = interactive only.
    #[serde(default)]
    pub port: u16,
}

/// Full application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub flight_recorder: FlightRecorderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| LeitstandError::Config(format!("config.toml: {e}")))
    }

    /// Load configuration from a file.
    ///
    /// A missing file yields the all-disabled default configuration; a
    /// present but malformed file is an error (a typo should not silently
    /// turn every feature off).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no config file at {}, using defaults", path.display());
                Ok(Self::default())
            },
            Err(e) => Err(e.into()),
        }
    }

    /// The configured OpenWeatherMap key, if usable.
    ///
    /// Empty strings and the sample placeholder count as unset.
    pub fn openweathermap_key(&self) -> Option<&str> {
        match self.api.openweathermap_key.as_deref() {
            Some("") | Some(API_KEY_PLACEHOLDER) | None => None,
            Some(key) => Some(key),
        }
    }
}
