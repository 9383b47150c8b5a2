//! Error types for Leitstand.

use std::io;

/// Errors produced by the Leitstand framework.
#[derive(Debug, thiserror::Error)]
pub enum LeitstandError {
    #[error("config error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("network error: {0}")]
    Net(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LeitstandError>;
