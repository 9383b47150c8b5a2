//! The `{status, result}` outcome contract.
//!
//! Every command execution and every driver response is exactly one
//! [`Outcome`]. There is no other success/failure side channel.

use serde::{Deserialize, Serialize};

/// Whether a dispatch succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Result of one command dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: Status,
    pub result: String,
}

impl Outcome {
    /// A success outcome carrying the given result text.
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            result: result.into(),
        }
    }

    /// An error outcome carrying the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            result: message.into(),
        }
    }

    /// Whether this outcome reports success.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
