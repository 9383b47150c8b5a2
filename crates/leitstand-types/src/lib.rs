//! Shared types for the Leitstand command shell.
//!
//! Holds the error enum, the `{status, result}` outcome contract that
//! every command and driver speaks, the TOML configuration surface, and
//! a minimal UTC wall-clock type.

pub mod config;
pub mod error;
pub mod outcome;
pub mod time;

/// Application configuration loaded from `config.toml`.
pub use config::Config;
/// Errors produced by the Leitstand framework.
pub use error::{LeitstandError, Result};
/// The `{status, result}` contract returned by every dispatch.
pub use outcome::{Outcome, Status};
/// UTC wall-clock timestamp with second resolution.
pub use time::WallTime;
