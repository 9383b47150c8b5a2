//! The command capability contract.

use leitstand_types::{Config, Outcome, Result};

/// A single executable command.
///
/// `execute` receives the raw value (everything after the first colon of
/// the input line) and returns an [`Outcome`] that passes through the
/// dispatcher verbatim, success or error alike. Returning `Err` is the
/// "handler raised" path: the dispatcher catches it and converts it into
/// an error outcome, so no failure ever escapes a dispatch.
pub trait Command: Send + Sync {
    /// Display name (what the user types, e.g. `"Speichern"`).
    fn name(&self) -> &str;

    /// One-line description for the help listing.
    fn description(&self) -> &str;

    /// Execute the command with the given value.
    fn execute(&self, value: &str) -> Result<Outcome>;
}

/// Uniform constructor signature for every command.
///
/// Each factory receives the full configuration and ignores what it does
/// not need; a factory that fails is skipped at registry build time.
pub type CommandFactory = fn(&Config) -> Result<Box<dyn Command>>;
