//! Dispatcher: raw input line to outcome.
//!
//! Parsing is `Name:Value` split at the first colon only; the value is
//! handed to the command verbatim, colons and all. Every failure mode
//! (empty input, unknown name, handler error) becomes an error outcome
//! with a fixed diagnostic, so callers always get `{status, result}`.

use leitstand_types::Outcome;

use crate::registry::CommandRegistry;

/// Routes parsed lines through the frozen registry.
pub struct Dispatcher {
    registry: CommandRegistry,
}

/// Split a trimmed line into (name, value) at the first colon.
/// The name is trimmed; the value is untouched.
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((name, value)) => (name.trim(), value),
        None => (line, ""),
    }
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Process one raw input line.
    pub fn process(&self, raw: &str) -> Outcome {
        let line = raw.trim();
        if line.is_empty() {
            return Outcome::error("no command entered");
        }

        // An empty name (input like ":value") is not the empty-input
        // case; it falls through to resolution and fails as not found.
        let (name, value) = split_command(line);
        let Some(cmd) = self.registry.resolve(name) else {
            return Outcome::error(format!("command '{name}' not found"));
        };

        match cmd.execute(value) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("command '{}' failed: {e}", cmd.name());
                Outcome::error(format!("command execution failed: {e}"))
            },
        }
    }
}
