//! The built-in help command.
//!
//! Help is special: it needs the registry's listing, so the registry
//! builds it last, after every other command is in place, and only when
//! no other command has claimed the reserved name.

use leitstand_types::{Outcome, Result};

use crate::command::Command;

/// Reserved (case-folded) key of the help command.
pub const HELP_NAME: &str = "help";

/// Lists every registered command with its description.
///
/// Holds a snapshot of the listing taken at registry build time; the
/// registry is frozen afterwards, so the snapshot never goes stale.
pub struct HelpCommand {
    entries: Vec<(String, String)>,
}

impl HelpCommand {
    /// Build from the registry's frozen (name, description) listing.
    pub fn from_listing(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }
}

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "Help"
    }

    fn description(&self) -> &str {
        "lists all available commands."
    }

    fn execute(&self, _value: &str) -> Result<Outcome> {
        let mut text = String::from("available commands:\n");
        for (name, description) in &self.entries {
            let first_line = description.lines().next().unwrap_or("");
            text.push_str(&format!("- {name}: {first_line}\n"));
        }
        text.push_str("- exit: terminates the session.");
        Ok(Outcome::success(text))
    }
}
