//! Command registry: the frozen name-to-command table.
//!
//! Built once at startup from a static factory table. A factory that
//! fails is logged and skipped; the rest of the registry still comes up.
//! After `build` returns the table never changes, so lookups need no
//! locking and the table can be shared freely across threads.

use std::collections::HashMap;
use std::sync::Arc;

use leitstand_types::Config;

use crate::command::{Command, CommandFactory};
use crate::file_commands::{LesenCommand, LoeschenCommand, SpeichernCommand};
use crate::help::{HELP_NAME, HelpCommand};
use crate::net_commands::{NetzwerkCommand, WetterCommand};
use crate::system_commands::ZeitCommand;
use crate::text_commands::{AnalyseCommand, RechnerCommand};

/// Factories for every built-in command, in registration order.
pub const BUILTIN_FACTORIES: &[CommandFactory] = &[
    SpeichernCommand::build,
    LesenCommand::build,
    LoeschenCommand::build,
    AnalyseCommand::build,
    NetzwerkCommand::build,
    RechnerCommand::build,
    WetterCommand::build,
    ZeitCommand::build,
];

/// Capitalize the first character, lowercase the rest. Unicode-aware so
/// names like "löschen" round-trip to "Löschen".
pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        },
        None => String::new(),
    }
}

/// The frozen lookup table.
///
/// Each command is stored under two keys, its lowercase and its
/// Capitalized form, so the two most common spellings hit the fast
/// path; `resolve` falls back to a full case-insensitive scan for
/// anything else (e.g. "zEIT").
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Build the registry with all built-in commands.
    pub fn build(config: &Config) -> Self {
        Self::build_with(BUILTIN_FACTORIES, config)
    }

    /// Build the registry from an explicit factory table.
    pub fn build_with(factories: &[CommandFactory], config: &Config) -> Self {
        let mut commands: HashMap<String, Arc<dyn Command>> = HashMap::new();

        for factory in factories {
            match factory(config) {
                Ok(cmd) => insert(&mut commands, Arc::from(cmd)),
                Err(e) => log::warn!("skipping command: construction failed: {e}"),
            }
        }

        // Help goes in last so its listing covers everything, and only
        // if no registered command already claimed the reserved name.
        let help_taken = commands.keys().any(|k| k.to_lowercase() == HELP_NAME);
        if !help_taken {
            let entries = listing_of(&commands);
            insert(&mut commands, Arc::new(HelpCommand::from_listing(entries)));
        }

        Self { commands }
    }

    /// Resolve a command name case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn Command>> {
        if let Some(cmd) = self.commands.get(name) {
            return Some(cmd);
        }
        if let Some(cmd) = self.commands.get(&name.to_lowercase()) {
            return Some(cmd);
        }
        // Slow path for mixed-case spellings of keys that are not
        // themselves lowercase (defensive; insert always adds both).
        let folded = name.to_lowercase();
        self.commands
            .iter()
            .find(|(key, _)| key.to_lowercase() == folded)
            .map(|(_, cmd)| cmd)
    }

    /// Sorted (name, description) pairs of every command except help.
    pub fn listing(&self) -> Vec<(String, String)> {
        listing_of(&self.commands)
    }

    /// Number of distinct commands (not keys).
    pub fn len(&self) -> usize {
        let mut names: Vec<String> = self
            .commands
            .values()
            .map(|c| c.name().to_lowercase())
            .collect();
        names.sort();
        names.dedup();
        names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Insert one command under both of its lookup keys.
fn insert(commands: &mut HashMap<String, Arc<dyn Command>>, cmd: Arc<dyn Command>) {
    let name = cmd.name().to_string();
    for key in [name.to_lowercase(), capitalize(&name)] {
        if let Some(displaced) = commands.insert(key.clone(), Arc::clone(&cmd)) {
            if displaced.name() != cmd.name() {
                log::warn!(
                    "command name collision on '{key}': '{}' replaces '{}'",
                    cmd.name(),
                    displaced.name(),
                );
            }
        }
    }
}

/// Deduped, case-insensitively sorted listing, help excluded.
fn listing_of(commands: &HashMap<String, Arc<dyn Command>>) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();
    for cmd in commands.values() {
        if cmd.name().to_lowercase() == HELP_NAME {
            continue;
        }
        let pair = (cmd.name().to_string(), cmd.description().to_string());
        if !entries.contains(&pair) {
            entries.push(pair);
        }
    }
    entries.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use leitstand_types::{LeitstandError, Outcome, Result};

    #[test]
    fn capitalize_handles_ascii_and_unicode() {
        assert_eq!(capitalize("speichern"), "Speichern");
        assert_eq!(capitalize("LÖSCHEN"), "Löschen");
        assert_eq!(capitalize("löschen"), "Löschen");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("x"), "X");
    }

    #[test]
    fn all_builtins_register() {
        let reg = CommandRegistry::build(&Config::default());
        for name in [
            "Speichern", "Lesen", "Löschen", "Analyse", "Netzwerk", "Rechner", "Wetter", "Zeit",
            "Help",
        ] {
            assert!(reg.resolve(name).is_some(), "missing {name}");
        }
        assert_eq!(reg.len(), 9);
    }

    #[test]
    fn resolution_is_case_insensitive() {
        let reg = CommandRegistry::build(&Config::default());
        for spelling in ["zeit", "Zeit", "ZEIT", "zEiT"] {
            let cmd = reg.resolve(spelling).expect(spelling);
            assert_eq!(cmd.name(), "Zeit");
        }
        assert_eq!(reg.resolve("löschen").unwrap().name(), "Löschen");
        assert_eq!(reg.resolve("LÖSCHEN").unwrap().name(), "Löschen");
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let reg = CommandRegistry::build(&Config::default());
        assert!(reg.resolve("Flug").is_none());
        assert!(reg.resolve("").is_none());
    }

    #[test]
    fn listing_is_sorted_and_excludes_help() {
        let reg = CommandRegistry::build(&Config::default());
        let listing = reg.listing();
        assert_eq!(listing.len(), 8);
        assert!(listing.iter().all(|(name, _)| name != "Help"));
        let names: Vec<&str> = listing.iter().map(|(n, _)| n.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_by_key(|n| n.to_lowercase());
        assert_eq!(names, sorted);
    }

    #[test]
    fn help_output_covers_every_command() {
        let reg = CommandRegistry::build(&Config::default());
        let help = reg.resolve("help").unwrap();
        let outcome = help.execute("").unwrap();
        for name in ["Speichern", "Lesen", "Löschen", "Analyse", "Netzwerk", "Rechner", "Wetter",
            "Zeit"]
        {
            assert!(outcome.result.contains(&format!("- {name}:")), "missing {name}");
        }
    }

    // -----------------------------------------------------------------------
    // Faulty and colliding factories
    // -----------------------------------------------------------------------

    struct Named(&'static str);
    impl crate::command::Command for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "test command."
        }
        fn execute(&self, _value: &str) -> Result<Outcome> {
            Ok(Outcome::success(self.0))
        }
    }

    fn failing_factory(_config: &Config) -> Result<Box<dyn crate::command::Command>> {
        Err(LeitstandError::Command("missing hardware".to_string()))
    }

    fn first_zeit(_config: &Config) -> Result<Box<dyn crate::command::Command>> {
        Ok(Box::new(Named("zeit")))
    }

    fn second_zeit(_config: &Config) -> Result<Box<dyn crate::command::Command>> {
        Ok(Box::new(Named("Zeit")))
    }

    #[test]
    fn failing_factory_is_skipped_not_fatal() {
        let reg =
            CommandRegistry::build_with(&[failing_factory, first_zeit], &Config::default());
        assert!(reg.resolve("zeit").is_some());
        // zeit + help
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn synthesized_help_lists_the_surviving_commands() {
        let reg =
            CommandRegistry::build_with(&[failing_factory, first_zeit], &Config::default());
        let outcome = reg.resolve("help").unwrap().execute("").unwrap();
        assert!(outcome.result.contains("- zeit: test command."));
        assert!(outcome.result.contains("- exit:"));
    }

    #[test]
    fn name_collision_keeps_the_last_registration() {
        let reg = CommandRegistry::build_with(&[first_zeit, second_zeit], &Config::default());
        let cmd = reg.resolve("ZEIT").unwrap();
        assert_eq!(cmd.name(), "Zeit");
    }

    #[test]
    fn empty_factory_table_still_gets_help() {
        let reg = CommandRegistry::build_with(&[], &Config::default());
        assert!(!reg.is_empty());
        let help = reg.resolve("HELP").unwrap();
        let outcome = help.execute("").unwrap();
        assert!(outcome.result.contains("exit"));
    }
}
