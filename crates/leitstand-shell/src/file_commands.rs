//! File commands: save, read, delete.
//!
//! Bad input (missing file name, file not present) is a regular error
//! outcome with a user-facing message; unexpected I/O failures propagate
//! as `Err` and are wrapped by the dispatcher.

use std::io::ErrorKind;

use leitstand_types::{Config, Outcome, Result};

use crate::command::Command;

// ---------------------------------------------------------------------------
// Speichern
// ---------------------------------------------------------------------------

/// Writes content to a file. Value syntax: `filename:content`.
pub struct SpeichernCommand;

impl SpeichernCommand {
    pub fn build(_config: &Config) -> Result<Box<dyn Command>> {
        Ok(Box::new(Self))
    }
}

impl Command for SpeichernCommand {
    fn name(&self) -> &str {
        "Speichern"
    }

    fn description(&self) -> &str {
        "saves content to a file. Usage: Speichern:filename:content"
    }

    fn execute(&self, value: &str) -> Result<Outcome> {
        let Some((file, content)) = value.split_once(':') else {
            return Ok(Outcome::error("file name and content required"));
        };
        let file = file.trim();
        if file.is_empty() {
            return Ok(Outcome::error("file name and content required"));
        }
        std::fs::write(file, content)?;
        Ok(Outcome::success(format!("file '{file}' saved")))
    }
}

// ---------------------------------------------------------------------------
// Lesen
// ---------------------------------------------------------------------------

/// Reads a file and returns its content.
pub struct LesenCommand;

impl LesenCommand {
    pub fn build(_config: &Config) -> Result<Box<dyn Command>> {
        Ok(Box::new(Self))
    }
}

impl Command for LesenCommand {
    fn name(&self) -> &str {
        "Lesen"
    }

    fn description(&self) -> &str {
        "reads a file. Usage: Lesen:filename"
    }

    fn execute(&self, value: &str) -> Result<Outcome> {
        let file = value.trim();
        if file.is_empty() {
            return Ok(Outcome::error("file name required"));
        }
        match std::fs::read_to_string(file) {
            Ok(content) => Ok(Outcome::success(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Ok(Outcome::error(format!("file '{file}' not found")))
            },
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Löschen
// ---------------------------------------------------------------------------

/// Deletes a file.
pub struct LoeschenCommand;

impl LoeschenCommand {
    pub fn build(_config: &Config) -> Result<Box<dyn Command>> {
        Ok(Box::new(Self))
    }
}

impl Command for LoeschenCommand {
    fn name(&self) -> &str {
        "Löschen"
    }

    fn description(&self) -> &str {
        "deletes a file. Usage: Löschen:filename"
    }

    fn execute(&self, value: &str) -> Result<Outcome> {
        let file = value.trim();
        if file.is_empty() {
            return Ok(Outcome::error("file name required"));
        }
        match std::fs::remove_file(file) {
            Ok(()) => Ok(Outcome::success(format!("file '{file}' deleted"))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Ok(Outcome::error(format!("file '{file}' not found")))
            },
            Err(e) => Err(e.into()),
        }
    }
}
