//! System commands.

use leitstand_types::{Config, Outcome, Result, WallTime};

use crate::command::Command;

/// Shows the current time.
pub struct ZeitCommand;

impl ZeitCommand {
    pub fn build(_config: &Config) -> Result<Box<dyn Command>> {
        Ok(Box::new(Self))
    }
}

impl Command for ZeitCommand {
    fn name(&self) -> &str {
        "Zeit"
    }

    fn description(&self) -> &str {
        "shows the current time. Usage: Zeit"
    }

    fn execute(&self, _value: &str) -> Result<Outcome> {
        Ok(Outcome::success(format!(
            "current time: {}",
            WallTime::now_utc().format_de(),
        )))
    }
}
