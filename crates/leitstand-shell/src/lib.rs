//! Command core for Leitstand.
//!
//! The shell is a registry-based dispatch system. Commands implement the
//! `Command` trait and are built from a static factory table at startup.
//! The dispatcher parses `Name:Value` input lines, resolves the name
//! case-insensitively, and converts every failure into a structured
//! `{status, result}` outcome.

mod command;
mod dispatch;
mod file_commands;
mod help;
mod net_commands;
mod registry;
mod system_commands;
mod text_commands;

/// A single executable command.
pub use command::{Command, CommandFactory};
/// Raw-line to outcome routing and error isolation.
pub use dispatch::Dispatcher;
/// Reserved (case-insensitive) name of the help command.
pub use help::HELP_NAME;
/// Frozen name-to-command table built from the factory table.
pub use registry::{BUILTIN_FACTORIES, CommandRegistry};
