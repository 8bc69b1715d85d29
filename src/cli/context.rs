//! Command context passed to format hooks
//!
//! Before parsing, `can_read`/`can_write` get a mutable context and may add
//! format-specific options to the underlying [`clap::Command`]. After
//! parsing, `read`/`write` get a shared context and look up the values the
//! user gave for this invocation.

use std::ffi::OsString;

use clap::{Arg, ArgAction, ArgMatches, Command};

/// Option state for one command invocation
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    command: Command,
    matches: Option<ArgMatches>,
}

impl CommandContext {
    /// Creates a context for a command with no arguments yet
    pub fn new(name: &'static str) -> Self {
        Self::from_command(Command::new(name))
    }

    /// Wraps an existing command definition
    pub fn from_command(command: Command) -> Self {
        Self {
            command,
            matches: None,
        }
    }

    /// Adds an argument unless one with the same id exists
    ///
    /// Hooks may be queried more than once per invocation, so adding the
    /// same option twice is a no-op.
    pub fn arg(&mut self, arg: Arg) -> &mut Self {
        if !self.has_arg(arg.get_id().as_str()) {
            self.command = std::mem::take(&mut self.command).arg(arg);
        }
        self
    }

    /// Adds a boolean `--<name>` switch
    pub fn add_flag(&mut self, name: &'static str, help: &'static str) -> &mut Self {
        self.arg(
            Arg::new(name)
                .long(name)
                .help(help)
                .action(ArgAction::SetTrue),
        )
    }

    /// Adds a `--<name> <value>` option
    pub fn add_option(
        &mut self,
        name: &'static str,
        help: &'static str,
        default: Option<&'static str>,
    ) -> &mut Self {
        let mut arg = Arg::new(name)
            .long(name)
            .help(help)
            .action(ArgAction::Set);
        if let Some(default) = default {
            arg = arg.default_value(default);
        }
        self.arg(arg)
    }

    /// Returns true if an argument with this id is defined
    pub fn has_arg(&self, id: &str) -> bool {
        self.command.get_arguments().any(|arg| arg.get_id() == id)
    }

    /// Parses the invocation's arguments (first item is the command name)
    ///
    /// Parsing works on a copy, so the stored command stays open for hooks
    /// that add options after an earlier parse.
    pub fn parse_from<I, T>(&mut self, args: I) -> Result<(), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(args)?;
        self.matches = Some(matches);
        Ok(())
    }

    /// Returns true once arguments have been parsed
    pub fn is_parsed(&self) -> bool {
        self.matches.is_some()
    }

    /// Value of a boolean switch; false if unknown or not parsed
    pub fn flag(&self, id: &str) -> bool {
        self.matches
            .as_ref()
            .and_then(|m| m.try_get_one::<bool>(id).ok().flatten())
            .copied()
            .unwrap_or(false)
    }

    /// Value of a single-valued option
    pub fn value(&self, id: &str) -> Option<&str> {
        self.matches
            .as_ref()
            .and_then(|m| m.try_get_one::<String>(id).ok().flatten())
            .map(String::as_str)
    }

    /// All values of a multi-valued option
    pub fn values(&self, id: &str) -> Vec<&str> {
        self.matches
            .as_ref()
            .and_then(|m| m.try_get_many::<String>(id).ok().flatten())
            .map(|values| values.map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// The command definition, including options added by hooks
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// The parsed matches, if any
    pub fn matches(&self) -> Option<&ArgMatches> {
        self.matches.as_ref()
    }
}
