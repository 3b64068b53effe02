//! Command definitions, registry, and dispatch.
//!
//! This module provides:
//! - [`Command`] - a single-character key bound to a callback plus metadata
//! - [`CommandRegistry`] - key-to-command map with last-write-wins insertion
//! - [`CommandRegistry::dispatch`] - pure validation and invocation of one
//!   submitted line
//!
//! Dispatch never performs I/O; it returns a [`Dispatch`] describing the new
//! input text, what happened, and whether the line should be recorded to
//! history. The engine routes that result through the host accessors.

use std::collections::HashMap;
use std::fmt;

use crate::error::{CommandError, UserError};

// ============================================================================
// Argument Rules
// ============================================================================

/// Policy governing whether a command accepts trailing argument text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgRule {
    /// The command takes no argument; trailing text is an error.
    None,
    /// The command accepts an argument but runs without one too.
    Optional,
    /// The command refuses to run without an argument.
    Required,
}

// ============================================================================
// Command Callbacks
// ============================================================================

/// A command callback, tagged by arity.
///
/// The variant is selected by the [`Command`] constructor, so a command with
/// [`ArgRule::None`] always holds a zero-argument callback and the others a
/// one-argument callback. Callbacks are fallible; an `Err` is caught at the
/// dispatcher boundary and surfaced through the host's error sink.
pub enum CommandAction {
    /// Zero-argument callback for [`ArgRule::None`] commands.
    Niladic(Box<dyn FnMut() -> Result<(), CommandError>>),
    /// One-argument callback; receives the (possibly empty) argument text.
    Monadic(Box<dyn FnMut(&str) -> Result<(), CommandError>>),
    /// A command interpreted by the dispatcher itself.
    Builtin(Builtin),
}

/// Commands executed by the engine rather than a registered callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    /// List registered keys, or show one command's help text.
    Help,
}

impl fmt::Debug for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Niladic(_) => f.write_str("Niladic(..)"),
            Self::Monadic(_) => f.write_str("Monadic(..)"),
            Self::Builtin(b) => write!(f, "Builtin({b:?})"),
        }
    }
}

// ============================================================================
// Command
// ============================================================================

/// A command registered under a single-character key.
///
/// Construct with [`Command::niladic`] for commands that take no argument or
/// [`Command::monadic`] for commands that take one (optional by default,
/// [`Command::required`] to demand it).
pub struct Command {
    key: char,
    help_text: String,
    action: CommandAction,
    arg_rule: ArgRule,
    arg_help: Vec<(String, String)>,
    category: String,
    strip_input: bool,
}

impl Command {
    /// Create a command whose callback takes no argument.
    pub fn niladic(
        key: char,
        help_text: impl Into<String>,
        callback: impl FnMut() -> Result<(), CommandError> + 'static,
    ) -> Self {
        Self {
            key,
            help_text: help_text.into(),
            action: CommandAction::Niladic(Box::new(callback)),
            arg_rule: ArgRule::None,
            arg_help: Vec::new(),
            category: String::new(),
            strip_input: true,
        }
    }

    /// Create a command whose callback takes the trailing argument text.
    ///
    /// The argument is optional by default; chain [`Command::required`] to
    /// reject invocations without one.
    pub fn monadic(
        key: char,
        help_text: impl Into<String>,
        callback: impl FnMut(&str) -> Result<(), CommandError> + 'static,
    ) -> Self {
        Self {
            key,
            help_text: help_text.into(),
            action: CommandAction::Monadic(Box::new(callback)),
            arg_rule: ArgRule::Optional,
            arg_help: Vec::new(),
            category: String::new(),
            strip_input: true,
        }
    }

    pub(crate) fn builtin(
        key: char,
        help_text: impl Into<String>,
        builtin: Builtin,
    ) -> Self {
        Self {
            key,
            help_text: help_text.into(),
            action: CommandAction::Builtin(builtin),
            arg_rule: ArgRule::Optional,
            arg_help: Vec::new(),
            category: String::new(),
            strip_input: true,
        }
    }

    /// Demand an argument. Only meaningful for monadic commands.
    pub fn required(mut self) -> Self {
        debug_assert!(
            !matches!(self.action, CommandAction::Niladic(_)),
            "a niladic command cannot require an argument"
        );
        if !matches!(self.action, CommandAction::Niladic(_)) {
            self.arg_rule = ArgRule::Required;
        }
        self
    }

    /// Add a help row describing one argument form.
    pub fn arg_help(mut self, form: impl Into<String>, description: impl Into<String>) -> Self {
        self.arg_help.push((form.into(), description.into()));
        self
    }

    /// Set the category shown in help listings.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Pass the argument text through untrimmed.
    pub fn keep_raw_input(mut self) -> Self {
        self.strip_input = false;
        self
    }

    /// The single-character key this command is dispatched under.
    pub fn key(&self) -> char {
        self.key
    }

    /// Short description shown by the help built-in.
    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    /// The command's argument policy.
    pub fn arg_rule(&self) -> ArgRule {
        self.arg_rule
    }

    /// Help rows for the command's argument forms.
    pub fn arg_help_rows(&self) -> &[(String, String)] {
        &self.arg_help
    }

    /// The category this command is grouped under.
    pub fn category_name(&self) -> &str {
        &self.category
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("key", &self.key)
            .field("arg_rule", &self.arg_rule)
            .field("strip_input", &self.strip_input)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Dispatch Result
// ============================================================================

/// What happened when a line was dispatched.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Empty or whitespace-only input; nothing ran.
    Skipped,
    /// The callback ran successfully.
    Done,
    /// A builtin should be executed by the engine, with its argument.
    RunBuiltin(Builtin, String),
    /// Validation failed; the callback was not invoked.
    Rejected(UserError),
    /// The callback ran and returned an error.
    Failed { key: char, source: CommandError },
}

/// Result of dispatching one submitted line.
#[derive(Debug)]
pub struct Dispatch {
    /// Text the input field should hold afterwards.
    pub new_text: String,
    /// What happened.
    pub outcome: DispatchOutcome,
    /// Whether the submitted line should be recorded to history.
    pub record: bool,
}

impl Dispatch {
    fn unchanged(text: &str, outcome: DispatchOutcome) -> Self {
        Self {
            new_text: text.to_string(),
            outcome,
            record: false,
        }
    }
}

// ============================================================================
// Command Registry
// ============================================================================

/// Commands stored by unique single-character key.
///
/// Re-registering a key replaces the previous command; last write wins.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<char, Command>,
}

impl CommandRegistry {
    /// Insert a command, replacing any previous one under the same key.
    pub fn add(&mut self, command: Command) {
        self.commands.insert(command.key, command);
    }

    /// Look up a command by key.
    pub fn get(&self, key: char) -> Option<&Command> {
        self.commands.get(&key)
    }

    /// All registered keys, sorted.
    pub fn sorted_keys(&self) -> Vec<char> {
        let mut keys: Vec<char> = self.commands.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Suggestions for completing a command key fragment.
    ///
    /// Keys are sorted; commands that accept an argument get a trailing
    /// space so the user can keep typing.
    pub fn key_suggestions(&self, fragment: &str) -> Vec<String> {
        let mut entries: Vec<(&char, &Command)> = self.commands.iter().collect();
        entries.sort_unstable_by_key(|(key, _)| **key);
        entries
            .into_iter()
            .filter(|(key, _)| key.to_string().starts_with(fragment))
            .map(|(key, cmd)| {
                if cmd.arg_rule == ArgRule::None {
                    key.to_string()
                } else {
                    format!("{key} ")
                }
            })
            .collect()
    }

    /// Validate and run one submitted line.
    ///
    /// The first character is the command key, the rest is the argument
    /// (trimmed unless the command keeps raw input). Exactly one callback
    /// invocation happens per successful dispatch, and none on a validation
    /// failure. `record` is true only for a successful, non-quiet dispatch.
    pub fn dispatch(&mut self, raw_text: &str, quiet: bool) -> Dispatch {
        if raw_text.trim().is_empty() {
            return Dispatch::unchanged(raw_text, DispatchOutcome::Skipped);
        }
        let mut chars = raw_text.chars();
        let Some(key) = chars.next() else {
            return Dispatch::unchanged(raw_text, DispatchOutcome::Skipped);
        };
        let raw_arg = chars.as_str();

        let Some(command) = self.commands.get_mut(&key) else {
            return Dispatch::unchanged(
                raw_text,
                DispatchOutcome::Rejected(UserError::UnknownCommand(key)),
            );
        };
        let arg = if command.strip_input {
            raw_arg.trim()
        } else {
            raw_arg
        };
        if !arg.is_empty() && command.arg_rule == ArgRule::None {
            return Dispatch::unchanged(
                raw_text,
                DispatchOutcome::Rejected(UserError::UnexpectedArgument),
            );
        }
        if arg.is_empty() && command.arg_rule == ArgRule::Required {
            return Dispatch::unchanged(
                raw_text,
                DispatchOutcome::Rejected(UserError::MissingArgument),
            );
        }

        let result = match &mut command.action {
            CommandAction::Niladic(callback) => callback(),
            CommandAction::Monadic(callback) => callback(arg),
            CommandAction::Builtin(builtin) => {
                return Dispatch {
                    new_text: String::new(),
                    outcome: DispatchOutcome::RunBuiltin(*builtin, arg.to_string()),
                    record: !quiet,
                };
            }
        };
        match result {
            Ok(()) => Dispatch {
                new_text: String::new(),
                outcome: DispatchOutcome::Done,
                record: !quiet,
            },
            Err(source) => {
                Dispatch::unchanged(raw_text, DispatchOutcome::Failed { key, source })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
