//! Error types for the engine.
//!
//! Two kinds of failure exist at the engine boundary:
//!
//! - [`UserError`] - validation failures caused by what the user typed.
//!   Reported through the host's error sink, never fatal, never recorded
//!   to history.
//! - [`PatternError`] - an invalid regex in an autocompletion pattern
//!   definition. Rejected when the pattern is constructed, so suggestion
//!   generation itself cannot fail.
//!
//! Command and confirmation callbacks are fallible and return
//! [`CommandError`]; the dispatcher catches those at its boundary and
//! surfaces them without touching engine state.

use thiserror::Error;

/// Boxed error returned by command and confirmation callbacks.
pub type CommandError = Box<dyn std::error::Error + Send + Sync>;

/// Validation failure for a submitted command line.
///
/// The display strings are user-facing and shown verbatim in the host's
/// output or error field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UserError {
    /// First character of the input is not a registered command key.
    #[error("Invalid command: {0}")]
    UnknownCommand(char),
    /// Trailing text given to a command that takes no arguments.
    #[error("This command doesn't take any arguments")]
    UnexpectedArgument,
    /// No trailing text given to a command that requires it.
    #[error("This command requires an argument")]
    MissingArgument,
}

/// Invalid regex in an autocompletion pattern definition.
#[derive(Debug, Error)]
#[error("invalid {kind} regex for autocompletion pattern '{name}': {source}")]
pub struct PatternError {
    /// Name of the pattern being constructed.
    pub name: String,
    /// Which of the three regexes was rejected: "prefix", "start" or "end".
    pub kind: &'static str,
    #[source]
    pub source: regex::Error,
}
