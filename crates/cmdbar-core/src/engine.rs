//! The engine itself: orchestrates dispatch, completion, history, and
//! confirmation against host-supplied I/O accessors.
//!
//! [`CommandLine`] is the only type a host talks to directly. It never
//! renders anything; all reads and writes of the input field, cursor, and
//! output line go through the closures in [`HostIo`]. The helper logic it
//! drives lives in pure state-transition functions (see [`crate::command`]
//! and [`crate::autocomplete`]), so faults inside a command callback or a
//! suggestion provider are caught here, reported through the error sink, and
//! never escape to the caller.

use log::{debug, error};

use crate::autocomplete::{AcPattern, AcState, CycleDirection, cycle, init_state};
use crate::command::{Builtin, Command, CommandRegistry, DispatchOutcome};
use crate::confirm::PendingConfirmation;
use crate::error::CommandError;
use crate::history::History;

// ============================================================================
// Host Accessors
// ============================================================================

/// The accessor functions a host must supply.
///
/// Five are mandatory; the error sink is optional and defaults to
/// `set_output`. Cursor positions are byte offsets into the UTF-8 input
/// text.
pub struct HostIo {
    get_input: Box<dyn Fn() -> String>,
    set_input: Box<dyn Fn(&str)>,
    get_cursor_pos: Box<dyn Fn() -> usize>,
    set_cursor_pos: Box<dyn Fn(usize)>,
    set_output: Box<dyn Fn(&str)>,
    show_error: Option<Box<dyn Fn(&str)>>,
}

impl HostIo {
    /// Bundle the five mandatory accessors.
    pub fn new(
        get_input: impl Fn() -> String + 'static,
        set_input: impl Fn(&str) + 'static,
        get_cursor_pos: impl Fn() -> usize + 'static,
        set_cursor_pos: impl Fn(usize) + 'static,
        set_output: impl Fn(&str) + 'static,
    ) -> Self {
        Self {
            get_input: Box::new(get_input),
            set_input: Box::new(set_input),
            get_cursor_pos: Box::new(get_cursor_pos),
            set_cursor_pos: Box::new(set_cursor_pos),
            set_output: Box::new(set_output),
            show_error: None,
        }
    }

    /// Route error messages to a dedicated sink instead of `set_output`.
    pub fn error_sink(mut self, show_error: impl Fn(&str) + 'static) -> Self {
        self.show_error = Some(Box::new(show_error));
        self
    }

    fn error(&self, text: &str) {
        match &self.show_error {
            Some(sink) => sink(text),
            None => (self.set_output)(text),
        }
    }
}

impl std::fmt::Debug for HostIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostIo")
            .field("show_error", &self.show_error.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Command Line Engine
// ============================================================================

/// Host-agnostic command-line interaction engine.
///
/// Construct with [`CommandLine::new`], register commands and patterns, then
/// drive it from the host's key events: submit calls [`run_command`], the
/// cycle keys call [`next_autocompletion`] / [`previous_autocompletion`],
/// up/down call [`older_history`] / [`newer_history`], and every other
/// keystroke calls [`stop_autocompleting`] and [`reset_history_travel`].
///
/// [`run_command`]: CommandLine::run_command
/// [`next_autocompletion`]: CommandLine::next_autocompletion
/// [`previous_autocompletion`]: CommandLine::previous_autocompletion
/// [`older_history`]: CommandLine::older_history
/// [`newer_history`]: CommandLine::newer_history
/// [`stop_autocompleting`]: CommandLine::stop_autocompleting
/// [`reset_history_travel`]: CommandLine::reset_history_travel
pub struct CommandLine {
    io: HostIo,
    registry: CommandRegistry,
    patterns: Vec<AcPattern>,
    history: History,
    ac_state: AcState,
    pending: Option<PendingConfirmation>,
}

impl CommandLine {
    /// Create an engine with the help built-in registered under `?`.
    pub fn new(io: HostIo) -> Self {
        Self::with_help_key(io, '?')
    }

    /// Create an engine with the help built-in under a custom key.
    pub fn with_help_key(io: HostIo, help_key: char) -> Self {
        let mut registry = CommandRegistry::default();
        registry.add(
            Command::builtin(help_key, "Show help about a command", Builtin::Help)
                .arg_help("", "List all commands.")
                .arg_help("X", "Show help for command X."),
        );
        let help_prefix = format!(r"{}\s+", regex::escape(&help_key.to_string()));
        let patterns = vec![
            AcPattern::command_keys("command")
                .end(r"( |$)")
                .expect("built-in pattern regex")
                .illegal_chars(" \t"),
            AcPattern::command_keys("help")
                .prefix(&help_prefix)
                .expect("built-in pattern regex")
                .illegal_chars(" \t"),
        ];
        Self {
            io,
            registry,
            patterns,
            history: History::new(),
            ac_state: AcState::default(),
            pending: None,
        }
    }

    /// Persist history to an append-only log file, loading prior entries.
    pub fn history_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.history = History::with_log_file(path);
        self
    }

    /// Register a command. Re-registering a key replaces the old command.
    pub fn add_command(&mut self, command: Command) {
        self.registry.add(command);
    }

    /// Append an autocompletion pattern to the priority list.
    pub fn add_autocompletion_pattern(&mut self, pattern: AcPattern) {
        self.patterns.push(pattern);
    }

    /// Write a message to the host's output line.
    pub fn print(&self, text: &str) {
        (self.io.set_output)(text);
    }

    /// Write a message to the host's error sink.
    pub fn error(&self, text: &str) {
        self.io.error(text);
    }

    // ------------------------------------------------------------------
    // Command dispatch
    // ------------------------------------------------------------------

    /// Dispatch a command line.
    ///
    /// `text` defaults to the host's current input. While a confirmation is
    /// pending the text is interpreted solely as yes/no and nothing is
    /// dispatched or recorded. In quiet mode the output line is not cleared
    /// and the line is not recorded to history; hosts use it for
    /// programmatic invocation.
    pub fn run_command(&mut self, text: Option<&str>, quiet: bool) {
        let text = match text {
            Some(text) => text.to_string(),
            None => (self.io.get_input)(),
        };
        if !quiet {
            (self.io.set_output)("");
        }

        if let Some(pending) = self.pending.take() {
            (self.io.set_input)("");
            let set_output = &self.io.set_output;
            let result = pending.resolve(text == "y", |msg| set_output(msg));
            if let Err(err) = result {
                error!("confirmation action failed: {err}");
                self.error(&format!("Confirmation action failed: {err}"));
            }
            return;
        }

        let dispatch = self.registry.dispatch(&text, quiet);
        (self.io.set_input)(&dispatch.new_text);
        match dispatch.outcome {
            DispatchOutcome::Skipped | DispatchOutcome::Done => {}
            DispatchOutcome::RunBuiltin(Builtin::Help, arg) => self.run_help(&arg),
            DispatchOutcome::Rejected(err) => {
                debug!("rejected input {text:?}: {err}");
                self.error(&err.to_string());
            }
            DispatchOutcome::Failed { key, source } => {
                error!("command '{key}' failed: {source}");
                self.error(&format!("Command '{key}' failed: {source}"));
            }
        }
        if dispatch.record {
            self.history.record(&text);
        }
    }

    /// Ask for confirmation before running a destructive action.
    ///
    /// Clears the input, prompts the user, and stores the action; the next
    /// submitted line resolves it, `y` meaning yes and anything else no. A
    /// second request before resolution overwrites the first.
    pub fn confirm_command(
        &mut self,
        prompt: &str,
        callback: impl FnMut(&str) -> Result<(), CommandError> + 'static,
        arg: impl Into<String>,
    ) {
        self.print(&format!("{prompt} Type y to confirm."));
        (self.io.set_input)("");
        self.pending = Some(PendingConfirmation::new(callback, arg));
    }

    fn run_help(&self, arg: &str) {
        if arg.is_empty() {
            let keys: Vec<String> = self
                .registry
                .sorted_keys()
                .into_iter()
                .map(|key| key.to_string())
                .collect();
            self.print(&keys.join(" "));
            return;
        }
        let mut chars = arg.chars();
        let (Some(key), None) = (chars.next(), chars.next()) else {
            self.error("No such command");
            return;
        };
        match self.registry.get(key) {
            Some(command) => {
                let mut lines = Vec::new();
                if command.help_text().trim().is_empty() {
                    lines.push(format!("No help text for \"{key}\""));
                } else {
                    lines.push(command.help_text().to_string());
                }
                for (form, description) in command.arg_help_rows() {
                    lines.push(format!("  {key}{form} - {description}"));
                }
                self.print(&lines.join("\n"));
            }
            None => self.error("No such command"),
        }
    }

    // ------------------------------------------------------------------
    // Autocompletion
    // ------------------------------------------------------------------

    /// Cycle forward through suggestions, starting a session if needed.
    pub fn next_autocompletion(&mut self) {
        self.change_autocompletion(CycleDirection::Forward);
    }

    /// Cycle backward through suggestions, starting a session if needed.
    pub fn previous_autocompletion(&mut self) {
        self.change_autocompletion(CycleDirection::Backward);
    }

    /// End the completion session. Hosts call this for every keystroke that
    /// is not a cycle key, and when a command is submitted.
    pub fn stop_autocompleting(&mut self) {
        self.ac_state.clear();
    }

    fn change_autocompletion(&mut self, direction: CycleDirection) {
        let input = (self.io.get_input)();
        let cursor = (self.io.get_cursor_pos)();
        let mut state = std::mem::take(&mut self.ac_state);
        if !state.is_active() {
            state = init_state(&self.patterns, &self.registry, &input, cursor);
        }
        let (new_text, new_cursor, new_state) = cycle(state, &input, cursor, direction);
        (self.io.set_input)(&new_text);
        (self.io.set_cursor_pos)(new_cursor);
        self.ac_state = new_state;
    }

    // ------------------------------------------------------------------
    // History traversal
    // ------------------------------------------------------------------

    /// Show the previous (older) history entry in the input field.
    pub fn older_history(&mut self) {
        self.travel_history(true);
    }

    /// Show the next (newer) history entry in the input field.
    pub fn newer_history(&mut self) {
        self.travel_history(false);
    }

    fn travel_history(&mut self, back: bool) {
        if self.history.is_empty() {
            return;
        }
        // Browsing history and completing are mutually exclusive.
        self.ac_state.clear();
        let entry = if back {
            self.history.older()
        } else {
            self.history.newer()
        };
        if let Some(text) = entry {
            (self.io.set_input)(text);
        }
    }

    /// Re-anchor the history scratch slot to the current input. Hosts call
    /// this for every keystroke that is not a history-traversal key.
    pub fn reset_history_travel(&mut self) {
        let current = (self.io.get_input)();
        self.history.reset_travel(&current);
    }
}

impl std::fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLine")
            .field("history_len", &self.history.len())
            .field("completing", &self.ac_state.is_active())
            .field("confirmation_pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}
