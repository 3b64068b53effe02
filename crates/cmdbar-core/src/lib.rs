//! Embeddable command-line interaction engine.
//!
//! A host-agnostic state machine that turns raw text-field input into
//! command dispatch, offers regex-driven contextual autocompletion with
//! cycling, maintains input history, and runs a two-step confirmation
//! protocol for destructive actions. It is driven by any text-input surface
//! (a terminal widget, an editor's command bar, a REPL) through a small set
//! of injected accessor functions and never touches rendering, windowing,
//! or storage directly.
//!
//! This crate provides:
//! - [`CommandLine`] - the engine; the only type a host talks to directly
//! - [`HostIo`] - the accessor closures wiring the engine to a text field
//! - [`Command`] and [`CommandRegistry`] - single-key commands with argument
//!   arity validation
//! - [`AcPattern`] - regex-driven contextual autocompletion patterns
//! - [`History`] - input history with a live scratch slot and optional
//!   durable log file
//! - [`file_path_suggestions`] - a bundled filesystem path completer
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use cmdbar_core::{Command, CommandLine, HostIo};
//!
//! #[derive(Default)]
//! struct Field {
//!     input: String,
//!     cursor: usize,
//!     output: String,
//! }
//!
//! let field = Rc::new(RefCell::new(Field::default()));
//! let io = {
//!     let (f1, f2, f3, f4, f5) = (
//!         Rc::clone(&field),
//!         Rc::clone(&field),
//!         Rc::clone(&field),
//!         Rc::clone(&field),
//!         Rc::clone(&field),
//!     );
//!     HostIo::new(
//!         move || f1.borrow().input.clone(),
//!         move |text| f2.borrow_mut().input = text.to_string(),
//!         move || f3.borrow().cursor,
//!         move |pos| f4.borrow_mut().cursor = pos,
//!         move |text| f5.borrow_mut().output = text.to_string(),
//!     )
//! };
//!
//! let mut engine = CommandLine::new(io);
//! let greeted = Rc::new(RefCell::new(false));
//! let flag = Rc::clone(&greeted);
//! engine.add_command(Command::niladic('g', "Say hello", move || {
//!     *flag.borrow_mut() = true;
//!     Ok(())
//! }));
//!
//! field.borrow_mut().input = "g".to_string();
//! engine.run_command(None, false);
//! assert!(*greeted.borrow());
//! assert_eq!(field.borrow().input, "");
//! ```

mod autocomplete;
mod command;
mod confirm;
mod engine;
mod error;
mod history;
mod paths;

pub use autocomplete::{
    AcPattern, AcState, CycleDirection, SuggestionSource, cycle, generate_suggestions, init_state,
};
pub use command::{
    ArgRule, Builtin, Command, CommandAction, CommandRegistry, Dispatch, DispatchOutcome,
};
pub use confirm::PendingConfirmation;
pub use engine::{CommandLine, HostIo};
pub use error::{CommandError, PatternError, UserError};
pub use history::History;
pub use paths::{file_path_pattern, file_path_suggestions};
