//! Minimal line-based host for the engine.
//!
//! Demonstrates how a text-input surface drives [`CommandLine`]: the
//! "field" here is a plain struct behind `Rc<RefCell<..>>`, the accessors
//! are closures over it, and every submitted stdin line goes through
//! `run_command`. Commands that want a confirmation set a request flag and
//! the host calls `confirm_command` after dispatch returns.

use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use log::debug;

use cmdbar_core::{Command, CommandLine, HostIo, file_path_pattern};

/// Interactive demo for the cmdbar engine.
#[derive(Debug, Parser)]
#[command(name = "cmdbar", version, about)]
struct Cli {
    /// Append submitted lines to this history log and load it on start.
    #[arg(long)]
    history_file: Option<PathBuf>,
}

/// The fake text field the engine reads and writes through its accessors.
#[derive(Default)]
struct Field {
    input: String,
    cursor: usize,
    output: String,
}

fn build_engine(field: &Rc<RefCell<Field>>, history_file: Option<PathBuf>) -> CommandLine {
    let (f1, f2, f3, f4, f5) = (
        Rc::clone(field),
        Rc::clone(field),
        Rc::clone(field),
        Rc::clone(field),
        Rc::clone(field),
    );
    let io = HostIo::new(
        move || f1.borrow().input.clone(),
        move |text| f2.borrow_mut().input = text.to_string(),
        move || f3.borrow().cursor,
        move |pos| f4.borrow_mut().cursor = pos,
        move |text| f5.borrow_mut().output = text.to_string(),
    )
    .error_sink(|text| eprintln!("error: {text}"));

    match history_file {
        Some(path) => CommandLine::new(io).history_file(path),
        None => CommandLine::new(io),
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let field = Rc::new(RefCell::new(Field::default()));
    let mut engine = build_engine(&field, cli.history_file);

    let running = Rc::new(Cell::new(true));
    let delete_request: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));

    {
        let out = Rc::clone(&field);
        engine.add_command(
            Command::monadic('e', "Echo the argument back", move |arg: &str| {
                out.borrow_mut().output = arg.to_string();
                Ok(())
            })
            .category("demo"),
        );
    }
    {
        let quit = Rc::clone(&running);
        engine.add_command(
            Command::niladic('q', "Quit", move || {
                quit.set(false);
                Ok(())
            })
            .category("demo"),
        );
    }
    {
        let out = Rc::clone(&field);
        engine.add_command(
            Command::monadic('o', "Open a file (demo)", move |arg: &str| {
                out.borrow_mut().output = format!("Opening {arg}");
                Ok(())
            })
            .required()
            .arg_help("PATH", "Path of the file to open.")
            .category("demo"),
        );
    }
    {
        // Destructive commands only queue a request; the host asks for
        // confirmation once dispatch has returned.
        let request = Rc::clone(&delete_request);
        engine.add_command(
            Command::monadic('d', "Delete a file (demo, asks first)", move |arg: &str| {
                *request.borrow_mut() = Some(arg.to_string());
                Ok(())
            })
            .required()
            .category("demo"),
        );
    }
    engine.add_autocompletion_pattern(
        file_path_pattern("open-path", r"[od]\s*").expect("valid demo pattern"),
    );

    let stdin = io::stdin();
    while running.get() {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        debug!("submitting {line:?}");

        // A line ending in a tab cycles completion instead of submitting,
        // since a canonical-mode terminal has no live tab key.
        if let Some(stripped) = line.strip_suffix('\t') {
            {
                let mut state = field.borrow_mut();
                state.input = stripped.to_string();
                state.cursor = state.input.len();
            }
            engine.next_autocompletion();
            println!("{}", field.borrow().input);
            continue;
        }

        {
            let mut field = field.borrow_mut();
            field.input = line.to_string();
            field.cursor = field.input.len();
        }
        engine.reset_history_travel();
        engine.stop_autocompleting();
        engine.run_command(None, false);

        let output = field.borrow().output.clone();
        if !output.is_empty() {
            println!("{output}");
        }

        if let Some(target) = delete_request.borrow_mut().take() {
            let done = Rc::clone(&field);
            engine.confirm_command(
                &format!("Really delete {target}?"),
                move |arg: &str| {
                    done.borrow_mut().output = format!("(demo) would delete {arg}");
                    Ok(())
                },
                target,
            );
            let prompt = field.borrow().output.clone();
            println!("{prompt}");
        }
    }
    Ok(())
}
