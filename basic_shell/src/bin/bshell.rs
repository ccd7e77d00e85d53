#![deny(clippy::expect_used)]
//! BasicShell Command-Line Interface
//!
//! Usage:
//!   bshell                          # Start the interactive shell
//!   bshell file.bas                 # Evaluate a BASIC script
//!   bshell -h                       # Show help

use std::env;
use std::fs;
use std::path::Path;

use basic_shell::repl::Session;
use basic_shell::ShellConfig;
use basic_shell::ShellError;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

#[path = "bshell/runners.rs"]
mod runners;

use runners::{run_repl, run_script};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Comment line prepended to every emitted module.
const SESSION_HEADER: &str = "; BasicShell session";

// ANSI color codes for diagnostics
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const ERROR: &str = "\x1b[31m"; // red
    pub const WARNING: &str = "\x1b[33m"; // yellow
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let config = ShellConfig::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if args.len() == 1 {
        // No arguments - start the interactive shell
        run_repl(&config);
    } else if args[1] == "-h" || args[1] == "--help" {
        print_usage();
    } else {
        // File path provided - evaluate the script
        run_script(&args[1], &config);
    }
}

fn print_usage() {
    println!(
        r#"BasicShell - Interactive BASIC Compiler Shell

USAGE:
    bshell                 Start the interactive shell
    bshell <file.bas>      Evaluate a BASIC script line by line

OPTIONS:
    -h, --help             Show this help message

An optional bshell.toml in the working directory sets the module name,
the session output file, the history file and the exit echo.

EXAMPLES:
    bshell
    bshell program.bas
"#
    );
}

/// A line terminates the session when its first word is `quit` or
/// `exit`, in any letter case.
fn is_termination(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("quit") || word.eq_ignore_ascii_case("exit"))
}

/// Prints the finished module behind the session header and persists the
/// same text to the configured session file.
fn emit_module(session: &Session, config: &ShellConfig) {
    let text = format!("{}\n{}", SESSION_HEADER, session.serialize());
    if config.echo_module_on_exit {
        print!("{}", text);
    }
    if let Err(e) = fs::write(&config.session_file, &text) {
        eprintln!("Error writing {}: {}", config.session_file.display(), e);
        std::process::exit(1);
    }
}
