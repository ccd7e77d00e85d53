// Diagnostics are data here: library code reports through return values
// and the session warning list, never by printing. CLI binaries (bin/)
// may print.
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

// Core modules
pub mod config;
pub mod error;
pub mod ir;
pub mod types;
pub mod value;

// Lowering: statements -> backend program
pub mod lowering;

// Interactive session management
pub mod repl;

// Line parser, re-exported for callers that inspect statements
pub use basic_shell_parser as parser;

pub use config::ShellConfig;
pub use error::{
    DiagnosticWarning, FatalConstructionError, SemanticError, ShellError, ShellResult,
};
pub use lowering::Lowering;
pub use repl::Session;
pub use types::SemanticType;
pub use value::{ConstValue, Value};
