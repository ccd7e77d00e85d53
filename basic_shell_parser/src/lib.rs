//! basic_shell_parser
//!
//! Line-oriented parser for the BasicShell statement language.
//!
//! Each input line is parsed independently into a single [`Statement`]
//! event, which the session feeds to the compiler core one at a time.
//! Control-flow openers and closers (`If`/`EndIf`, `For`/`Next`,
//! `Sub`/`End Sub`) are therefore separate statements here, not nested
//! syntax trees.
//!
//! # Example
//!
//! ```
//! use basic_shell_parser::{parse_line, Statement};
//!
//! let stmt = parse_line("Dim x As Integer").expect("parse failed");
//! assert!(matches!(stmt, Statement::Dim { .. }));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

// Re-exports
pub use ast::{BinOp, Expr, Literal, Param, Statement, TypeName, VarDecl};
pub use error::{ParseError, ParseResult};
pub use lexer::{Lexer, SpannedToken};
pub use parser::Parser;
pub use span::{SourceMap, Span};
pub use token::Token;

/// Parse one source line into a statement event
///
/// Blank lines and comment-only lines yield [`Statement::Empty`].
///
/// # Example
///
/// ```
/// use basic_shell_parser::{parse_line, Statement};
///
/// let stmt = parse_line("If x > 3 Then").unwrap();
/// assert!(matches!(stmt, Statement::If { .. }));
/// ```
pub fn parse_line(source: &str) -> ParseResult<Statement> {
    Parser::new(source).parse_statement()
}

/// Tokenize a source line
///
/// Returns a vector of tokens with their spans.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken<'_>, ParseError>> {
    lexer::tokenize(source)
}

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
