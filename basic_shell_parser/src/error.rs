//! Parse error types

use crate::span::{SourceMap, Span};
use thiserror::Error;

/// Parse error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    /// Statement ended before it was complete
    #[error("unexpected end of line, expected {expected}")]
    UnexpectedEol { expected: String, span: Span },

    /// Invalid escape sequence inside a string literal
    #[error("invalid escape sequence '{sequence}'")]
    InvalidEscape { sequence: String, span: Span },

    /// Unterminated string
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    /// Number literal out of range or malformed
    #[error("invalid number literal '{literal}'")]
    InvalidNumber { literal: String, span: Span },

    /// Complete statement followed by more tokens
    #[error("unexpected {found} after a complete statement")]
    TrailingInput { found: String, span: Span },

    /// Invalid syntax
    #[error("{message}")]
    InvalidSyntax { message: String, span: Span },

    /// Unrecognized character
    #[error("unrecognized token")]
    LexerError { span: Span },
}

impl ParseError {
    /// Get the span of the error
    pub fn span(&self) -> &Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => span,
            ParseError::UnexpectedEol { span, .. } => span,
            ParseError::InvalidEscape { span, .. } => span,
            ParseError::UnterminatedString { span } => span,
            ParseError::InvalidNumber { span, .. } => span,
            ParseError::TrailingInput { span, .. } => span,
            ParseError::InvalidSyntax { span, .. } => span,
            ParseError::LexerError { span } => span,
        }
    }

    /// Create an unexpected token error
    pub fn unexpected_token(
        found: impl Into<String>,
        expected: impl Into<String>,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            found: found.into(),
            expected: expected.into(),
            span,
        }
    }

    /// Create an unexpected end-of-line error
    pub fn unexpected_eol(expected: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedEol {
            expected: expected.into(),
            span,
        }
    }

    /// Create an invalid syntax error
    pub fn invalid_syntax(message: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidSyntax {
            message: message.into(),
            span,
        }
    }

    /// Format the error with a caret marker under the offending source
    pub fn format_with_context(&self, source: &str) -> String {
        let span = self.span();
        let (line_no, col) = SourceMap::new(source).line_col(span.start);
        let line = source.lines().nth(line_no - 1).unwrap_or("");
        let col = (col - 1).min(line.len());
        let len = span.len().min(line.len().saturating_sub(col)).max(1);

        format!("  | {}\n  | {}{}", line, " ".repeat(col), "^".repeat(len))
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
