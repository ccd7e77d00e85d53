//! Lexer for BASIC source lines
//!
//! Wraps the logos-generated lexer with string literal scanning, since a
//! quoted literal must be consumed as one token without tokenizing its
//! contents.

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::Token;

/// A token with its span
#[derive(Debug, Clone)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpannedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self { token, span, text }
    }
}

/// BASIC lexer
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    /// Peeked token (for lookahead)
    peeked: Option<Result<SpannedToken<'a>, ParseError>>,
    /// Offset from original source (used after restarting the lexer)
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            peeked: None,
            offset: 0,
        }
    }

    /// Get the source text
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> Option<&Result<SpannedToken<'a>, ParseError>> {
        if self.peeked.is_none() {
            self.peeked = self.next_token_internal();
        }
        self.peeked.as_ref()
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<Result<SpannedToken<'a>, ParseError>> {
        if let Some(peeked) = self.peeked.take() {
            return Some(peeked);
        }
        self.next_token_internal()
    }

    fn next_token_internal(&mut self) -> Option<Result<SpannedToken<'a>, ParseError>> {
        let result = self.inner.next()?;
        let span = self.inner.span();
        let start = self.offset + span.start;
        let end = self.offset + span.end;

        match result {
            Ok(Token::DoubleQuote) => {
                // Consume the string body here; the contents must not reach
                // the token table.
                match self.scan_string_to_close(end) {
                    Ok(close) => {
                        self.restart_from(close);
                        let span = Span::new(start, close);
                        let text = &self.source[start..close];
                        Some(Ok(SpannedToken::new(Token::StringLiteral, span, text)))
                    }
                    Err(e) => {
                        self.restart_from(self.source.len());
                        Some(Err(e))
                    }
                }
            }

            Ok(token) => {
                let span = Span::new(start, end);
                let text = &self.source[start..end];
                Some(Ok(SpannedToken::new(token, span, text)))
            }

            Err(()) => Some(Err(ParseError::LexerError {
                span: Span::new(start, end),
            })),
        }
    }

    /// Scan string content to find the closing quote.
    /// Uses memchr to jump between escape and quote candidates.
    fn scan_string_to_close(&self, start: usize) -> ParseResult<usize> {
        let bytes = self.source.as_bytes();
        let mut pos = start;

        while pos < bytes.len() {
            match memchr::memchr3(b'\\', b'"', b'\n', &bytes[pos..]) {
                None => break,
                Some(offset) => {
                    pos += offset;
                    match bytes[pos] {
                        b'\\' if pos + 1 < bytes.len() => {
                            pos += 2;
                        }
                        b'"' => return Ok(pos + 1),
                        // A string never continues past the line
                        _ => break,
                    }
                }
            }
        }

        Err(ParseError::UnterminatedString {
            span: Span::new(start - 1, pos),
        })
    }

    /// Restart the lexer from a new position
    fn restart_from(&mut self, pos: usize) {
        self.peeked = None;
        if pos < self.source.len() {
            self.inner = Token::lexer(&self.source[pos..]);
        } else {
            self.inner = Token::lexer("");
        }
        self.offset = pos;
    }

    /// Check if we're at end of input
    pub fn is_eof(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Collect all tokens (for debugging)
    pub fn collect_all(mut self) -> Vec<Result<SpannedToken<'a>, ParseError>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<SpannedToken<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize a source line into a vector of spanned tokens
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken<'_>, ParseError>> {
    Lexer::new(source).collect_all()
}
