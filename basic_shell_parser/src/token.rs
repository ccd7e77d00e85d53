//! Token definitions for the BASIC lexer
//!
//! Keywords are matched case-insensitively (`Dim`, `DIM` and `dim` are the
//! same token). Statements are line-oriented, so the newline is a real
//! token rather than skipped whitespace.

use logos::Logos;

/// BASIC tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\f]+")] // Skip whitespace (but not newlines)
#[logos(skip r"'[^\n]*")] // Line comment: apostrophe to end of line
pub enum Token {
    // ==================== Keywords ====================
    #[token("Dim", ignore(ascii_case))]
    KwDim,
    #[token("As", ignore(ascii_case))]
    KwAs,
    #[token("If", ignore(ascii_case))]
    KwIf,
    #[token("Then", ignore(ascii_case))]
    KwThen,
    #[token("ElseIf", ignore(ascii_case))]
    KwElseIf,
    #[token("Else", ignore(ascii_case))]
    KwElse,
    #[token("EndIf", ignore(ascii_case))]
    KwEndIf,
    #[token("End", ignore(ascii_case))]
    KwEnd,
    #[token("For", ignore(ascii_case))]
    KwFor,
    #[token("To", ignore(ascii_case))]
    KwTo,
    #[token("Step", ignore(ascii_case))]
    KwStep,
    #[token("Next", ignore(ascii_case))]
    KwNext,
    #[token("Sub", ignore(ascii_case))]
    KwSub,
    #[token("Function", ignore(ascii_case))]
    KwFunction,
    #[token("Call", ignore(ascii_case))]
    KwCall,

    // ==================== Type Keywords ====================
    #[token("Byte", ignore(ascii_case))]
    KwByte,
    #[token("Boolean", ignore(ascii_case))]
    KwBoolean,
    #[token("Integer", ignore(ascii_case))]
    KwInteger,
    #[token("Long", ignore(ascii_case))]
    KwLong,
    #[token("Single", ignore(ascii_case))]
    KwSingle,
    #[token("Double", ignore(ascii_case))]
    KwDouble,
    #[token("String", ignore(ascii_case))]
    KwString,

    // ==================== Boolean Literals ====================
    #[token("True", ignore(ascii_case))]
    True,
    #[token("False", ignore(ascii_case))]
    False,

    // ==================== Delimiters ====================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,

    // ==================== Operators ====================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<>")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    // ==================== Newline ====================
    #[regex(r"\r?\n")]
    Newline,

    // ==================== Literals ====================
    #[regex(r"[0-9]+")]
    IntLiteral,

    // Float forms: decimal point, exponent, or the Single suffix `!`
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?!?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+!?")]
    #[regex(r"[0-9]+!")]
    FloatLiteral,

    // Opening quote; the lexer wrapper scans the full literal
    #[token("\"")]
    DoubleQuote,

    /// Produced by the lexer wrapper for a complete string literal,
    /// never by the logos table itself.
    StringLiteral,

    // ==================== Identifiers ====================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
}

impl Token {
    /// Check if this token is a statement or clause keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::KwDim
                | Token::KwAs
                | Token::KwIf
                | Token::KwThen
                | Token::KwElseIf
                | Token::KwElse
                | Token::KwEndIf
                | Token::KwEnd
                | Token::KwFor
                | Token::KwTo
                | Token::KwStep
                | Token::KwNext
                | Token::KwSub
                | Token::KwFunction
                | Token::KwCall
        )
    }

    /// Check if this token names one of the value types
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            Token::KwByte
                | Token::KwBoolean
                | Token::KwInteger
                | Token::KwLong
                | Token::KwSingle
                | Token::KwDouble
                | Token::KwString
        )
    }

    /// Human-readable name used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Token::KwDim => "Dim",
            Token::KwAs => "As",
            Token::KwIf => "If",
            Token::KwThen => "Then",
            Token::KwElseIf => "ElseIf",
            Token::KwElse => "Else",
            Token::KwEndIf => "EndIf",
            Token::KwEnd => "End",
            Token::KwFor => "For",
            Token::KwTo => "To",
            Token::KwStep => "Step",
            Token::KwNext => "Next",
            Token::KwSub => "Sub",
            Token::KwFunction => "Function",
            Token::KwCall => "Call",
            Token::KwByte => "Byte",
            Token::KwBoolean => "Boolean",
            Token::KwInteger => "Integer",
            Token::KwLong => "Long",
            Token::KwSingle => "Single",
            Token::KwDouble => "Double",
            Token::KwString => "String",
            Token::True => "True",
            Token::False => "False",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::Comma => "','",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::Caret => "'^'",
            Token::Eq => "'='",
            Token::Lt => "'<'",
            Token::Gt => "'>'",
            Token::NotEq => "'<>'",
            Token::LtEq => "'<='",
            Token::GtEq => "'>='",
            Token::Newline => "end of line",
            Token::IntLiteral => "integer literal",
            Token::FloatLiteral => "float literal",
            Token::DoubleQuote | Token::StringLiteral => "string literal",
            Token::Identifier => "identifier",
        }
    }
}
