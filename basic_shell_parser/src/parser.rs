//! Recursive-descent parser for single BASIC statements
//!
//! The grammar is line-oriented: every submitted line is exactly one
//! statement event. Expressions use precedence climbing with the BASIC
//! operator tiers (comparisons lowest, then additive, multiplicative,
//! and right-associative `^`).

use crate::ast::{BinOp, Expr, Literal, Param, Statement, TypeName, VarDecl};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, SpannedToken};
use crate::span::Span;
use crate::token::Token;

/// Lowest precedence tier: `= < > <> <= >=`
const PREC_COMPARE: u8 = 1;
/// `+ -`
const PREC_ADDITIVE: u8 = 2;
/// `* /`
const PREC_MULTIPLICATIVE: u8 = 3;
/// `^`
const PREC_POWER: u8 = 4;

/// Statement parser over a single source line
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Create a parser for one submitted line
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Parse the line into a statement event
    pub fn parse_statement(mut self) -> ParseResult<Statement> {
        // Leading newlines carry no content
        while matches!(self.peek_kind()?, Some(Token::Newline)) {
            self.advance()?;
        }

        let Some(first) = self.peek_kind()? else {
            return Ok(Statement::Empty);
        };

        let stmt = match first {
            Token::KwDim => self.parse_dim()?,
            Token::KwIf => {
                self.advance()?;
                let cond = self.parse_expr()?;
                self.expect(Token::KwThen)?;
                Statement::If { cond }
            }
            Token::KwElseIf => {
                self.advance()?;
                let cond = self.parse_expr()?;
                self.expect(Token::KwThen)?;
                Statement::ElseIf { cond }
            }
            Token::KwElse => {
                self.advance()?;
                Statement::Else
            }
            Token::KwEndIf => {
                self.advance()?;
                Statement::EndIf
            }
            Token::KwEnd => self.parse_end()?,
            Token::KwFor => self.parse_for()?,
            Token::KwNext => {
                self.advance()?;
                let var = match self.peek_kind()? {
                    Some(Token::Identifier) => Some(self.expect_identifier("loop variable")?),
                    _ => None,
                };
                Statement::Next { var }
            }
            Token::KwSub => {
                self.advance()?;
                let name = self.expect_identifier("Sub name")?;
                let params = self.parse_optional_params()?;
                Statement::Sub { name, params }
            }
            Token::KwFunction => {
                self.advance()?;
                let name = self.expect_identifier("Function name")?;
                let params = self.parse_optional_params()?;
                self.expect(Token::KwAs)?;
                let ret = self.expect_type_name()?;
                Statement::Function { name, params, ret }
            }
            Token::KwCall => {
                self.advance()?;
                let name = self.expect_identifier("Sub or Function name")?;
                let args = if matches!(self.peek_kind()?, Some(Token::LParen)) {
                    self.parse_call_args()?
                } else {
                    Vec::new()
                };
                Statement::Call { name, args }
            }
            _ => self.parse_assign_or_call()?,
        };

        self.finish(stmt)
    }

    // ==================== Statement forms ====================

    fn parse_dim(&mut self) -> ParseResult<Statement> {
        self.expect(Token::KwDim)?;
        let mut decls = Vec::new();
        loop {
            let name = self.expect_identifier("variable name")?;
            self.expect(Token::KwAs)?;
            let ty = self.expect_type_name()?;
            decls.push(VarDecl { name, ty });
            if matches!(self.peek_kind()?, Some(Token::Comma)) {
                self.advance()?;
            } else {
                break;
            }
        }
        Ok(Statement::Dim { decls })
    }

    fn parse_end(&mut self) -> ParseResult<Statement> {
        self.expect(Token::KwEnd)?;
        match self.peek_kind()? {
            Some(Token::KwIf) => {
                self.advance()?;
                Ok(Statement::EndIf)
            }
            Some(Token::KwSub) => {
                self.advance()?;
                Ok(Statement::EndSub)
            }
            Some(Token::KwFunction) => {
                self.advance()?;
                Ok(Statement::EndFunction)
            }
            _ => Err(self.unexpected_here("If, Sub or Function after End")),
        }
    }

    fn parse_for(&mut self) -> ParseResult<Statement> {
        self.expect(Token::KwFor)?;
        let var = self.expect_identifier("loop variable")?;
        self.expect(Token::Eq)?;
        let start = self.parse_expr()?;
        self.expect(Token::KwTo)?;
        let end = self.parse_expr()?;
        let step = if matches!(self.peek_kind()?, Some(Token::KwStep)) {
            self.advance()?;
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Statement::For {
            var,
            start,
            end,
            step,
        })
    }

    /// `target = value`, or a statement-position call without `Call`
    fn parse_assign_or_call(&mut self) -> ParseResult<Statement> {
        // Parse the target above the comparison tier so a top-level `=`
        // stays available as the assignment mark.
        let target = self.parse_binary(PREC_ADDITIVE)?;

        if matches!(self.peek_kind()?, Some(Token::Eq)) {
            self.advance()?;
            let value = self.parse_expr()?;
            return Ok(Statement::Assign { target, value });
        }

        match target {
            Expr::Call { name, args } => Ok(Statement::Call { name, args }),
            _ => Err(self.unexpected_here("'=' or a call statement")),
        }
    }

    fn parse_optional_params(&mut self) -> ParseResult<Vec<Param>> {
        if !matches!(self.peek_kind()?, Some(Token::LParen)) {
            return Ok(Vec::new());
        }
        self.advance()?;

        let mut params = Vec::new();
        if matches!(self.peek_kind()?, Some(Token::RParen)) {
            self.advance()?;
            return Ok(params);
        }
        loop {
            let name = self.expect_identifier("parameter name")?;
            self.expect(Token::KwAs)?;
            let ty = self.expect_type_name()?;
            params.push(Param { name, ty });
            match self.peek_kind()? {
                Some(Token::Comma) => {
                    self.advance()?;
                }
                Some(Token::RParen) => {
                    self.advance()?;
                    break;
                }
                _ => return Err(self.unexpected_here("',' or ')'")),
            }
        }
        Ok(params)
    }

    // ==================== Expressions ====================

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary(PREC_COMPARE)
    }

    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary()?;

        while let Some(op) = self.peek_binop()? {
            let (prec, right_assoc) = binop_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance()?;
            let next_min = if right_assoc { prec } else { prec + 1 };
            let rhs = self.parse_binary(next_min)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if matches!(self.peek_kind()?, Some(Token::Minus)) {
            self.advance()?;
            // `^` binds tighter than unary minus: -2^2 is -(2^2)
            let operand = self.parse_binary(PREC_POWER)?;
            return Ok(Expr::Neg(Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.advance()?.ok_or_else(|| {
            ParseError::unexpected_eol("an expression", self.end_span())
        })?;

        match token.token {
            Token::IntLiteral => parse_int_literal(&token),
            Token::FloatLiteral => parse_float_literal(&token),
            Token::StringLiteral => {
                let body = &token.text[1..token.text.len() - 1];
                let decoded = unescape(body, token.span)?;
                Ok(Expr::Literal(Literal::Str(decoded)))
            }
            Token::True => Ok(Expr::Literal(Literal::Bool(true))),
            Token::False => Ok(Expr::Literal(Literal::Bool(false))),
            Token::Identifier => {
                let name = token.text.to_string();
                if matches!(self.peek_kind()?, Some(Token::LParen)) {
                    let args = self.parse_call_args()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            other => Err(ParseError::unexpected_token(
                other.describe(),
                "an expression",
                token.span,
            )),
        }
    }

    fn parse_call_args(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if matches!(self.peek_kind()?, Some(Token::RParen)) {
            self.advance()?;
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.peek_kind()? {
                Some(Token::Comma) => {
                    self.advance()?;
                }
                Some(Token::RParen) => {
                    self.advance()?;
                    break;
                }
                _ => return Err(self.unexpected_here("',' or ')'")),
            }
        }
        Ok(args)
    }

    fn peek_binop(&mut self) -> ParseResult<Option<BinOp>> {
        Ok(self.peek_kind()?.and_then(|token| match token {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Caret => Some(BinOp::Pow),
            Token::Eq => Some(BinOp::Eq),
            Token::Lt => Some(BinOp::Lt),
            Token::Gt => Some(BinOp::Gt),
            Token::NotEq => Some(BinOp::NotEq),
            Token::LtEq => Some(BinOp::LtEq),
            Token::GtEq => Some(BinOp::GtEq),
            _ => None,
        }))
    }

    // ==================== Token helpers ====================

    fn peek_kind(&mut self) -> ParseResult<Option<Token>> {
        match self.lexer.peek() {
            None => Ok(None),
            Some(Ok(t)) => Ok(Some(t.token)),
            Some(Err(e)) => Err(e.clone()),
        }
    }

    fn advance(&mut self) -> ParseResult<Option<SpannedToken<'a>>> {
        self.lexer.next_token().transpose()
    }

    fn expect(&mut self, wanted: Token) -> ParseResult<SpannedToken<'a>> {
        match self.advance()? {
            Some(t) if t.token == wanted => Ok(t),
            Some(t) => Err(ParseError::unexpected_token(
                t.token.describe(),
                wanted.describe(),
                t.span,
            )),
            None => Err(ParseError::unexpected_eol(
                wanted.describe(),
                self.end_span(),
            )),
        }
    }

    fn expect_identifier(&mut self, what: &str) -> ParseResult<String> {
        match self.advance()? {
            Some(t) if t.token == Token::Identifier => Ok(t.text.to_string()),
            Some(t) => Err(ParseError::unexpected_token(t.token.describe(), what, t.span)),
            None => Err(ParseError::unexpected_eol(what, self.end_span())),
        }
    }

    fn expect_type_name(&mut self) -> ParseResult<TypeName> {
        match self.advance()? {
            Some(t) => match t.token {
                Token::KwByte => Ok(TypeName::Byte),
                Token::KwBoolean => Ok(TypeName::Boolean),
                Token::KwInteger => Ok(TypeName::Integer),
                Token::KwLong => Ok(TypeName::Long),
                Token::KwSingle => Ok(TypeName::Single),
                Token::KwDouble => Ok(TypeName::Double),
                Token::KwString => Ok(TypeName::String),
                other => Err(ParseError::unexpected_token(
                    other.describe(),
                    "a type name",
                    t.span,
                )),
            },
            None => Err(ParseError::unexpected_eol("a type name", self.end_span())),
        }
    }

    /// Require the rest of the line to be empty
    fn finish(&mut self, stmt: Statement) -> ParseResult<Statement> {
        while let Some(t) = self.advance()? {
            if t.token != Token::Newline {
                return Err(ParseError::TrailingInput {
                    found: t.token.describe().to_string(),
                    span: t.span,
                });
            }
        }
        Ok(stmt)
    }

    fn unexpected_here(&mut self, expected: &str) -> ParseError {
        match self.lexer.peek() {
            Some(Ok(t)) => {
                ParseError::unexpected_token(t.token.describe(), expected, t.span)
            }
            Some(Err(e)) => e.clone(),
            None => ParseError::unexpected_eol(expected, self.end_span()),
        }
    }

    fn end_span(&self) -> Span {
        let len = self.lexer.source().len();
        Span::new(len, len)
    }
}

/// Precedence tier and right-associativity for a binary operator
fn binop_precedence(op: BinOp) -> (u8, bool) {
    match op {
        BinOp::Eq
        | BinOp::Lt
        | BinOp::Gt
        | BinOp::NotEq
        | BinOp::LtEq
        | BinOp::GtEq => (PREC_COMPARE, false),
        BinOp::Add | BinOp::Sub => (PREC_ADDITIVE, false),
        BinOp::Mul | BinOp::Div => (PREC_MULTIPLICATIVE, false),
        BinOp::Pow => (PREC_POWER, true),
    }
}

// ==================== Literal decoding ====================

fn parse_int_literal(token: &SpannedToken<'_>) -> ParseResult<Expr> {
    let value: i64 = token.text.parse().map_err(|_| ParseError::InvalidNumber {
        literal: token.text.to_string(),
        span: token.span,
    })?;
    // Default integer literals are Integer-width; wider ones become Long
    let literal = match i32::try_from(value) {
        Ok(v) => Literal::Int(v),
        Err(_) => Literal::Long(value),
    };
    Ok(Expr::Literal(literal))
}

fn parse_float_literal(token: &SpannedToken<'_>) -> ParseResult<Expr> {
    let (body, single) = match token.text.strip_suffix('!') {
        Some(stripped) => (stripped, true),
        None => (token.text, false),
    };
    let invalid = || ParseError::InvalidNumber {
        literal: token.text.to_string(),
        span: token.span,
    };
    if single {
        let value: f32 = body.parse().map_err(|_| invalid())?;
        Ok(Expr::Literal(Literal::Single(value)))
    } else {
        let value: f64 = body.parse().map_err(|_| invalid())?;
        Ok(Expr::Literal(Literal::Double(value)))
    }
}

fn unescape(body: &str, span: Span) -> ParseResult<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            other => {
                let mut sequence = String::from('\\');
                if let Some(c) = other {
                    sequence.push(c);
                }
                return Err(ParseError::InvalidEscape { sequence, span });
            }
        }
    }
    Ok(out)
}
