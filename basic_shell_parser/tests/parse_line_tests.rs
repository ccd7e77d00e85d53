//! Statement corpus for the public `parse_line` entry point
//!
//! One test group per statement family, each driving the parser the way
//! the interactive session does: a single submitted line at a time.

use basic_shell_parser::ast::{BinOp, Expr, Literal, Param, Statement, TypeName, VarDecl};
use basic_shell_parser::{parse_line, ParseError};

fn parse(source: &str) -> Statement {
    parse_line(source).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e))
}

fn parse_err(source: &str) -> ParseError {
    match parse_line(source) {
        Ok(stmt) => panic!("expected {:?} to fail, got {:?}", source, stmt),
        Err(e) => e,
    }
}

fn assign_value(source: &str) -> Expr {
    match parse(source) {
        Statement::Assign { value, .. } => value,
        other => panic!("expected an assignment, got {:?}", other),
    }
}

fn int(v: i32) -> Expr {
    Expr::Literal(Literal::Int(v))
}

fn var(name: &str) -> Expr {
    Expr::Var(name.to_string())
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

// ==================== Declarations ====================

#[test]
fn test_dim_every_type_keyword() {
    let cases = [
        ("Dim v As Byte", TypeName::Byte),
        ("Dim v As Boolean", TypeName::Boolean),
        ("Dim v As Integer", TypeName::Integer),
        ("Dim v As Long", TypeName::Long),
        ("Dim v As Single", TypeName::Single),
        ("Dim v As Double", TypeName::Double),
        ("Dim v As String", TypeName::String),
    ];
    for (source, ty) in cases {
        assert_eq!(
            parse(source),
            Statement::Dim {
                decls: vec![VarDecl {
                    name: "v".to_string(),
                    ty,
                }],
            },
            "source: {}",
            source
        );
    }
}

#[test]
fn test_dim_group_keeps_declaration_order() {
    let Statement::Dim { decls } = parse("Dim first As Integer, second As Double") else {
        panic!("not a Dim");
    };
    assert_eq!(decls[0].name, "first");
    assert_eq!(decls[1].name, "second");
}

#[test]
fn test_dim_rejects_missing_pieces() {
    let err = parse_err("Dim x Integer");
    assert!(err.to_string().contains("As"), "got: {}", err);

    let err = parse_err("Dim x As");
    assert!(err.to_string().contains("type name"), "got: {}", err);

    let err = parse_err("Dim x As Integer,");
    assert!(err.to_string().contains("variable name"), "got: {}", err);
}

// ==================== Conditionals ====================

#[test]
fn test_if_chain_clauses() {
    assert_eq!(
        parse("If total >= limit Then"),
        Statement::If {
            cond: binary(BinOp::GtEq, var("total"), var("limit")),
        }
    );
    assert_eq!(
        parse("ElseIf total <> 0 Then"),
        Statement::ElseIf {
            cond: binary(BinOp::NotEq, var("total"), int(0)),
        }
    );
    assert_eq!(parse("Else"), Statement::Else);
}

#[test]
fn test_endif_spellings() {
    assert_eq!(parse("EndIf"), Statement::EndIf);
    assert_eq!(parse("End If"), Statement::EndIf);
    assert_eq!(parse("END IF"), Statement::EndIf);
    assert_eq!(parse("endif"), Statement::EndIf);
}

// ==================== Loops ====================

#[test]
fn test_for_with_expression_bounds() {
    assert_eq!(
        parse("For i = n - 1 To n + 1 Step k"),
        Statement::For {
            var: "i".to_string(),
            start: binary(BinOp::Sub, var("n"), int(1)),
            end: binary(BinOp::Add, var("n"), int(1)),
            step: Some(var("k")),
        }
    );
}

#[test]
fn test_for_step_defaults_to_none() {
    let Statement::For { step, .. } = parse("For i = 1 To 10") else {
        panic!("not a For");
    };
    assert_eq!(step, None);
}

#[test]
fn test_next_forms() {
    assert_eq!(parse("Next"), Statement::Next { var: None });
    assert_eq!(
        parse("next counter"),
        Statement::Next {
            var: Some("counter".to_string()),
        }
    );
}

// ==================== Routines ====================

#[test]
fn test_sub_headers() {
    assert_eq!(
        parse("Sub tick"),
        Statement::Sub {
            name: "tick".to_string(),
            params: vec![],
        }
    );
    // Empty parens are the same as no parens
    assert_eq!(
        parse("Sub tick()"),
        Statement::Sub {
            name: "tick".to_string(),
            params: vec![],
        }
    );
}

#[test]
fn test_function_header_with_params() {
    assert_eq!(
        parse("Function clamp(v As Double, hi As Double) As Double"),
        Statement::Function {
            name: "clamp".to_string(),
            params: vec![
                Param {
                    name: "v".to_string(),
                    ty: TypeName::Double,
                },
                Param {
                    name: "hi".to_string(),
                    ty: TypeName::Double,
                },
            ],
            ret: TypeName::Double,
        }
    );
}

#[test]
fn test_function_requires_return_type() {
    let err = parse_err("Function f(x As Integer)");
    assert!(err.to_string().contains("As"), "got: {}", err);
}

#[test]
fn test_end_routine_forms() {
    assert_eq!(parse("End Sub"), Statement::EndSub);
    assert_eq!(parse("end sub"), Statement::EndSub);
    assert_eq!(parse("End Function"), Statement::EndFunction);
}

// ==================== Calls ====================

#[test]
fn test_call_statement_forms() {
    assert_eq!(
        parse("Call greet"),
        Statement::Call {
            name: "greet".to_string(),
            args: vec![],
        }
    );
    assert_eq!(
        parse("greet()"),
        Statement::Call {
            name: "greet".to_string(),
            args: vec![],
        }
    );
    assert_eq!(
        parse("shift(base, 2)"),
        Statement::Call {
            name: "shift".to_string(),
            args: vec![var("base"), int(2)],
        }
    );
}

#[test]
fn test_call_arguments_are_full_expressions() {
    assert_eq!(
        parse("shift(a + 1, scale(2), -3)"),
        Statement::Call {
            name: "shift".to_string(),
            args: vec![
                binary(BinOp::Add, var("a"), int(1)),
                Expr::Call {
                    name: "scale".to_string(),
                    args: vec![int(2)],
                },
                Expr::Neg(Box::new(int(3))),
            ],
        }
    );
}

// ==================== Expressions ====================

#[test]
fn test_every_comparison_operator() {
    let cases = [
        ("x = a = b", BinOp::Eq),
        ("x = a < b", BinOp::Lt),
        ("x = a > b", BinOp::Gt),
        ("x = a <> b", BinOp::NotEq),
        ("x = a <= b", BinOp::LtEq),
        ("x = a >= b", BinOp::GtEq),
    ];
    for (source, op) in cases {
        assert_eq!(
            assign_value(source),
            binary(op, var("a"), var("b")),
            "source: {}",
            source
        );
    }
}

#[test]
fn test_same_tier_operators_associate_left() {
    assert_eq!(
        assign_value("x = a + b - c"),
        binary(BinOp::Sub, binary(BinOp::Add, var("a"), var("b")), var("c"))
    );
    assert_eq!(
        assign_value("x = a / b * c"),
        binary(BinOp::Mul, binary(BinOp::Div, var("a"), var("b")), var("c"))
    );
}

#[test]
fn test_negated_power() {
    assert_eq!(
        assign_value("x = -a ^ 2"),
        Expr::Neg(Box::new(binary(BinOp::Pow, var("a"), int(2))))
    );
}

// ==================== Literals ====================

#[test]
fn test_numeric_literal_widths() {
    assert_eq!(assign_value("x = 12"), int(12));
    assert_eq!(
        assign_value("x = 2147483648"),
        Expr::Literal(Literal::Long(2_147_483_648))
    );
    assert_eq!(
        assign_value("x = 1.5"),
        Expr::Literal(Literal::Double(1.5))
    );
    assert_eq!(
        assign_value("x = 2e3"),
        Expr::Literal(Literal::Double(2000.0))
    );
    assert_eq!(
        assign_value("x = 12!"),
        Expr::Literal(Literal::Single(12.0))
    );
}

#[test]
fn test_boolean_literals() {
    assert_eq!(assign_value("x = True"), Expr::Literal(Literal::Bool(true)));
    assert_eq!(
        assign_value("x = false"),
        Expr::Literal(Literal::Bool(false))
    );
}

#[test]
fn test_string_literal_escapes() {
    assert_eq!(
        assign_value(r#"s = "tab\there""#),
        Expr::Literal(Literal::Str("tab\there".to_string()))
    );
    assert_eq!(
        assign_value(r#"s = "nul\0end""#),
        Expr::Literal(Literal::Str("nul\0end".to_string()))
    );
}

// ==================== Blank lines and comments ====================

#[test]
fn test_content_free_lines_are_empty_statements() {
    assert_eq!(parse(""), Statement::Empty);
    assert_eq!(parse("   \t"), Statement::Empty);
    assert_eq!(parse("' a remark"), Statement::Empty);
}

#[test]
fn test_trailing_comment_is_ignored() {
    assert_eq!(
        parse("x = 1 ' the answer, minus 41"),
        Statement::Assign {
            target: var("x"),
            value: int(1),
        }
    );
}

// ==================== Errors ====================

#[test]
fn test_error_spans_point_into_the_line() {
    let err = parse_err("x = ) + 1");
    assert!(matches!(err, ParseError::UnexpectedToken { .. }), "got: {:?}", err);
    assert_eq!(err.span().start, 4);
}

#[test]
fn test_unterminated_string() {
    let err = parse_err(r#"s = "oops"#);
    assert!(matches!(err, ParseError::UnterminatedString { .. }), "got: {:?}", err);
}

#[test]
fn test_trailing_tokens_after_a_complete_statement() {
    let err = parse_err("EndIf now");
    assert!(matches!(err, ParseError::TrailingInput { .. }), "got: {:?}", err);
}

#[test]
fn test_unrecognized_character() {
    let err = parse_err("x = 1 @ 2");
    assert!(matches!(err, ParseError::LexerError { .. }), "got: {:?}", err);
}
