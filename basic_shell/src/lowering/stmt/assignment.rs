//! `=` lines.
//!
//! The parser hands the left side over as an expression; whether the
//! line assigns at all is decided here, by resolving the target against
//! the variable registry before anything lowers. A target that is not
//! an addressable variable fails without emitting a single instruction.

use basic_shell_parser::ast::Expr;

use crate::error::{SemanticError, ShellResult};
use crate::lowering::coerce;
use crate::lowering::expr::lower_expr;
use crate::value::Value;

use super::Lowering;

pub(crate) fn lower_assign(lw: &mut Lowering, target: &Expr, value: &Expr) -> ShellResult<()> {
    let target = resolve_target(lw, target)?;
    let value = lower_expr(lw, value)?;
    coerce::assign(lw, &target, value)
}

fn resolve_target(lw: &Lowering, target: &Expr) -> ShellResult<Value> {
    let Expr::Var(name) = target else {
        return Err(SemanticError::invalid_target(
            "left side of `=` is not a variable; the line would only compare values",
        )
        .into());
    };
    let Some(info) = lw.lookup_var(name) else {
        return Err(
            SemanticError::invalid_target(format!("variable `{}` is not declared", name)).into(),
        );
    };
    Ok(Value::Variable {
        name: name.clone(),
        ty: info.ty,
        slot: info.slot,
    })
}
