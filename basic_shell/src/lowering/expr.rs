//! Expression lowering.
//!
//! Expressions lower to [`Value`]s, not straight to instructions:
//! constants and variable references stay symbolic until an operator or
//! a store forces them into the block. That keeps failed statements from
//! leaving stray loads behind.

use basic_shell_parser::ast::{Expr, Literal};

use crate::error::{SemanticError, ShellResult};
use crate::ir::{ArithOp, IrConst, IrType, ValueRef};
use crate::types::SemanticType;
use crate::value::{ConstValue, Value};

use super::coerce;
use super::Lowering;

pub(crate) fn lower_expr(lw: &mut Lowering, expr: &Expr) -> ShellResult<Value> {
    match expr {
        Expr::Literal(lit) => Ok(Value::Constant(literal_const(lit))),
        Expr::Var(name) => Ok(lower_var(lw, name)),
        Expr::Neg(inner) => {
            let value = lower_expr(lw, inner)?;
            lower_neg(lw, value)
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = lower_expr(lw, lhs)?;
            let rhs = lower_expr(lw, rhs)?;
            if op.is_comparison() {
                coerce::comparison(lw, *op, lhs, rhs)
            } else {
                coerce::binary_arith(lw, *op, lhs, rhs)
            }
        }
        Expr::Call { name, args } => lower_call_expr(lw, name, args),
    }
}

fn literal_const(lit: &Literal) -> ConstValue {
    match lit {
        Literal::Int(v) => ConstValue::Int(*v),
        Literal::Long(v) => ConstValue::Long(*v),
        Literal::Single(v) => ConstValue::Single(*v),
        Literal::Double(v) => ConstValue::Double(*v),
        Literal::Bool(v) => ConstValue::Bool(*v),
        Literal::Str(s) => ConstValue::Str(s.clone()),
    }
}

/// A name in expression position. Unresolved names warn and collapse to
/// zero so the rest of the line still lowers.
fn lower_var(lw: &mut Lowering, name: &str) -> Value {
    match lw.lookup_var(name) {
        Some(info) => Value::Variable {
            name: name.to_string(),
            ty: info.ty,
            slot: info.slot,
        },
        None => {
            lw.warn(format!("unknown variable `{}`", name));
            Value::Constant(ConstValue::Int(0))
        }
    }
}

fn lower_neg(lw: &mut Lowering, value: Value) -> ShellResult<Value> {
    if let Value::Constant(c) = &value {
        if let Some(folded) = c.negated() {
            return Ok(Value::Constant(folded));
        }
    }
    if value.is_string() {
        return Err(SemanticError::unsupported("`-` on a string value").into());
    }
    // Runtime negation: subtract from a typed zero.
    let (v, ty) = coerce::materialize(lw, &value);
    let Some(zero) = IrConst::zero(ty) else {
        return Err(SemanticError::unsupported("`-` on a string value").into());
    };
    let at = lw.at();
    let result = lw
        .module
        .emit_binary(at, ArithOp::Sub, ty, ValueRef::Const(zero), v);
    Ok(Value::Computed { value: result, ty })
}

fn lower_call_expr(lw: &mut Lowering, name: &str, args: &[Expr]) -> ShellResult<Value> {
    let Some(sig) = lw.signatures.get(name).cloned() else {
        lw.warn(format!("unknown callee `{}`", name));
        return Ok(Value::Constant(ConstValue::Int(0)));
    };
    let Some(ret) = sig.ret else {
        return Err(SemanticError::incompatible(format!(
            "`{}` is a Sub and produces no value",
            name
        ))
        .into());
    };
    let lowered = lower_call_args(lw, name, &sig.params, args)?;
    let at = lw.at();
    let result = lw.module.emit_call(at, name, ret.backend(), lowered);
    Ok(Value::Computed {
        value: result,
        ty: ret.backend(),
    })
}

/// Lower and coerce the arguments of a call against its declared
/// parameter list. The count is checked before any argument lowers.
pub(crate) fn lower_call_args(
    lw: &mut Lowering,
    callee: &str,
    params: &[(String, SemanticType)],
    args: &[Expr],
) -> ShellResult<Vec<(IrType, ValueRef)>> {
    if args.len() != params.len() {
        return Err(SemanticError::CallArityMismatch {
            name: callee.to_string(),
            expected: params.len(),
            got: args.len(),
        }
        .into());
    }
    let mut lowered = Vec::with_capacity(args.len());
    for (arg, (pname, pty)) in args.iter().zip(params) {
        let value = lower_expr(lw, arg)?;
        if matches!(value, Value::Constant(ConstValue::Str(_))) {
            return Err(SemanticError::incompatible(format!(
                "cannot pass a string literal for parameter `{}` of `{}`",
                pname, callee
            ))
            .into());
        }
        let (v, from) = coerce::materialize(lw, &value);
        let coerced = coerce::cast_call_arg(lw, v, from, *pty, callee, pname)?;
        lowered.push((pty.backend(), coerced));
    }
    Ok(lowered)
}
