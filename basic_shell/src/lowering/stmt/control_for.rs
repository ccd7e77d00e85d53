//! For/Next loops.
//!
//! `For` builds the whole skeleton up front: the pre-header assigns the
//! start value and evaluates `end` and `step` once, the check block
//! loads the induction variable and leaves the loop on strict
//! greater-than, so the range is inclusive. `Next` fills the increment
//! block: the step is coerced to the induction type with the assignment
//! rules, added, and stored back.

use basic_shell_parser::ast::{BinOp, Expr};

use crate::error::{SemanticError, ShellResult};
use crate::ir::{ArithOp, ValueRef};
use crate::lowering::coerce;
use crate::lowering::context::{Construct, ForLoop};
use crate::lowering::expr::lower_expr;
use crate::types::SemanticType;
use crate::value::{ConstValue, Value};

use super::Lowering;

pub(crate) fn open_for(
    lw: &mut Lowering,
    var: &str,
    start: &Expr,
    end: &Expr,
    step: Option<&Expr>,
) -> ShellResult<()> {
    let Some(info) = lw.lookup_var(var) else {
        return Err(SemanticError::invalid_target(format!(
            "induction variable `{}` is not declared",
            var
        ))
        .into());
    };
    if info.ty == SemanticType::String {
        return Err(SemanticError::unsupported("`For` over a string variable").into());
    }

    let start = lower_expr(lw, start)?;
    let end = lower_expr(lw, end)?;
    let step = match step {
        Some(e) => lower_expr(lw, e)?,
        None => Value::Constant(default_step(info.ty)),
    };
    if start.is_string() {
        return Err(SemanticError::incompatible(format!(
            "cannot assign a string to `{}` ({})",
            var, info.ty
        ))
        .into());
    }
    if end.is_string() {
        return Err(SemanticError::unsupported("`To` bound on a string value").into());
    }
    if step.is_string() {
        return Err(SemanticError::unsupported("`Step` on a string value").into());
    }

    let index = lw.ctx_mut().next_construct_index();
    let func = lw.ctx().func;
    let check = lw.module.add_block(func, format!("for{}.check", index));
    let body = lw.module.add_block(func, format!("for{}.body", index));
    let step_block = lw.module.add_block(func, format!("for{}.step", index));
    let exit = lw.module.add_block(func, format!("for{}.exit", index));

    let counter = Value::Variable {
        name: var.to_string(),
        ty: info.ty,
        slot: info.slot,
    };
    coerce::assign(lw, &counter, start)?;
    let (end_ref, end_ty) = coerce::materialize(lw, &end);
    let (step_ref, step_ty) = coerce::materialize(lw, &step);

    let at = lw.at();
    lw.module.emit_br(at, check);

    lw.set_at(check);
    let cond = coerce::comparison(
        lw,
        BinOp::Gt,
        counter,
        Value::Computed {
            value: end_ref,
            ty: end_ty,
        },
    )?;
    let (cv, _) = coerce::materialize(lw, &cond);
    lw.module.emit_cond_br(check, cv, exit, body);

    lw.constructs.push(Construct::For(ForLoop {
        check,
        step_block,
        exit,
        var: var.to_string(),
        slot: info.slot,
        ty: info.ty,
        step: Value::Computed {
            value: step_ref,
            ty: step_ty,
        },
    }));
    lw.set_at(body);
    Ok(())
}

fn default_step(ty: SemanticType) -> ConstValue {
    match ty {
        SemanticType::Byte | SemanticType::Boolean => ConstValue::Byte(1),
        SemanticType::Integer => ConstValue::Int(1),
        SemanticType::Long => ConstValue::Long(1),
        SemanticType::Single => ConstValue::Single(1.0),
        SemanticType::Double => ConstValue::Double(1.0),
        SemanticType::String => ConstValue::Int(1),
    }
}

pub(crate) fn next(lw: &mut Lowering, var: Option<&str>) -> ShellResult<()> {
    let looped = match lw.constructs.last() {
        Some(Construct::For(looped)) => looped.clone(),
        Some(other) => {
            return Err(SemanticError::unmatched(format!(
                "`Next` cannot close the open `{}`",
                other.kind_name()
            ))
            .into())
        }
        None => return Err(SemanticError::unmatched("`Next` without an open `For`").into()),
    };
    if let Some(found) = var {
        if found != looped.var {
            return Err(SemanticError::MismatchedLoopVariable {
                expected: looped.var,
                found: found.to_string(),
            }
            .into());
        }
    }
    lw.constructs.pop();

    let at = lw.at();
    lw.module.emit_br(at, looped.step_block);

    lw.set_at(looped.step_block);
    let backend = looped.ty.backend();
    let counter = lw
        .module
        .emit_load(looped.step_block, backend, ValueRef::Slot(looped.slot));
    let (step_ref, step_ty) = coerce::materialize(lw, &looped.step);
    let step = coerce::cast_for_assignment(lw, step_ref, step_ty, backend, &looped.var, looped.ty)?;
    let bumped = lw
        .module
        .emit_binary(looped.step_block, ArithOp::Add, backend, counter, step);
    lw.module
        .emit_store(looped.step_block, backend, bumped, ValueRef::Slot(looped.slot));
    lw.module.emit_br(looped.step_block, looped.check);

    lw.set_at(looped.exit);
    Ok(())
}
