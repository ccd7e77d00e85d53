//! Sub/Function definitions, their closers, and statement-position
//! calls.
//!
//! Definitions push a fresh editing context; the closers pop it. A
//! routine name is registered once: a second definition under the same
//! name gets a uniquely renamed backend function, and calls keep
//! resolving the first.

use basic_shell_parser::ast::{Expr, Param, TypeName};

use crate::error::{SemanticError, ShellResult};
use crate::ir::{IrType, ValueRef};
use crate::lowering::context::{ContextKind, FunctionContext, Signature, VarInfo};
use crate::lowering::expr::lower_call_args;
use crate::types::SemanticType;

use super::Lowering;

pub(crate) fn begin_sub(lw: &mut Lowering, name: &str, params: &[Param]) -> ShellResult<()> {
    open_routine(lw, name, params, None)
}

pub(crate) fn begin_function(
    lw: &mut Lowering,
    name: &str,
    params: &[Param],
    ret: TypeName,
) -> ShellResult<()> {
    open_routine(lw, name, params, Some(SemanticType::from(ret)))
}

fn open_routine(
    lw: &mut Lowering,
    name: &str,
    params: &[Param],
    ret: Option<SemanticType>,
) -> ShellResult<()> {
    let typed: Vec<(String, SemanticType)> = params
        .iter()
        .map(|p| (p.name.clone(), SemanticType::from(p.ty)))
        .collect();
    let backend_params: Vec<(String, IrType)> = typed
        .iter()
        .map(|(n, t)| (n.clone(), t.backend()))
        .collect();
    let backend_ret = match ret {
        Some(t) => t.backend(),
        None => IrType::Void,
    };

    let func = lw.module.add_function(name, backend_params, backend_ret);
    let entry = lw.module.add_block(func, "entry");

    if lw.signatures.contains_key(name) {
        lw.warn(format!(
            "`{}` is already defined; calls keep the first definition",
            name
        ));
    } else {
        lw.signatures.insert(
            name.to_string(),
            Signature {
                params: typed.clone(),
                ret,
            },
        );
    }

    let kind = match ret {
        Some(t) => ContextKind::Function(t),
        None => ContextKind::Sub,
    };
    let mut ctx = FunctionContext::new(
        lw.module.func(func).name.clone(),
        kind,
        func,
        entry,
        lw.constructs.len(),
    );

    // Each parameter becomes an addressable variable: a slot in the
    // entry block with the incoming argument stored into it.
    for (i, (pname, pty)) in typed.iter().enumerate() {
        let slot = lw
            .module
            .add_slot(func, format!("{}.addr", pname), pty.backend());
        lw.module.emit_alloca(entry, slot);
        lw.module
            .emit_store(entry, pty.backend(), ValueRef::Param(i), ValueRef::Slot(slot));
        ctx.variables.insert(pname.clone(), VarInfo { ty: *pty, slot });
    }

    lw.contexts.push(ctx);
    Ok(())
}

/// `End Sub`: emit the void return and pop. Fails without popping when
/// there is nothing to close, when a construct is still open, or when
/// the open routine is a Function.
pub(crate) fn end_sub(lw: &mut Lowering) -> ShellResult<()> {
    if lw.contexts.len() == 1 {
        return Err(SemanticError::unmatched("`End Sub` without a matching `Sub`").into());
    }
    check_constructs_closed(lw, "End Sub")?;
    if let ContextKind::Function(_) = lw.ctx().kind {
        return Err(SemanticError::unmatched(format!(
            "`End Sub` cannot close Function `{}`",
            lw.ctx().name
        ))
        .into());
    }
    let at = lw.at();
    lw.module.emit_ret(at);
    lw.contexts.pop();
    Ok(())
}

/// `End Function`: pop without inserting a terminator. The value is
/// returned by assigning to the function's own name, a convention that
/// lives above this layer.
pub(crate) fn end_function(lw: &mut Lowering) -> ShellResult<()> {
    if lw.contexts.len() == 1 {
        return Err(
            SemanticError::unmatched("`End Function` without a matching `Function`").into(),
        );
    }
    check_constructs_closed(lw, "End Function")?;
    lw.contexts.pop();
    Ok(())
}

fn check_constructs_closed(lw: &Lowering, closer: &str) -> ShellResult<()> {
    if lw.constructs.len() != lw.ctx().construct_floor {
        let open = lw.constructs[lw.constructs.len() - 1].kind_name();
        return Err(SemanticError::unmatched(format!(
            "`{}` before closing the open `{}`",
            closer, open
        ))
        .into());
    }
    Ok(())
}

/// A call in statement position. The result of a Function call is
/// dropped; an unknown name warns and emits nothing.
pub(crate) fn lower_call_stmt(lw: &mut Lowering, name: &str, args: &[Expr]) -> ShellResult<()> {
    let Some(sig) = lw.signatures.get(name).cloned() else {
        lw.warn(format!("unknown callee `{}`", name));
        return Ok(());
    };
    let lowered = lower_call_args(lw, name, &sig.params, args)?;
    let at = lw.at();
    match sig.ret {
        Some(ret) => {
            lw.module.emit_call(at, name, ret.backend(), lowered);
        }
        None => lw.module.emit_void_call(at, name, lowered),
    }
    Ok(())
}
