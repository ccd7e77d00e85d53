//! If/ElseIf/Else/EndIf chains.
//!
//! One chain occupies one construct-stack slot and is mutated in place
//! by its middle clauses. The chain tracks two blocks: `false_block`,
//! where control goes when every condition so far failed, and `exit`,
//! the current join target. `exit` always equals the most recently
//! allocated false block, so closing the chain at any clause joins all
//! finished paths there.
//!
//! An `ElseIf` condition is evaluated at the end of the previous
//! clause's body path; its conditional branch sends the true case into
//! the old false block, which becomes the new clause's body.

use basic_shell_parser::ast::Expr;

use crate::error::{SemanticError, ShellResult};
use crate::lowering::coerce;
use crate::lowering::context::{Construct, IfChain};
use crate::lowering::expr::lower_expr;

use super::Lowering;

pub(crate) fn open_if(lw: &mut Lowering, cond: &Expr) -> ShellResult<()> {
    let cond = lower_expr(lw, cond)?;
    let (cv, _) = coerce::materialize(lw, &cond);

    let index = lw.ctx_mut().next_construct_index();
    let func = lw.ctx().func;
    let true_block = lw.module.add_block(func, format!("if{}.true", index));
    let false_block = lw.module.add_block(func, format!("if{}.false", index));

    let at = lw.at();
    lw.module.emit_cond_br(at, cv, true_block, false_block);
    lw.constructs.push(Construct::If(IfChain {
        false_block,
        exit: false_block,
        has_else: false,
        index,
        clause: 0,
    }));
    lw.set_at(true_block);
    Ok(())
}

pub(crate) fn else_if(lw: &mut Lowering, cond: &Expr) -> ShellResult<()> {
    let chain = match lw.constructs.last() {
        Some(Construct::If(chain)) => chain.clone(),
        Some(other) => {
            return Err(SemanticError::unmatched(format!(
                "`ElseIf` cannot close the open `{}`",
                other.kind_name()
            ))
            .into())
        }
        None => return Err(SemanticError::unmatched("`ElseIf` without an open `If`").into()),
    };
    if chain.has_else {
        lw.warn("condition already set");
        return Ok(());
    }

    let cond = lower_expr(lw, cond)?;
    let (cv, _) = coerce::materialize(lw, &cond);

    let clause = chain.clause + 1;
    let func = lw.ctx().func;
    let next_false = lw
        .module
        .add_block(func, format!("if{}.elif{}", chain.index, clause));

    let at = lw.at();
    lw.module.emit_cond_br(at, cv, chain.false_block, next_false);
    lw.set_at(chain.false_block);

    if let Some(Construct::If(chain)) = lw.constructs.last_mut() {
        chain.clause = clause;
        chain.false_block = next_false;
        chain.exit = next_false;
    }
    Ok(())
}

pub(crate) fn else_clause(lw: &mut Lowering) -> ShellResult<()> {
    let chain = match lw.constructs.last() {
        Some(Construct::If(chain)) => chain.clone(),
        Some(other) => {
            return Err(SemanticError::unmatched(format!(
                "`Else` cannot close the open `{}`",
                other.kind_name()
            ))
            .into())
        }
        None => return Err(SemanticError::unmatched("`Else` without an open `If`").into()),
    };
    if chain.has_else {
        lw.warn("condition already set");
        return Ok(());
    }

    let func = lw.ctx().func;
    let end = lw.module.add_block(func, format!("if{}.end", chain.index));

    // The finished body path jumps straight to the join; it never falls
    // into the else body.
    let at = lw.at();
    lw.module.emit_br(at, end);
    lw.set_at(chain.false_block);

    if let Some(Construct::If(chain)) = lw.constructs.last_mut() {
        chain.false_block = end;
        chain.exit = end;
        chain.has_else = true;
    }
    Ok(())
}

pub(crate) fn end_if(lw: &mut Lowering) -> ShellResult<()> {
    let chain = match lw.constructs.last() {
        Some(Construct::If(chain)) => chain.clone(),
        Some(other) => {
            return Err(SemanticError::unmatched(format!(
                "`EndIf` cannot close the open `{}`",
                other.kind_name()
            ))
            .into())
        }
        None => return Err(SemanticError::unmatched("`EndIf` without an open `If`").into()),
    };
    lw.constructs.pop();
    let at = lw.at();
    lw.module.emit_br(at, chain.exit);
    lw.set_at(chain.exit);
    Ok(())
}
