//! Statement lowering.
//!
//! One submitted line becomes one call into this module.
//!
//! ## Submodules
//!
//! - `assignment`: `=` lines
//! - `control_for`: For/Next loops
//! - `control_if`: If/ElseIf/Else/EndIf chains
//! - `decl`: `Dim` declaration groups
//! - `routine`: Sub/Function definitions and statement-position calls

mod assignment;
mod control_for;
mod control_if;
mod decl;
mod routine;

use basic_shell_parser::ast::Statement;

use crate::error::ShellResult;

use super::Lowering;

pub(crate) fn lower_statement(lw: &mut Lowering, stmt: &Statement) -> ShellResult<()> {
    match stmt {
        Statement::Empty => Ok(()),
        Statement::Dim { decls } => decl::lower_dim(lw, decls),
        Statement::Assign { target, value } => assignment::lower_assign(lw, target, value),
        Statement::If { cond } => control_if::open_if(lw, cond),
        Statement::ElseIf { cond } => control_if::else_if(lw, cond),
        Statement::Else => control_if::else_clause(lw),
        Statement::EndIf => control_if::end_if(lw),
        Statement::For {
            var,
            start,
            end,
            step,
        } => control_for::open_for(lw, var, start, end, step.as_ref()),
        Statement::Next { var } => control_for::next(lw, var.as_deref()),
        Statement::Sub { name, params } => routine::begin_sub(lw, name, params),
        Statement::Function { name, params, ret } => {
            routine::begin_function(lw, name, params, *ret)
        }
        Statement::EndSub => routine::end_sub(lw),
        Statement::EndFunction => routine::end_function(lw),
        Statement::Call { name, args } => routine::lower_call_stmt(lw, name, args),
    }
}
