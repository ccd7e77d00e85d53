//! `Dim` declaration groups.

use basic_shell_parser::ast::VarDecl;

use crate::error::{SemanticError, ShellResult};
use crate::ir::BlockId;
use crate::lowering::context::VarInfo;
use crate::lowering::stmt_tree::NodeKind;
use crate::types::SemanticType;

use super::Lowering;

/// Declare each name of a `Dim` group in order: registry entry, stack
/// slot, alloca, and one scaffold node under the group. A duplicate
/// name stops the group; names before it stay declared.
pub(crate) fn lower_dim(lw: &mut Lowering, decls: &[VarDecl]) -> ShellResult<()> {
    let group = lw
        .ctx_mut()
        .statements
        .append_last(None, NodeKind::Group, "Dim");
    for decl in decls {
        let ty = SemanticType::from(decl.ty);
        if lw.ctx().variables.contains_key(&decl.name) {
            return Err(SemanticError::incompatible(format!(
                "variable `{}` is already declared",
                decl.name
            ))
            .into());
        }
        let func = lw.ctx().func;
        let slot = lw.module.add_slot(func, &decl.name, ty.backend());
        let at = storage_block(lw);
        lw.module.emit_alloca(at, slot);
        lw.ctx_mut()
            .variables
            .insert(decl.name.clone(), VarInfo { ty, slot });
        lw.ctx_mut().statements.append_last(
            group,
            NodeKind::Declaration,
            &format!("{} As {}", decl.name, ty.keyword()),
        );
    }
    Ok(())
}

/// Storage lives in the routine's entry block so it dominates every
/// use; once the entry block has branched away, fall back to the
/// current block to keep the serialized form well-formed.
fn storage_block(lw: &Lowering) -> BlockId {
    let entry = lw.module.entry_block(lw.ctx().func);
    if lw.module.is_terminated(entry) {
        lw.ctx().current
    } else {
        entry
    }
}
