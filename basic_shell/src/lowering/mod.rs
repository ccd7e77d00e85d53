//! The session core: turns parsed statements into IR, one line at a
//! time.
//!
//! A [`Lowering`] owns the module under construction plus the editing
//! state around it: the stack of open routines, the stack of open
//! control constructs, the routine signature registry, and the warning
//! channel. Failed statements leave all of it consistent; the next line
//! lowers as if the failed one had never been submitted.

pub mod context;
pub mod stmt_tree;

mod coerce;
mod expr;
mod stmt;

use std::collections::HashMap;

use basic_shell_parser::ast::Statement;

use crate::error::{DiagnosticWarning, FatalConstructionError, ShellResult};
use crate::ir::{write_module, BlockId, IrModule, IrType};

use context::{Construct, ContextKind, FunctionContext, Signature, VarInfo};

pub struct Lowering {
    module: IrModule,
    /// Routine editing stack; index 0 is the implicit `main`, never
    /// popped.
    contexts: Vec<FunctionContext>,
    /// Open If-chains and For-loops, innermost last.
    constructs: Vec<Construct>,
    signatures: HashMap<String, Signature>,
    warnings: Vec<DiagnosticWarning>,
    /// Reserved since session start; `quit` branches into it.
    exit_block: BlockId,
    finished: bool,
}

impl Lowering {
    pub fn new(module_name: &str) -> Self {
        let mut module = IrModule::new(module_name);
        let main = module.add_function("main", Vec::new(), IrType::Void);
        let entry = module.add_block(main, "entry");
        let exit_block = module.add_block(main, "exit");
        Lowering {
            module,
            contexts: vec![FunctionContext::new(
                "main",
                ContextKind::TopLevel,
                main,
                entry,
                0,
            )],
            constructs: Vec::new(),
            signatures: HashMap::new(),
            warnings: Vec::new(),
            exit_block,
            finished: false,
        }
    }

    /// Lower one submitted statement into the module.
    pub fn lower_statement(&mut self, statement: &Statement) -> ShellResult<()> {
        if self.finished {
            return Err(FatalConstructionError::NoPendingBlock.into());
        }
        stmt::lower_statement(self, statement)
    }

    /// End the session: branch the top-level routine into the reserved
    /// exit block and return from it. Valid exactly once.
    pub fn quit(&mut self) -> ShellResult<()> {
        if self.finished {
            return Err(FatalConstructionError::NoPendingBlock.into());
        }
        let at = self.contexts[0].current;
        self.module.emit_br(at, self.exit_block);
        self.module.emit_ret(self.exit_block);
        self.finished = true;
        Ok(())
    }

    /// Serialized text of the whole module as built so far. Safe at any
    /// moment, including with unterminated constructs.
    pub fn serialize(&self) -> String {
        write_module(&self.module)
    }

    pub fn module(&self) -> &IrModule {
        &self.module
    }

    pub fn module_name(&self) -> &str {
        &self.module.name
    }

    pub fn warnings(&self) -> &[DiagnosticWarning] {
        &self.warnings
    }

    pub fn drain_warnings(&mut self) -> Vec<DiagnosticWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn ctx(&self) -> &FunctionContext {
        self.contexts.last().expect("main context is never popped")
    }

    pub(crate) fn ctx_mut(&mut self) -> &mut FunctionContext {
        self.contexts
            .last_mut()
            .expect("main context is never popped")
    }

    /// Block receiving the next instruction.
    pub(crate) fn at(&self) -> BlockId {
        self.ctx().current
    }

    pub(crate) fn set_at(&mut self, block: BlockId) {
        self.ctx_mut().current = block;
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(DiagnosticWarning::new(message));
    }

    /// Look a name up in the active context. Outer contexts are not
    /// consulted; routines do not close over the top level.
    pub(crate) fn lookup_var(&self, name: &str) -> Option<VarInfo> {
        self.ctx().variables.get(name).copied()
    }
}

impl std::fmt::Debug for Lowering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lowering")
            .field("module", &self.module.name)
            .field("contexts", &self.contexts.len())
            .field("constructs", &self.constructs.len())
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use crate::ir::Instr;
    use basic_shell_parser::ast::{Expr, Literal, Statement, TypeName, VarDecl};

    #[test]
    fn fresh_session_has_entry_and_reserved_exit() {
        let lw = Lowering::new("interpreter_session");
        let text = lw.serialize();
        assert!(text.starts_with("module interpreter_session\n"));
        assert!(text.contains("func @main() -> void {"));
        assert!(text.contains("entry:"));
        assert!(text.contains("exit:"));
    }

    #[test]
    fn serialization_is_stable_without_mutation() {
        let mut lw = Lowering::new("test");
        lw.lower_statement(&Statement::Dim {
            decls: vec![VarDecl {
                name: "x".into(),
                ty: TypeName::Integer,
            }],
        })
        .unwrap();
        assert_eq!(lw.serialize(), lw.serialize());
    }

    #[test]
    fn quit_emits_one_branch_and_one_return() {
        let mut lw = Lowering::new("test");
        lw.quit().unwrap();
        assert!(lw.is_finished());
        let main = &lw.module.functions[0];
        assert_eq!(main.blocks[0].instrs.len(), 1);
        assert!(matches!(main.blocks[0].instrs[0], Instr::Br { .. }));
        assert_eq!(main.blocks[1].instrs.len(), 1);
        assert!(matches!(main.blocks[1].instrs[0], Instr::Ret));
    }

    #[test]
    fn statements_after_quit_fail_fatally() {
        let mut lw = Lowering::new("test");
        lw.quit().unwrap();
        let err = lw.lower_statement(&Statement::Empty).unwrap_err();
        assert!(matches!(err, ShellError::Fatal(_)));
        let err = lw.quit().unwrap_err();
        assert!(matches!(err, ShellError::Fatal(_)));
    }

    #[test]
    fn quit_finishes_main_even_with_a_routine_open() {
        let mut lw = Lowering::new("test");
        lw.lower_statement(&Statement::Sub {
            name: "pending".into(),
            params: Vec::new(),
        })
        .unwrap();
        lw.quit().unwrap();
        let main = &lw.module.functions[0];
        assert!(matches!(main.blocks[0].instrs.last(), Some(Instr::Br { .. })));
        assert!(matches!(main.blocks[1].instrs.last(), Some(Instr::Ret)));
    }

    #[test]
    fn lookup_consults_only_the_active_context() {
        let mut lw = Lowering::new("test");
        lw.lower_statement(&Statement::Dim {
            decls: vec![VarDecl {
                name: "x".into(),
                ty: TypeName::Integer,
            }],
        })
        .unwrap();
        assert!(lw.lookup_var("x").is_some());
        lw.lower_statement(&Statement::Sub {
            name: "inner".into(),
            params: Vec::new(),
        })
        .unwrap();
        assert!(lw.lookup_var("x").is_none());
        lw.lower_statement(&Statement::EndSub).unwrap();
        assert!(lw.lookup_var("x").is_some());
    }

    #[test]
    fn failed_statements_leave_the_session_usable() {
        let mut lw = Lowering::new("test");
        let bad = Statement::Assign {
            target: Expr::Var("ghost".into()),
            value: Expr::Literal(Literal::Int(1)),
        };
        assert!(lw.lower_statement(&bad).is_err());
        lw.lower_statement(&Statement::Dim {
            decls: vec![VarDecl {
                name: "ghost".into(),
                ty: TypeName::Integer,
            }],
        })
        .unwrap();
        lw.lower_statement(&Statement::Assign {
            target: Expr::Var("ghost".into()),
            value: Expr::Literal(Literal::Int(1)),
        })
        .unwrap();
    }
}
