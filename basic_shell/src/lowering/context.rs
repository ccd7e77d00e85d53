//! Editing state: which function receives instructions, what its
//! variables are, and which control constructs are still open.

use std::collections::HashMap;

use crate::ir::{BlockId, FuncId};
use crate::types::SemanticType;
use crate::value::Value;

use super::stmt_tree::StmtTree;

/// What kind of routine a context edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// The implicit `main` routine. Never popped.
    TopLevel,
    Sub,
    /// A `Function` with its declared return type.
    Function(SemanticType),
}

/// Registry entry for one declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInfo {
    pub ty: SemanticType,
    pub slot: usize,
}

/// One routine being edited. The top of the context stack receives all
/// emitted instructions.
#[derive(Debug)]
pub struct FunctionContext {
    pub name: String,
    pub kind: ContextKind,
    pub func: FuncId,
    /// Block receiving the next instruction.
    pub current: BlockId,
    pub variables: HashMap<String, VarInfo>,
    pub statements: StmtTree,
    /// Construct stack depth at context entry. Constructs opened inside
    /// this routine must be closed before the routine ends.
    pub construct_floor: usize,
    construct_counter: usize,
}

impl FunctionContext {
    pub fn new(
        name: impl Into<String>,
        kind: ContextKind,
        func: FuncId,
        entry: BlockId,
        construct_floor: usize,
    ) -> Self {
        FunctionContext {
            name: name.into(),
            kind,
            func,
            current: entry,
            variables: HashMap::new(),
            statements: StmtTree::new(),
            construct_floor,
            construct_counter: 0,
        }
    }

    /// Sequence number for control-construct block labels, unique within
    /// this routine.
    pub fn next_construct_index(&mut self) -> usize {
        let n = self.construct_counter;
        self.construct_counter += 1;
        n
    }
}

/// An `If` chain under construction. One record serves the whole chain;
/// middle clauses mutate it in place.
#[derive(Debug, Clone)]
pub struct IfChain {
    /// Pending false target: where control goes when every condition so
    /// far was false.
    pub false_block: BlockId,
    /// Current exit target, always the most recently allocated false
    /// block (or the end block once `Else` ran).
    pub exit: BlockId,
    pub has_else: bool,
    /// Label index of the chain (`if3` for index 3).
    pub index: usize,
    /// Number of middle clauses so far, used to label their blocks.
    pub clause: usize,
}

/// A `For` loop awaiting its `Next`.
#[derive(Debug, Clone)]
pub struct ForLoop {
    pub check: BlockId,
    pub step_block: BlockId,
    pub exit: BlockId,
    pub var: String,
    pub slot: usize,
    pub ty: SemanticType,
    /// Step value, evaluated once in the loop pre-header.
    pub step: Value,
}

#[derive(Debug, Clone)]
pub enum Construct {
    If(IfChain),
    For(ForLoop),
}

impl Construct {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Construct::If(_) => "If",
            Construct::For(_) => "For",
        }
    }
}

/// Declared shape of a sub or function, kept for call lowering.
#[derive(Debug, Clone)]
pub struct Signature {
    pub params: Vec<(String, SemanticType)>,
    /// `None` for subs.
    pub ret: Option<SemanticType>,
}
