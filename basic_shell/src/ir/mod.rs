//! Backend program representation.
//!
//! [`model`] holds the arena of functions, blocks and instructions that
//! lowering appends to; [`writer`] renders it as stable text.

pub mod model;
pub mod writer;

pub use model::{
    ArithOp, Block, BlockId, CastKind, CmpOp, ExternDecl, FuncId, Function, GlobalId, Instr,
    IrConst, IrModule, IrType, Slot, StrGlobal, ValueRef,
};
pub use writer::write_module;
