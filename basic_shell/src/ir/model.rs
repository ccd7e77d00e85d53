//! In-memory program representation built up by lowering.
//!
//! The model is a plain arena: a module owns functions, functions own
//! blocks and stack slots, and instructions refer to one another through
//! small copyable ids. Nothing here interprets the program; the textual
//! form is produced by [`crate::ir::writer`].

use std::collections::HashMap;

/// Backend value type. `Ptr` is an opaque pointer, used for string data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrType {
    I8,
    I32,
    I64,
    F32,
    F64,
    Ptr,
    Void,
}

impl IrType {
    pub fn is_int(self) -> bool {
        matches!(self, IrType::I8 | IrType::I32 | IrType::I64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, IrType::F32 | IrType::F64)
    }

    /// Width used to order types within the integer and float families.
    pub fn bits(self) -> u32 {
        match self {
            IrType::I8 => 8,
            IrType::I32 | IrType::F32 => 32,
            IrType::I64 | IrType::F64 => 64,
            IrType::Ptr | IrType::Void => 0,
        }
    }
}

impl std::fmt::Display for IrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IrType::I8 => "i8",
            IrType::I32 => "i32",
            IrType::I64 => "i64",
            IrType::F32 => "f32",
            IrType::F64 => "f64",
            IrType::Ptr => "ptr",
            IrType::Void => "void",
        };
        f.write_str(name)
    }
}

/// An immediate operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IrConst {
    I8(i8),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl IrConst {
    pub fn ty(self) -> IrType {
        match self {
            IrConst::I8(_) => IrType::I8,
            IrConst::I32(_) => IrType::I32,
            IrConst::I64(_) => IrType::I64,
            IrConst::F32(_) => IrType::F32,
            IrConst::F64(_) => IrType::F64,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            IrConst::I8(v) => v == 0,
            IrConst::I32(v) => v == 0,
            IrConst::I64(v) => v == 0,
            IrConst::F32(v) => v == 0.0,
            IrConst::F64(v) => v == 0.0,
        }
    }

    /// Zero of a value type. `None` for `Ptr` and `Void`, which have no
    /// immediate form.
    pub fn zero(ty: IrType) -> Option<IrConst> {
        match ty {
            IrType::I8 => Some(IrConst::I8(0)),
            IrType::I32 => Some(IrConst::I32(0)),
            IrType::I64 => Some(IrConst::I64(0)),
            IrType::F32 => Some(IrConst::F32(0.0)),
            IrType::F64 => Some(IrConst::F64(0.0)),
            IrType::Ptr | IrType::Void => None,
        }
    }
}

/// Handle to a function within a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub(crate) usize);

/// Handle to a basic block. Blocks are only ever addressed through the
/// module that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    pub(crate) func: FuncId,
    pub(crate) index: usize,
}

impl BlockId {
    pub fn func(self) -> FuncId {
        self.func
    }
}

/// Handle to an interned string global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalId(pub(crate) usize);

/// An instruction operand or result position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef {
    /// Numbered temporary, unique per function.
    Temp(usize),
    /// Stack slot, by index into [`Function::slots`].
    Slot(usize),
    /// Incoming parameter, by index into [`Function::params`].
    Param(usize),
    Const(IrConst),
    Global(GlobalId),
}

/// Arithmetic operator. The integer or float spelling is chosen by the
/// writer from the instruction's operand type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Comparison predicate, likewise spelled per operand family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Lt,
    Gt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    Sext,
    Trunc,
    Fpext,
    Fptrunc,
    Sitofp,
    Uitofp,
    Fptosi,
    Bitcast,
}

impl CastKind {
    pub fn mnemonic(self) -> &'static str {
        match self {
            CastKind::Sext => "sext",
            CastKind::Trunc => "trunc",
            CastKind::Fpext => "fpext",
            CastKind::Fptrunc => "fptrunc",
            CastKind::Sitofp => "sitofp",
            CastKind::Uitofp => "uitofp",
            CastKind::Fptosi => "fptosi",
            CastKind::Bitcast => "bitcast",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// Reserve a stack slot. Slot name and type live in [`Function::slots`].
    Alloca {
        slot: usize,
    },
    Store {
        ty: IrType,
        value: ValueRef,
        target: ValueRef,
    },
    Load {
        result: usize,
        ty: IrType,
        source: ValueRef,
    },
    Binary {
        result: usize,
        op: ArithOp,
        ty: IrType,
        lhs: ValueRef,
        rhs: ValueRef,
    },
    Cmp {
        result: usize,
        op: CmpOp,
        ty: IrType,
        lhs: ValueRef,
        rhs: ValueRef,
    },
    Cast {
        result: usize,
        kind: CastKind,
        from: IrType,
        to: IrType,
        value: ValueRef,
    },
    Call {
        result: Option<usize>,
        callee: String,
        ret: IrType,
        args: Vec<(IrType, ValueRef)>,
    },
    /// Address of an interned string global.
    Gep {
        result: usize,
        global: GlobalId,
    },
    Br {
        target: BlockId,
    },
    CondBr {
        cond: ValueRef,
        then_block: BlockId,
        else_block: BlockId,
    },
    /// `ret void`. Value returns are not part of the language surface.
    Ret,
}

impl Instr {
    pub fn is_terminator(&self) -> bool {
        matches!(self, Instr::Br { .. } | Instr::CondBr { .. } | Instr::Ret)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: String,
    pub ty: IrType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub label: String,
    pub instrs: Vec<Instr>,
}

impl Block {
    pub fn is_terminated(&self) -> bool {
        self.instrs.last().is_some_and(Instr::is_terminator)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<(String, IrType)>,
    pub ret: IrType,
    pub slots: Vec<Slot>,
    pub blocks: Vec<Block>,
    next_temp: usize,
}

/// NUL-terminated string data emitted as a module global.
#[derive(Debug, Clone, PartialEq)]
pub struct StrGlobal {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternDecl {
    pub name: String,
    pub params: Vec<IrType>,
    pub ret: IrType,
}

/// A whole program under construction.
#[derive(Debug, Clone)]
pub struct IrModule {
    pub name: String,
    pub globals: Vec<StrGlobal>,
    pub externs: Vec<ExternDecl>,
    pub functions: Vec<Function>,
    interned: HashMap<String, GlobalId>,
}

impl IrModule {
    pub fn new(name: impl Into<String>) -> Self {
        IrModule {
            name: name.into(),
            globals: Vec::new(),
            externs: Vec::new(),
            functions: Vec::new(),
            interned: HashMap::new(),
        }
    }

    /// Create a function. A name already present in the module is made
    /// unique with a numeric suffix; existing references keep resolving
    /// to the first bearer of the name.
    pub fn add_function(
        &mut self,
        name: impl Into<String>,
        params: Vec<(String, IrType)>,
        ret: IrType,
    ) -> FuncId {
        let mut name = name.into();
        if self.functions.iter().any(|f| f.name == name) {
            let mut n = 1;
            while self
                .functions
                .iter()
                .any(|f| f.name == format!("{}.{}", name, n))
            {
                n += 1;
            }
            name = format!("{}.{}", name, n);
        }
        let id = FuncId(self.functions.len());
        self.functions.push(Function {
            name,
            params,
            ret,
            slots: Vec::new(),
            blocks: Vec::new(),
            next_temp: 0,
        });
        id
    }

    pub fn func(&self, id: FuncId) -> &Function {
        &self.functions[id.0]
    }

    fn func_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.0]
    }

    pub fn add_block(&mut self, func: FuncId, label: impl Into<String>) -> BlockId {
        let f = self.func_mut(func);
        let index = f.blocks.len();
        f.blocks.push(Block {
            label: label.into(),
            instrs: Vec::new(),
        });
        BlockId { func, index }
    }

    pub fn block(&self, at: BlockId) -> &Block {
        &self.functions[at.func.0].blocks[at.index]
    }

    pub fn block_label(&self, at: BlockId) -> &str {
        &self.block(at).label
    }

    pub fn is_terminated(&self, at: BlockId) -> bool {
        self.block(at).is_terminated()
    }

    /// First block of a function. Every function receives its entry
    /// block immediately after creation.
    pub fn entry_block(&self, func: FuncId) -> BlockId {
        BlockId { func, index: 0 }
    }

    /// Intern string data, reusing an existing global with identical content.
    pub fn intern_string(&mut self, content: &str) -> GlobalId {
        if let Some(&id) = self.interned.get(content) {
            return id;
        }
        let id = GlobalId(self.globals.len());
        self.globals.push(StrGlobal {
            name: format!("str.{}", id.0),
            content: content.to_string(),
        });
        self.interned.insert(content.to_string(), id);
        id
    }

    /// Declare an external function once; repeat declarations are ignored.
    pub fn declare_extern(&mut self, name: &str, params: Vec<IrType>, ret: IrType) {
        if self.externs.iter().any(|e| e.name == name) {
            return;
        }
        self.externs.push(ExternDecl {
            name: name.to_string(),
            params,
            ret,
        });
    }

    /// Create a named stack slot. A name already used in this function
    /// gets a numeric suffix so the serialized form stays unambiguous.
    pub fn add_slot(&mut self, func: FuncId, name: impl Into<String>, ty: IrType) -> usize {
        let f = self.func_mut(func);
        let mut name = name.into();
        if f.slots.iter().any(|s| s.name == name) {
            let mut n = 1;
            while f
                .slots
                .iter()
                .any(|s| s.name == format!("{}.{}", name, n))
            {
                n += 1;
            }
            name = format!("{}.{}", name, n);
        }
        let index = f.slots.len();
        f.slots.push(Slot { name, ty });
        index
    }

    fn next_temp(&mut self, func: FuncId) -> usize {
        let f = self.func_mut(func);
        let n = f.next_temp;
        f.next_temp += 1;
        n
    }

    fn push(&mut self, at: BlockId, instr: Instr) {
        self.functions[at.func.0].blocks[at.index].instrs.push(instr);
    }

    pub fn emit_alloca(&mut self, at: BlockId, slot: usize) {
        self.push(at, Instr::Alloca { slot });
    }

    pub fn emit_store(&mut self, at: BlockId, ty: IrType, value: ValueRef, target: ValueRef) {
        self.push(at, Instr::Store { ty, value, target });
    }

    pub fn emit_load(&mut self, at: BlockId, ty: IrType, source: ValueRef) -> ValueRef {
        let result = self.next_temp(at.func);
        self.push(at, Instr::Load { result, ty, source });
        ValueRef::Temp(result)
    }

    pub fn emit_binary(
        &mut self,
        at: BlockId,
        op: ArithOp,
        ty: IrType,
        lhs: ValueRef,
        rhs: ValueRef,
    ) -> ValueRef {
        let result = self.next_temp(at.func);
        self.push(
            at,
            Instr::Binary {
                result,
                op,
                ty,
                lhs,
                rhs,
            },
        );
        ValueRef::Temp(result)
    }

    pub fn emit_cmp(
        &mut self,
        at: BlockId,
        op: CmpOp,
        ty: IrType,
        lhs: ValueRef,
        rhs: ValueRef,
    ) -> ValueRef {
        let result = self.next_temp(at.func);
        self.push(
            at,
            Instr::Cmp {
                result,
                op,
                ty,
                lhs,
                rhs,
            },
        );
        ValueRef::Temp(result)
    }

    pub fn emit_cast(
        &mut self,
        at: BlockId,
        kind: CastKind,
        from: IrType,
        to: IrType,
        value: ValueRef,
    ) -> ValueRef {
        let result = self.next_temp(at.func);
        self.push(
            at,
            Instr::Cast {
                result,
                kind,
                from,
                to,
                value,
            },
        );
        ValueRef::Temp(result)
    }

    /// Emit a call that produces a value. `ret` must not be void.
    pub fn emit_call(
        &mut self,
        at: BlockId,
        callee: impl Into<String>,
        ret: IrType,
        args: Vec<(IrType, ValueRef)>,
    ) -> ValueRef {
        let result = self.next_temp(at.func);
        self.push(
            at,
            Instr::Call {
                result: Some(result),
                callee: callee.into(),
                ret,
                args,
            },
        );
        ValueRef::Temp(result)
    }

    /// Emit a call whose result, if any, is discarded.
    pub fn emit_void_call(
        &mut self,
        at: BlockId,
        callee: impl Into<String>,
        args: Vec<(IrType, ValueRef)>,
    ) {
        self.push(
            at,
            Instr::Call {
                result: None,
                callee: callee.into(),
                ret: IrType::Void,
                args,
            },
        );
    }

    pub fn emit_gep(&mut self, at: BlockId, global: GlobalId) -> ValueRef {
        let result = self.next_temp(at.func);
        self.push(at, Instr::Gep { result, global });
        ValueRef::Temp(result)
    }

    pub fn emit_br(&mut self, at: BlockId, target: BlockId) {
        self.push(at, Instr::Br { target });
    }

    pub fn emit_cond_br(&mut self, at: BlockId, cond: ValueRef, then_block: BlockId, else_block: BlockId) {
        self.push(
            at,
            Instr::CondBr {
                cond,
                then_block,
                else_block,
            },
        );
    }

    pub fn emit_ret(&mut self, at: BlockId) {
        self.push(at, Instr::Ret);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temps_number_per_function() {
        let mut m = IrModule::new("t");
        let f = m.add_function("main", Vec::new(), IrType::Void);
        let g = m.add_function("other", Vec::new(), IrType::Void);
        let fb = m.add_block(f, "entry");
        let gb = m.add_block(g, "entry");
        let slot = m.add_slot(f, "x", IrType::I32);
        let a = m.emit_load(fb, IrType::I32, ValueRef::Slot(slot));
        let b = m.emit_load(gb, IrType::I32, ValueRef::Slot(0));
        assert_eq!(a, ValueRef::Temp(0));
        assert_eq!(b, ValueRef::Temp(0));
        let c = m.emit_load(fb, IrType::I32, ValueRef::Slot(slot));
        assert_eq!(c, ValueRef::Temp(1));
    }

    #[test]
    fn interning_reuses_identical_content() {
        let mut m = IrModule::new("t");
        let a = m.intern_string("hello");
        let b = m.intern_string("hello");
        let c = m.intern_string("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(m.globals.len(), 2);
        assert_eq!(m.globals[0].name, "str.0");
        assert_eq!(m.globals[1].name, "str.1");
    }

    #[test]
    fn extern_declarations_do_not_repeat() {
        let mut m = IrModule::new("t");
        m.declare_extern("pow", vec![IrType::F64, IrType::F64], IrType::F64);
        m.declare_extern("pow", vec![IrType::F64, IrType::F64], IrType::F64);
        assert_eq!(m.externs.len(), 1);
    }

    #[test]
    fn termination_tracks_last_instruction() {
        let mut m = IrModule::new("t");
        let f = m.add_function("main", Vec::new(), IrType::Void);
        let entry = m.add_block(f, "entry");
        let exit = m.add_block(f, "exit");
        assert!(!m.is_terminated(entry));
        m.emit_br(entry, exit);
        assert!(m.is_terminated(entry));
        m.emit_ret(exit);
        assert!(m.is_terminated(exit));
    }
}
