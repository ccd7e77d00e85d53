//! Textual serialization of a module.
//!
//! The format is line oriented and stable: one `module` header, then
//! string globals, extern declarations and functions, separated by blank
//! lines. Serialization never mutates the module, so repeated calls
//! produce identical output.

use std::fmt::Write as _;

use super::model::{ArithOp, CmpOp, Function, Instr, IrConst, IrModule, IrType, ValueRef};

/// Render the whole module as text. The result ends with a newline.
pub fn write_module(module: &IrModule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "module {}", module.name);

    if !module.globals.is_empty() {
        out.push('\n');
        for global in &module.globals {
            let mut data = String::new();
            escape_bytes(&global.content, &mut data);
            let _ = writeln!(out, "global @{} = bytes \"{}\"", global.name, data);
        }
    }

    if !module.externs.is_empty() {
        out.push('\n');
        for ext in &module.externs {
            let params = ext
                .params
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "extern @{}({}) -> {}", ext.name, params, ext.ret);
        }
    }

    for func in &module.functions {
        out.push('\n');
        write_function(module, func, &mut out);
    }

    out
}

fn write_function(module: &IrModule, func: &Function, out: &mut String) {
    let params = func
        .params
        .iter()
        .map(|(name, ty)| format!("{} %{}", ty, name))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "func @{}({}) -> {} {{", func.name, params, func.ret);
    for block in &func.blocks {
        let _ = writeln!(out, "{}:", block.label);
        for instr in &block.instrs {
            let _ = writeln!(out, "  {}", render_instr(module, func, instr));
        }
    }
    out.push_str("}\n");
}

fn render_instr(module: &IrModule, func: &Function, instr: &Instr) -> String {
    match instr {
        Instr::Alloca { slot } => {
            let s = &func.slots[*slot];
            format!("%{} = alloca {}", s.name, s.ty)
        }
        Instr::Store { ty, value, target } => {
            format!(
                "store {} {}, {}",
                ty,
                operand(module, func, *value),
                operand(module, func, *target)
            )
        }
        Instr::Load { result, ty, source } => {
            format!("%t{} = load {}, {}", result, ty, operand(module, func, *source))
        }
        Instr::Binary {
            result,
            op,
            ty,
            lhs,
            rhs,
        } => {
            format!(
                "%t{} = {} {} {}, {}",
                result,
                arith_mnemonic(*op, *ty),
                ty,
                operand(module, func, *lhs),
                operand(module, func, *rhs)
            )
        }
        Instr::Cmp {
            result,
            op,
            ty,
            lhs,
            rhs,
        } => {
            format!(
                "%t{} = {} {} {}, {}",
                result,
                cmp_mnemonic(*op, *ty),
                ty,
                operand(module, func, *lhs),
                operand(module, func, *rhs)
            )
        }
        Instr::Cast {
            result,
            kind,
            from,
            to,
            value,
        } => {
            format!(
                "%t{} = {} {} {} to {}",
                result,
                kind.mnemonic(),
                from,
                operand(module, func, *value),
                to
            )
        }
        Instr::Call {
            result,
            callee,
            ret: _,
            args,
        } => {
            let rendered = args
                .iter()
                .map(|(ty, value)| format!("{} {}", ty, operand(module, func, *value)))
                .collect::<Vec<_>>()
                .join(", ");
            match result {
                Some(r) => format!("%t{} = call @{}({})", r, callee, rendered),
                None => format!("call @{}({})", callee, rendered),
            }
        }
        Instr::Gep { result, global } => {
            format!("%t{} = gep @{}", result, module.globals[global.0].name)
        }
        Instr::Br { target } => format!("br {}", module.block_label(*target)),
        Instr::CondBr {
            cond,
            then_block,
            else_block,
        } => {
            format!(
                "cbr {}, {}, {}",
                operand(module, func, *cond),
                module.block_label(*then_block),
                module.block_label(*else_block)
            )
        }
        Instr::Ret => "ret void".to_string(),
    }
}

fn operand(module: &IrModule, func: &Function, value: ValueRef) -> String {
    match value {
        ValueRef::Temp(n) => format!("%t{}", n),
        ValueRef::Slot(i) => format!("%{}", func.slots[i].name),
        ValueRef::Param(i) => format!("%{}", func.params[i].0),
        ValueRef::Const(c) => render_const(c),
        ValueRef::Global(g) => format!("@{}", module.globals[g.0].name),
    }
}

fn render_const(c: IrConst) -> String {
    match c {
        IrConst::I8(v) => v.to_string(),
        IrConst::I32(v) => v.to_string(),
        IrConst::I64(v) => v.to_string(),
        // Debug formatting keeps a trailing `.0` on whole floats, which
        // keeps integer and float immediates distinguishable in the text.
        IrConst::F32(v) => format!("{:?}", v),
        IrConst::F64(v) => format!("{:?}", v),
    }
}

fn arith_mnemonic(op: ArithOp, ty: IrType) -> &'static str {
    if ty.is_float() {
        match op {
            ArithOp::Add => "fadd",
            ArithOp::Sub => "fsub",
            ArithOp::Mul => "fmul",
            ArithOp::Div => "fdiv",
        }
    } else {
        match op {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "sdiv",
        }
    }
}

fn cmp_mnemonic(op: CmpOp, ty: IrType) -> &'static str {
    if ty.is_float() {
        match op {
            CmpOp::Eq => "fcmp.oeq",
            CmpOp::Lt => "fcmp.olt",
            CmpOp::Gt => "fcmp.ogt",
        }
    } else {
        match op {
            CmpOp::Eq => "icmp.seq",
            CmpOp::Lt => "icmp.slt",
            CmpOp::Gt => "icmp.sgt",
        }
    }
}

/// Escape string data for a `bytes` literal. Printable ASCII other than
/// the quote and backslash passes through; everything else becomes a
/// two-digit uppercase hex escape. A NUL terminator is always appended.
fn escape_bytes(content: &str, out: &mut String) {
    for &b in content.as_bytes() {
        match b {
            b'"' | b'\\' => {
                let _ = write!(out, "\\{:02X}", b);
            }
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:02X}", b);
            }
        }
    }
    out.push_str("\\00");
}
